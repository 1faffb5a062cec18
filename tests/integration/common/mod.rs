//! Common utilities for integration tests.
//!
//! This module provides shared test infrastructure for LocalStack-based
//! integration testing, including client setup and a collecting output.

pub mod localstack;

pub use localstack::LocalStackTestContext;

use sr_error::Result;
use sr_scanner::{DegradedObject, Output};
use std::sync::{Arc, Mutex};

/// Collecting output that stores reported paths for verification.
#[derive(Default, Clone)]
pub struct CollectingOutput {
    paths: Arc<Mutex<Vec<String>>>,
}

impl CollectingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Output for CollectingOutput {
    async fn emit(&self, object: &DegradedObject) -> Result<()> {
        self.paths.lock().unwrap().push(object.path.clone());
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
