//! Shared helpers for scanner tests.

use async_trait::async_trait;
use sr_error::Result;
use sr_scanner::{DegradedObject, Output, ScanConfiguration, StdoutOutput};
use std::sync::{Arc, Mutex};

/// Output that stores rendered lines for verification.
#[derive(Default, Clone)]
pub struct CollectingOutput {
    lines: Arc<Mutex<Vec<String>>>,
    flushes: Arc<Mutex<usize>>,
}

impl CollectingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn flush_count(&self) -> usize {
        *self.flushes.lock().unwrap()
    }
}

#[async_trait]
impl Output for CollectingOutput {
    async fn emit(&self, object: &DegradedObject) -> Result<()> {
        let line = StdoutOutput::text().render(object)?;
        self.lines.lock().unwrap().push(line);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        *self.flushes.lock().unwrap() += 1;
        Ok(())
    }
}

/// A complete configuration for `bucket` on a local endpoint.
pub fn scan_config(bucket: &str) -> ScanConfiguration {
    ScanConfiguration::new("http://localhost:9000", bucket).with_credentials("access", "secret")
}
