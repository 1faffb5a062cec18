//! Output implementations for degraded objects.
//!
//! This module provides the [`Output`] trait and the [`StdoutOutput`]
//! implementation, which writes one line per degraded object.

mod stdout;

pub use stdout::{OutputFormat, StdoutOutput};

use async_trait::async_trait;
use sr_error::Result;

use crate::DegradedObject;

/// Trait for reporting degraded objects.
///
/// Objects are emitted in listing order as soon as they are found, so a run
/// that later fails still leaves its earlier findings behind.
#[async_trait]
pub trait Output: Send + Sync {
    /// Report a single degraded object.
    async fn emit(&self, object: &DegradedObject) -> Result<()>;

    /// Flush any buffered output.
    ///
    /// Called once the scan ends, whether it succeeded or not.
    async fn flush(&self) -> Result<()>;
}
