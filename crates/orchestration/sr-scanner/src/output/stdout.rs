//! Stdout output implementation for degraded objects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sr_error::{Result, ScanError};
use std::io::Write;

use super::Output;
use crate::DegradedObject;

/// Output format for stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The object path alone, e.g. `/logs/app.log` (default)
    #[default]
    Text,

    /// JSON Lines format - one JSON object per line
    Jsonl,
}

/// Stdout output implementation.
///
/// Text output is one absolute path per line, suitable for piping to `xargs`
/// or counting with `wc -l`.
pub struct StdoutOutput {
    format: OutputFormat,
}

impl StdoutOutput {
    /// Create a new StdoutOutput with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Create a new StdoutOutput with text format (default).
    pub fn text() -> Self {
        Self::new(OutputFormat::Text)
    }

    /// Create a new StdoutOutput with JSONL format.
    pub fn jsonl() -> Self {
        Self::new(OutputFormat::Jsonl)
    }

    /// Render one object as a line, without the trailing newline.
    pub fn render(&self, object: &DegradedObject) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(object.path.clone()),
            OutputFormat::Jsonl => serde_json::to_string(object)
                .map_err(|e| ScanError::Output(format!("JSON serialization failed: {e}"))),
        }
    }
}

impl Default for StdoutOutput {
    fn default() -> Self {
        Self::text()
    }
}

#[async_trait]
impl Output for StdoutOutput {
    async fn emit(&self, object: &DegradedObject) -> Result<()> {
        let line = self.render(object)?;

        writeln!(std::io::stdout().lock(), "{line}")
            .map_err(|e| ScanError::Output(format!("Failed to write to stdout: {e}")))
    }

    async fn flush(&self) -> Result<()> {
        std::io::stdout()
            .flush()
            .map_err(|e| ScanError::Output(format!("Failed to flush stdout: {e}")))
    }
}
