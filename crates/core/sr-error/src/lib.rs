//! Error types for slowread-scan.
//!
//! This crate provides:
//! - [`ScanError`] - Top-level error enum for every fatal scan condition
//! - [`ScanPhase`] - Which part of a run an error came from
//!
//! Degraded objects are never represented here. They are findings, not
//! errors, and are carried by the scanner's probe outcome instead.

use thiserror::Error;

/// Top-level error type for slowread-scan.
///
/// Every variant is fatal for the run that produced it.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The object store client could not be constructed (e.g. TLS setup)
    #[error("Client error: {0}")]
    Client(String),

    /// The store failed while enumerating the bucket
    #[error("unable to list bucket {bucket}: {message}")]
    Listing { bucket: String, message: String },

    /// A metadata probe failed with something other than the degraded signature
    #[error("unable to stat {key}: {message}")]
    Stat { key: String, message: String },

    /// The result stream could not be written
    #[error("Output error: {0}")]
    Output(String),
}

/// Part of a scan run an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Argument validation and client construction, before any store call
    Setup,

    /// Bucket enumeration
    Listing,

    /// Per-object metadata probe
    Probe,

    /// Writing results
    Output,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Listing => write!(f, "listing"),
            Self::Probe => write!(f, "probe"),
            Self::Output => write!(f, "output"),
        }
    }
}

impl ScanError {
    /// Build a listing error for `bucket`.
    pub fn listing(bucket: impl Into<String>, message: impl ToString) -> Self {
        Self::Listing {
            bucket: bucket.into(),
            message: message.to_string(),
        }
    }

    /// Build a probe error for `key`.
    pub fn stat(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Stat {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// The phase of the run this error was raised in.
    pub fn phase(&self) -> ScanPhase {
        match self {
            Self::Config(_) | Self::Client(_) => ScanPhase::Setup,
            Self::Listing { .. } => ScanPhase::Listing,
            Self::Stat { .. } => ScanPhase::Probe,
            Self::Output(_) => ScanPhase::Output,
        }
    }

    /// Whether the error was raised before the store was contacted.
    pub fn is_setup(&self) -> bool {
        self.phase() == ScanPhase::Setup
    }
}

/// Result type alias using ScanError.
pub type Result<T> = std::result::Result<T, ScanError>;
