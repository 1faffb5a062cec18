//! Classification of metadata probe results.

use crate::store::StatError;

/// Error code a store answers with while an object is being repaired.
pub const SLOW_DOWN_READ_CODE: &str = "SlowDownRead";

/// HTTP status that accompanies [`SLOW_DOWN_READ_CODE`].
pub const SLOW_DOWN_READ_STATUS: u16 = 503;

/// Result of probing one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The metadata fetch succeeded.
    Healthy,

    /// The fetch failed with the repair signature; the object is a finding.
    Degraded,

    /// The fetch failed for any other reason.
    Other(StatError),
}

impl ProbeOutcome {
    /// Classify the result of a metadata fetch.
    ///
    /// Only the exact (`SlowDownRead`, 503) pair counts as degraded. Other
    /// throttling codes or a `SlowDownRead` with a different status are
    /// [`ProbeOutcome::Other`].
    pub fn classify(result: std::result::Result<(), StatError>) -> Self {
        match result {
            Ok(()) => Self::Healthy,
            Err(error) if is_degraded(&error) => Self::Degraded,
            Err(error) => Self::Other(error),
        }
    }
}

fn is_degraded(error: &StatError) -> bool {
    error.code.as_deref() == Some(SLOW_DOWN_READ_CODE)
        && error.status == Some(SLOW_DOWN_READ_STATUS)
}
