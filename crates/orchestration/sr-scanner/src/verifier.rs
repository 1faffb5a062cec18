//! Per-object verification.

use sr_error::{Result, ScanError};
use tracing::{debug, warn};

use crate::probe::ProbeOutcome;
use crate::store::{ObjectDescriptor, ObjectStore, StatError};

/// Terminal state of one listed entry.
///
/// A fatal probe failure is not a verdict; it comes back as an `Err` from
/// [`Verifier::verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Key ends with the separator; not probed
    DirectoryMarker,

    /// Another version of the key probed just before; not probed again
    RepeatedKey,

    /// Probe succeeded
    Healthy,

    /// Probe failed with the repair signature; to be reported
    Degraded,

    /// Probe failed otherwise and the skip policy let it pass
    SkippedError(StatError),
}

/// Probes listed entries and applies the skip policy.
///
/// Entries must be fed in listing order. Versions of a key arrive next to
/// each other, so remembering the last probed key is enough to probe every
/// key once.
pub struct Verifier<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    bucket: &'a str,
    skip_other_errors: bool,
    last_probed: Option<String>,
}

impl<'a, S: ObjectStore + ?Sized> Verifier<'a, S> {
    /// Create a verifier for `bucket`.
    pub fn new(store: &'a S, bucket: &'a str, skip_other_errors: bool) -> Self {
        Self {
            store,
            bucket,
            skip_other_errors,
            last_probed: None,
        }
    }

    /// Verify one listed entry.
    ///
    /// Returns `Err` when the probe fails with anything but the degraded
    /// signature and skipping is off; the scan must stop there.
    pub async fn verify(&mut self, descriptor: &ObjectDescriptor) -> Result<Verdict> {
        if descriptor.is_directory_marker() {
            debug!(key = %descriptor.key, "Skipping directory marker");
            return Ok(Verdict::DirectoryMarker);
        }

        if self.last_probed.as_deref() == Some(descriptor.key.as_str()) {
            debug!(
                key = %descriptor.key,
                version_id = ?descriptor.version_id,
                "Key already probed"
            );
            return Ok(Verdict::RepeatedKey);
        }
        self.last_probed = Some(descriptor.key.clone());

        let result = self.store.stat_object(self.bucket, &descriptor.key).await;

        match ProbeOutcome::classify(result) {
            ProbeOutcome::Healthy => {
                debug!(key = %descriptor.key, "Healthy");
                Ok(Verdict::Healthy)
            }
            ProbeOutcome::Degraded => {
                debug!(key = %descriptor.key, "Degraded");
                Ok(Verdict::Degraded)
            }
            ProbeOutcome::Other(error) if self.skip_other_errors => {
                warn!(
                    key = %descriptor.key,
                    code = ?error.code,
                    status = ?error.status,
                    error = %error,
                    "Skipping probe failure"
                );
                Ok(Verdict::SkippedError(error))
            }
            ProbeOutcome::Other(error) => Err(ScanError::stat(&descriptor.key, error)),
        }
    }
}
