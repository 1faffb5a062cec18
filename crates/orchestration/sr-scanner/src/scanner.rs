//! Main Scanner implementation.

use futures::StreamExt;
use sr_error::Result;
use tracing::{debug, info, warn};

use crate::DegradedObject;
use crate::config::ScanConfiguration;
use crate::enumerator::Enumerator;
use crate::output::Output;
use crate::stats::ScanStats;
use crate::store::ObjectStore;
use crate::verifier::{Verdict, Verifier};

/// The scanner that drives enumeration, verification and output.
///
/// Generic over the store and the output so the same loop runs against S3,
/// an in-memory store, stdout or a collecting sink.
pub struct Scanner<S: ObjectStore, O: Output> {
    store: S,
    output: O,
    config: ScanConfiguration,
}

impl<S: ObjectStore, O: Output> Scanner<S, O> {
    /// Create a new Scanner.
    ///
    /// # Arguments
    ///
    /// * `store` - The object store to list and probe
    /// * `output` - Where degraded objects are reported
    /// * `config` - The validated scan configuration
    pub fn new(store: S, output: O, config: ScanConfiguration) -> Self {
        Self {
            store,
            output,
            config,
        }
    }

    /// The store this scanner runs against.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one verification pass.
    ///
    /// Entries are handled one at a time in listing order. The first listing
    /// error or non-skipped probe failure ends the scan with `Err`; degraded
    /// objects reported before that point stay reported.
    pub async fn scan(&self) -> Result<ScanStats> {
        let mut stats = ScanStats::new();

        info!(
            bucket = %self.config.bucket,
            prefix = %self.config.normalized_prefix(),
            recursive = self.config.recursive,
            skip_other_errors = self.config.skip_other_errors,
            "Starting scan"
        );

        let result = self.run(&mut stats).await;

        if let Err(e) = self.output.flush().await {
            warn!(error = %e, "Failed to flush output");
            result?;
            return Err(e);
        }
        result?;

        stats.complete();

        info!(
            entries = stats.entries_listed,
            probed = stats.objects_probed,
            degraded = stats.degraded,
            skipped_errors = stats.errors_skipped,
            "Scan completed"
        );

        Ok(stats)
    }

    async fn run(&self, stats: &mut ScanStats) -> Result<()> {
        let enumerator = Enumerator::from_config(&self.store, &self.config);
        let mut verifier = Verifier::new(
            &self.store,
            &self.config.bucket,
            self.config.skip_other_errors,
        );

        let mut descriptors = enumerator.descriptors();

        while let Some(item) = descriptors.next().await {
            let descriptor = item.inspect_err(|e| warn!(error = %e, "Listing failed"))?;

            let verdict = verifier
                .verify(&descriptor)
                .await
                .inspect_err(|e| warn!(key = %descriptor.key, error = %e, "Probe failed"))?;

            if verdict == Verdict::Degraded {
                let object = DegradedObject::new(&self.config.bucket, &descriptor);
                self.output.emit(&object).await?;
            }

            stats.record(&verdict);
        }

        debug!(entries = stats.entries_listed, "Listing exhausted");
        Ok(())
    }
}
