//! Statistics for scan runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::verifier::Verdict;

/// Counters collected during a scan run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// When the scan started
    pub started_at: Option<DateTime<Utc>>,

    /// When the scan completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Listing entries received, markers and versions included
    pub entries_listed: usize,

    /// Directory markers skipped without a probe
    pub directory_markers: usize,

    /// Extra versions of an already probed key
    pub versions_collapsed: usize,

    /// Metadata probes issued
    pub objects_probed: usize,

    /// Probes that succeeded
    pub healthy: usize,

    /// Probes that hit the repair signature
    pub degraded: usize,

    /// Probe failures let through by the skip policy
    pub errors_skipped: usize,
}

impl ScanStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the scan as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Record the verdict for one listing entry.
    pub fn record(&mut self, verdict: &Verdict) {
        self.entries_listed += 1;
        match verdict {
            Verdict::DirectoryMarker => self.directory_markers += 1,
            Verdict::RepeatedKey => self.versions_collapsed += 1,
            Verdict::Healthy => {
                self.objects_probed += 1;
                self.healthy += 1;
            }
            Verdict::Degraded => {
                self.objects_probed += 1;
                self.degraded += 1;
            }
            Verdict::SkippedError(_) => {
                self.objects_probed += 1;
                self.errors_skipped += 1;
            }
        }
    }

    /// Get the duration of the scan.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Calculate the throughput in probes per second.
    pub fn probes_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.objects_probed as f64 / secs
            } else {
                0.0
            }
        })
    }
}
