//! sr-scanner - degraded object scanner for S3-compatible object stores.
//!
//! This crate walks a bucket and finds objects that are currently unreadable
//! because the store is repairing them (the server answers a metadata probe
//! with `SlowDownRead` / 503). It supports:
//!
//! - Lazy, paginated listing (flat or recursive, with versions)
//! - One metadata probe per object, classified as healthy, degraded or failed
//! - A skip policy for failures that are not the degraded signature
//! - Output of degraded keys to stdout as plain paths or JSON lines
//!
//! # Example
//!
//! ```ignore
//! use sr_scanner::{ScanConfiguration, Scanner, S3Store, StdoutOutput, create_s3_client};
//!
//! let config = ScanConfiguration::new("https://minio.local:9000", "my-bucket")
//!     .with_credentials("access", "secret")
//!     .with_prefix("logs/")
//!     .with_recursive(true);
//! config.validate()?;
//!
//! let client = create_s3_client(&config).await?;
//! let scanner = Scanner::new(S3Store::new(client), StdoutOutput::default(), config);
//!
//! let stats = scanner.scan().await?;
//! eprintln!("Found {} degraded objects", stats.degraded);
//! ```

use serde::{Deserialize, Serialize};

pub mod config;
pub mod enumerator;
pub mod output;
pub mod probe;
pub mod s3;
pub mod scanner;
pub mod stats;
pub mod store;
pub mod verifier;

pub use config::{Endpoint, ScanConfiguration, normalize_prefix};
pub use enumerator::Enumerator;
pub use output::{Output, OutputFormat, StdoutOutput};
pub use probe::{ProbeOutcome, SLOW_DOWN_READ_CODE, SLOW_DOWN_READ_STATUS};
pub use s3::{S3Store, create_s3_client};
pub use scanner::Scanner;
pub use stats::ScanStats;
pub use store::{
    ListOptions, MemoryStore, ObjectDescriptor, ObjectStore, ObjectStream, StatError,
};
pub use verifier::{Verdict, Verifier};

/// A degraded object found during a scan.
///
/// This is what gets written to the result output, one per object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedObject {
    /// Absolute path of the object inside the bucket (`/` followed by the key)
    pub path: String,

    /// Bucket the object lives in
    pub bucket: String,

    /// Version reported by the listing (if versions were listed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

impl DegradedObject {
    /// Create a DegradedObject for a listed descriptor.
    pub fn new(bucket: impl Into<String>, descriptor: &ObjectDescriptor) -> Self {
        Self {
            path: format!("/{}", descriptor.key),
            bucket: bucket.into(),
            version_id: descriptor.version_id.clone(),
        }
    }
}
