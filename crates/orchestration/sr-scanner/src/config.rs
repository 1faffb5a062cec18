//! Scan configuration.

use serde::{Deserialize, Serialize};
use sr_error::{Result, ScanError};
use url::Url;

use crate::store::ListOptions;

/// Default region used when none is given. S3-compatible stores rarely care.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Immutable input for one scan run.
///
/// Built once at startup, checked with [`validate`](ScanConfiguration::validate),
/// and passed by reference to everything that needs it.
#[derive(Clone, Serialize, Deserialize)]
pub struct ScanConfiguration {
    /// Store endpoint URL; the scheme decides whether TLS is used
    pub endpoint: String,

    /// Static access key
    pub access_key: String,

    /// Static secret key
    #[serde(skip_serializing, default)]
    pub secret_key: String,

    /// Region to sign requests for
    pub region: String,

    /// Bucket to scan
    pub bucket: String,

    /// Key prefix to restrict the scan to (may start with `/`)
    pub prefix: String,

    /// List every descendant key instead of only the first level
    pub recursive: bool,

    /// Disable TLS certificate verification
    pub insecure: bool,

    /// Skip probe failures that are not the degraded signature
    pub skip_other_errors: bool,
}

impl Default for ScanConfiguration {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            region: DEFAULT_REGION.to_string(),
            bucket: String::new(),
            prefix: String::new(),
            recursive: false,
            insecure: false,
            skip_other_errors: false,
        }
    }
}

impl std::fmt::Debug for ScanConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanConfiguration")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .field("recursive", &self.recursive)
            .field("insecure", &self.insecure)
            .field("skip_other_errors", &self.skip_other_errors)
            .finish()
    }
}

impl ScanConfiguration {
    /// Create a new configuration for `bucket` on `endpoint`.
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the static credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = access_key.into();
        self.secret_key = secret_key.into();
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enable or disable recursive listing.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enable or disable TLS certificate verification bypass.
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Enable or disable skipping of non-degraded probe failures.
    pub fn with_skip_other_errors(mut self, skip: bool) -> Self {
        self.skip_other_errors = skip;
        self
    }

    /// Check that every required field is present and the endpoint parses.
    ///
    /// Runs before any store interaction; the messages are shown to the operator as-is.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(ScanError::Config("endpoint is not provided".to_string()));
        }
        if self.access_key.is_empty() {
            return Err(ScanError::Config("access key is not provided".to_string()));
        }
        if self.secret_key.is_empty() {
            return Err(ScanError::Config("secret key is not provided".to_string()));
        }
        if self.bucket.is_empty() {
            return Err(ScanError::Config("bucket should not be empty".to_string()));
        }
        Endpoint::parse(&self.endpoint)?;
        Ok(())
    }

    /// The parsed endpoint.
    pub fn endpoint(&self) -> Result<Endpoint> {
        Endpoint::parse(&self.endpoint)
    }

    /// The prefix with a single leading separator removed.
    pub fn normalized_prefix(&self) -> &str {
        normalize_prefix(&self.prefix)
    }

    /// Listing options for this scan.
    ///
    /// Versions and metadata are always requested.
    pub fn list_options(&self) -> ListOptions {
        ListOptions::new(self.normalized_prefix())
            .with_recursive(self.recursive)
            .with_versions(true)
            .with_metadata(true)
    }
}

/// Strip a single leading `/` from a prefix.
pub fn normalize_prefix(prefix: &str) -> &str {
    prefix.strip_prefix('/').unwrap_or(prefix)
}

/// A parsed store endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Scheme, host and port; any path in the input is dropped
    pub url: String,

    /// Whether the endpoint uses TLS
    pub secure: bool,
}

impl Endpoint {
    /// Parse an endpoint URL such as `https://minio.local:9000`.
    pub fn parse(raw: &str) -> Result<Self> {
        let parsed = Url::parse(raw)
            .map_err(|e| ScanError::Config(format!("invalid endpoint '{raw}': {e}")))?;

        let scheme = parsed.scheme().to_ascii_lowercase();
        let secure = match scheme.as_str() {
            "https" => true,
            "http" => false,
            other => {
                return Err(ScanError::Config(format!(
                    "invalid endpoint '{raw}': unsupported scheme '{other}'"
                )));
            }
        };

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ScanError::Config(format!("invalid endpoint '{raw}': missing host")))?;

        let url = match parsed.port() {
            Some(port) => format!("{scheme}://{host}:{port}"),
            None => format!("{scheme}://{host}"),
        };

        Ok(Self { url, secure })
    }
}
