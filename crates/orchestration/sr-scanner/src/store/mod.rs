//! Object store abstraction.
//!
//! The scanner only needs two operations from a store:
//! - [`ObjectStore::list_objects`] - a lazy stream of listing entries
//! - [`ObjectStore::stat_object`] - a metadata probe for one key
//!
//! Implementations include:
//! - [`S3Store`](crate::s3::S3Store) - any S3-compatible endpoint
//! - [`MemoryStore`] - scripted in-memory store for tests and dry runs

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use sr_error::Result;
use std::pin::Pin;
use thiserror::Error;

/// Path separator used by S3-compatible stores.
pub const SEPARATOR: char = '/';

/// Stream of listing entries. An `Err` item ends the listing.
pub type ObjectStream<'a> = Pin<Box<dyn Stream<Item = Result<ObjectDescriptor>> + Send + 'a>>;

/// One entry returned by a bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// The object key (full path within the bucket)
    pub key: String,

    /// Version id, when versions were listed
    pub version_id: Option<String>,

    /// Whether this is the current version of the key
    pub is_latest: bool,

    /// Whether this entry is a delete marker rather than data
    pub is_delete_marker: bool,

    /// Size in bytes, when metadata was listed
    pub size: Option<u64>,

    /// Entity tag, when metadata was listed
    pub etag: Option<String>,

    /// Last modified timestamp, when metadata was listed
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectDescriptor {
    /// Create a descriptor for the latest version of `key` with no metadata.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_latest: true,
            ..Default::default()
        }
    }

    /// Set the version id.
    pub fn with_version(mut self, version_id: impl Into<String>, is_latest: bool) -> Self {
        self.version_id = Some(version_id.into());
        self.is_latest = is_latest;
        self
    }

    /// Mark the entry as a delete marker.
    pub fn with_delete_marker(mut self, is_delete_marker: bool) -> Self {
        self.is_delete_marker = is_delete_marker;
        self
    }

    /// Set the size in bytes.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Whether the key denotes a directory (ends with the separator).
    ///
    /// Directory markers are never probed.
    pub fn is_directory_marker(&self) -> bool {
        self.key.ends_with(SEPARATOR)
    }
}

/// Options for a listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Key prefix, already normalized
    pub prefix: String,

    /// List every descendant instead of the first level only
    pub recursive: bool,

    /// List every version of every key
    pub with_versions: bool,

    /// Populate size, etag and timestamps on descriptors
    pub with_metadata: bool,

    /// Entries per listing request; the store's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl ListOptions {
    /// Create options for `prefix` with everything else off.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Enable or disable recursive listing.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enable or disable version listing.
    pub fn with_versions(mut self, with_versions: bool) -> Self {
        self.with_versions = with_versions;
        self
    }

    /// Enable or disable metadata on descriptors.
    pub fn with_metadata(mut self, with_metadata: bool) -> Self {
        self.with_metadata = with_metadata;
        self
    }

    /// Cap the number of entries per listing request.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    /// Page size as the S3 `max-keys` parameter.
    pub fn max_keys(&self) -> Option<i32> {
        self.page_size
            .map(|size| i32::try_from(size).unwrap_or(i32::MAX))
    }

    /// The delimiter to send: the separator for flat listings, none otherwise.
    pub fn delimiter(&self) -> Option<String> {
        (!self.recursive).then(|| SEPARATOR.to_string())
    }
}

/// A failed metadata probe, as reported by the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StatError {
    /// Machine-readable error code (e.g. `NoSuchKey`)
    pub code: Option<String>,

    /// HTTP status of the response, if one was received
    pub status: Option<u16>,

    /// Human-readable description
    pub message: String,
}

impl StatError {
    /// Create an error carrying a code and status.
    pub fn new(code: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create an error for a failure that never produced a response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            code: None,
            status: None,
            message: message.into(),
        }
    }
}

/// Trait for object store backends.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lazily list `bucket` according to `options`.
    ///
    /// Pages are fetched on demand as the stream is polled.
    fn list_objects<'a>(&'a self, bucket: &'a str, options: &'a ListOptions) -> ObjectStream<'a>;

    /// Fetch the metadata of the latest version of `key`.
    async fn stat_object(&self, bucket: &str, key: &str) -> std::result::Result<(), StatError>;
}
