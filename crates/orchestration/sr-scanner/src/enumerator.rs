//! Enumeration of candidate objects.

use tracing::debug;

use crate::config::ScanConfiguration;
use crate::store::{ListOptions, ObjectStore, ObjectStream};

/// Produces the listing entries a scan will verify.
///
/// Pagination and store calls happen inside the returned stream, so nothing
/// is fetched until it is polled.
pub struct Enumerator<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    bucket: &'a str,
    options: ListOptions,
}

impl<'a, S: ObjectStore + ?Sized> Enumerator<'a, S> {
    /// Create an enumerator over `bucket` with explicit listing options.
    pub fn new(store: &'a S, bucket: &'a str, options: ListOptions) -> Self {
        Self {
            store,
            bucket,
            options,
        }
    }

    /// Create an enumerator from a scan configuration.
    ///
    /// The prefix is normalized and versions and metadata are requested.
    pub fn from_config(store: &'a S, config: &'a ScanConfiguration) -> Self {
        Self::new(store, &config.bucket, config.list_options())
    }

    /// Listing options in effect.
    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Start the listing.
    ///
    /// An `Err` item ends the stream and is fatal for the scan.
    pub fn descriptors(&self) -> ObjectStream<'_> {
        debug!(
            bucket = %self.bucket,
            prefix = %self.options.prefix,
            recursive = self.options.recursive,
            "Listing objects"
        );
        self.store.list_objects(self.bucket, &self.options)
    }
}
