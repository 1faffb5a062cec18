//! Scripted in-memory object store.

use async_trait::async_trait;
use futures::stream;
use sr_error::{Result, ScanError};
use std::collections::HashSet;
use std::sync::Mutex;

use super::{ListOptions, ObjectDescriptor, ObjectStore, ObjectStream, SEPARATOR, StatError};
use crate::probe::{SLOW_DOWN_READ_CODE, SLOW_DOWN_READ_STATUS};

const DEFAULT_PAGE_SIZE: usize = 1000;

struct MemoryObject {
    key: String,
    size: u64,
    versions: usize,
    probe: std::result::Result<(), StatError>,
}

/// In-memory store whose listing and probe results are scripted up front.
///
/// Keys are listed in insertion order, split into pages of
/// [`with_page_size`](MemoryStore::with_page_size) entries. Every probe is
/// recorded so callers can check which keys were touched.
pub struct MemoryStore {
    bucket: Option<String>,
    objects: Vec<MemoryObject>,
    page_size: usize,
    failing_page: Option<(usize, String)>,
    probes: Mutex<Vec<String>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            bucket: None,
            objects: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            failing_page: None,
            probes: Mutex::new(Vec::new()),
        }
    }
}

impl MemoryStore {
    /// Create an empty store that accepts any bucket name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only answer for `bucket`; listing any other bucket fails.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Add a readable object.
    pub fn with_object(self, key: impl Into<String>) -> Self {
        self.push(key.into(), Ok(()))
    }

    /// Add an object whose probe fails with the degraded signature.
    pub fn with_degraded_object(self, key: impl Into<String>) -> Self {
        let key = key.into();
        let error = StatError::new(
            SLOW_DOWN_READ_CODE,
            SLOW_DOWN_READ_STATUS,
            format!("{key} is being repaired"),
        );
        self.push(key, Err(error))
    }

    /// Add an object whose probe fails with `error`.
    pub fn with_failing_object(self, key: impl Into<String>, error: StatError) -> Self {
        self.push(key.into(), Err(error))
    }

    /// Give the most recently added object `count` versions in total.
    pub fn with_versions(mut self, count: usize) -> Self {
        if let Some(object) = self.objects.last_mut() {
            object.versions = count.max(1);
        }
        self
    }

    /// Set the size of the most recently added object.
    pub fn with_size(mut self, size: u64) -> Self {
        if let Some(object) = self.objects.last_mut() {
            object.size = size;
        }
        self
    }

    /// Set the number of entries per listing page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make the request for listing page `page` (1-based) fail with `message`.
    pub fn with_listing_failure(mut self, page: usize, message: impl Into<String>) -> Self {
        self.failing_page = Some((page, message.into()));
        self
    }

    /// Keys probed so far, in probe order.
    pub fn probed_keys(&self) -> Vec<String> {
        self.probes.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn push(mut self, key: String, probe: std::result::Result<(), StatError>) -> Self {
        self.objects.push(MemoryObject {
            key,
            size: 0,
            versions: 1,
            probe,
        });
        self
    }

    /// Every entry the listing would return in insertion order, ignoring
    /// pagination. Common prefixes are flagged `true`.
    fn entries(&self, options: &ListOptions) -> Vec<(ObjectDescriptor, bool)> {
        let mut entries = Vec::new();
        let mut prefixes = HashSet::new();

        for object in &self.objects {
            let Some(rest) = object.key.strip_prefix(options.prefix.as_str()) else {
                continue;
            };

            if !options.recursive {
                if let Some(idx) = rest.find(SEPARATOR) {
                    let common = format!("{}{}", options.prefix, &rest[..=idx]);
                    if prefixes.insert(common.clone()) {
                        entries.push((ObjectDescriptor::new(common), true));
                    }
                    continue;
                }
            }

            let versions = if options.with_versions { object.versions } else { 1 };
            for n in (1..=versions).rev() {
                let mut descriptor = ObjectDescriptor::new(&object.key);
                if options.with_versions {
                    descriptor = descriptor.with_version(format!("v{n}"), n == versions);
                }
                if options.with_metadata {
                    descriptor = descriptor.with_size(object.size);
                }
                entries.push((descriptor, false));
            }
        }

        entries
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn list_objects<'a>(&'a self, bucket: &'a str, options: &'a ListOptions) -> ObjectStream<'a> {
        if let Some(expected) = &self.bucket {
            if expected != bucket {
                let error = ScanError::listing(
                    bucket,
                    "NoSuchBucket: the specified bucket does not exist",
                );
                return Box::pin(stream::iter(vec![Err(error)]));
            }
        }

        let entries = self.entries(options);
        let page_size = options.page_size.unwrap_or(self.page_size).max(1);
        let page_count = entries.len().div_ceil(page_size).max(1);
        let mut items: Vec<Result<ObjectDescriptor>> = Vec::with_capacity(entries.len());
        let mut pages = entries.chunks(page_size);

        for page in 1..=page_count {
            if let Some((failing, message)) = &self.failing_page {
                if *failing == page {
                    items.push(Err(ScanError::listing(bucket, message)));
                    break;
                }
            }
            // Like S3, a page lists its objects before its common prefixes
            if let Some(chunk) = pages.next() {
                let (prefixes, objects): (Vec<_>, Vec<_>) =
                    chunk.iter().cloned().partition(|(_, is_prefix)| *is_prefix);
                items.extend(objects.into_iter().map(|(d, _)| Ok(d)));
                items.extend(prefixes.into_iter().map(|(d, _)| Ok(d)));
            }
        }

        Box::pin(stream::iter(items))
    }

    async fn stat_object(&self, _bucket: &str, key: &str) -> std::result::Result<(), StatError> {
        if let Ok(mut probes) = self.probes.lock() {
            probes.push(key.to_string());
        }

        match self.objects.iter().find(|o| o.key == key) {
            Some(object) => object.probe.clone(),
            None => Err(StatError::new(
                "NoSuchKey",
                404,
                "The specified key does not exist.",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn collect(store: &MemoryStore, options: &ListOptions) -> Vec<Result<ObjectDescriptor>> {
        store.list_objects("bucket", options).collect().await
    }

    fn keys(items: &[Result<ObjectDescriptor>]) -> Vec<String> {
        items
            .iter()
            .filter_map(|i| i.as_ref().ok())
            .map(|d| d.key.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_recursive_listing_keeps_insertion_order() {
        let store = MemoryStore::new()
            .with_object("b.txt")
            .with_object("a/one.txt")
            .with_object("a.txt");

        let items = collect(&store, &ListOptions::new("").with_recursive(true)).await;
        assert_eq!(keys(&items), vec!["b.txt", "a/one.txt", "a.txt"]);
    }

    #[tokio::test]
    async fn test_flat_listing_collapses_prefixes() {
        let store = MemoryStore::new()
            .with_object("a.txt")
            .with_object("logs/1.log")
            .with_object("logs/2.log")
            .with_object("logs/")
            .with_object("z.txt");

        let items = collect(&store, &ListOptions::new("")).await;
        assert_eq!(keys(&items), vec!["a.txt", "z.txt", "logs/"]);

        let items = collect(&store, &ListOptions::new("logs/")).await;
        assert_eq!(keys(&items), vec!["logs/1.log", "logs/2.log", "logs/"]);
    }

    #[tokio::test]
    async fn test_common_prefixes_follow_objects_of_their_page() {
        let store = MemoryStore::new()
            .with_object("a/x.txt")
            .with_object("b.txt")
            .with_object("c/y.txt")
            .with_object("d.txt");

        let items = collect(&store, &ListOptions::new("").with_page_size(2)).await;
        assert_eq!(keys(&items), vec!["b.txt", "a/", "d.txt", "c/"]);
    }

    #[tokio::test]
    async fn test_version_listing_latest_first() {
        let store = MemoryStore::new().with_object("a.txt").with_versions(3);

        let items = collect(&store, &ListOptions::new("").with_versions(true)).await;
        let descriptors: Vec<_> = items.into_iter().map(|i| i.unwrap()).collect();

        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0].version_id.as_deref(), Some("v3"));
        assert!(descriptors[0].is_latest);
        assert!(!descriptors[2].is_latest);
    }

    #[tokio::test]
    async fn test_listing_failure_after_first_page() {
        let store = MemoryStore::new()
            .with_object("a")
            .with_object("b")
            .with_object("c")
            .with_page_size(2)
            .with_listing_failure(2, "connection reset");

        let items = collect(&store, &ListOptions::new("").with_recursive(true)).await;
        assert_eq!(items.len(), 3);
        assert_eq!(keys(&items), vec!["a", "b"]);
        assert!(items[2].is_err());
    }

    #[tokio::test]
    async fn test_unknown_bucket_fails_listing() {
        let store = MemoryStore::new().with_bucket("photos").with_object("a");

        let items: Vec<_> = store
            .list_objects("videos", &ListOptions::new(""))
            .collect()
            .await;
        assert_eq!(items.len(), 1);
        assert!(items[0].as_ref().unwrap_err().to_string().contains("NoSuchBucket"));
    }

    #[tokio::test]
    async fn test_stat_records_probes() {
        let store = MemoryStore::new()
            .with_object("a")
            .with_degraded_object("b");

        assert!(store.stat_object("bucket", "a").await.is_ok());
        let err = store.stat_object("bucket", "b").await.unwrap_err();
        assert_eq!(err.status, Some(503));
        let err = store.stat_object("bucket", "missing").await.unwrap_err();
        assert_eq!(err.code.as_deref(), Some("NoSuchKey"));

        assert_eq!(store.probed_keys(), vec!["a", "b", "missing"]);
    }
}
