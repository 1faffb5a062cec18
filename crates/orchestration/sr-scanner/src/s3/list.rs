//! S3 object listing with pagination support.

use async_stream::try_stream;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::DateTime as SmithyDateTime;
use aws_sdk_s3::types::{CommonPrefix, DeleteMarkerEntry, Object, ObjectVersion};
use chrono::{DateTime, Utc};
use futures::Stream;
use sr_error::{Result, ScanError};
use std::cmp::Reverse;

use super::error::error_message;
use crate::store::{ListOptions, ObjectDescriptor, ObjectStream};

/// List `bucket` as a lazy stream of descriptors.
///
/// Uses `ListObjectVersions` when versions are requested and
/// `ListObjectsV2` otherwise. Flat listings send the `/` delimiter and yield
/// each common prefix after the objects of its page.
pub fn list_objects<'a>(
    client: &'a Client,
    bucket: &'a str,
    options: &'a ListOptions,
) -> ObjectStream<'a> {
    if options.with_versions {
        Box::pin(list_versions(client, bucket, options))
    } else {
        Box::pin(list_latest(client, bucket, options))
    }
}

fn list_latest<'a>(
    client: &'a Client,
    bucket: &'a str,
    options: &'a ListOptions,
) -> impl Stream<Item = Result<ObjectDescriptor>> + Send + 'a {
    let prefix = (!options.prefix.is_empty()).then(|| options.prefix.clone());
    let delimiter = options.delimiter();
    let max_keys = options.max_keys();
    let with_metadata = options.with_metadata;

    try_stream! {
        let mut continuation_token: Option<String> = None;

        loop {
            let resp = client
                .list_objects_v2()
                .bucket(bucket)
                .set_prefix(prefix.clone())
                .set_delimiter(delimiter.clone())
                .set_max_keys(max_keys)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| ScanError::listing(bucket, error_message(&e)))?;

            for obj in resp.contents.unwrap_or_default() {
                if let Some(descriptor) = from_object(obj, with_metadata) {
                    yield descriptor;
                }
            }

            for common in resp.common_prefixes.unwrap_or_default() {
                if let Some(descriptor) = from_common_prefix(common) {
                    yield descriptor;
                }
            }

            if resp.is_truncated == Some(true) {
                continuation_token = resp.next_continuation_token;
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }
    }
}

fn list_versions<'a>(
    client: &'a Client,
    bucket: &'a str,
    options: &'a ListOptions,
) -> impl Stream<Item = Result<ObjectDescriptor>> + Send + 'a {
    let prefix = (!options.prefix.is_empty()).then(|| options.prefix.clone());
    let delimiter = options.delimiter();
    let max_keys = options.max_keys();
    let with_metadata = options.with_metadata;

    try_stream! {
        let mut key_marker: Option<String> = None;
        let mut version_id_marker: Option<String> = None;

        loop {
            let resp = client
                .list_object_versions()
                .bucket(bucket)
                .set_prefix(prefix.clone())
                .set_delimiter(delimiter.clone())
                .set_max_keys(max_keys)
                .set_key_marker(key_marker.take())
                .set_version_id_marker(version_id_marker.take())
                .send()
                .await
                .map_err(|e| ScanError::listing(bucket, error_message(&e)))?;

            let versions = resp
                .versions
                .unwrap_or_default()
                .into_iter()
                .filter_map(|v| from_version(v, with_metadata));
            let delete_markers = resp
                .delete_markers
                .unwrap_or_default()
                .into_iter()
                .filter_map(from_delete_marker);

            for descriptor in merge_versions(versions.chain(delete_markers).collect()) {
                yield descriptor;
            }

            for common in resp.common_prefixes.unwrap_or_default() {
                if let Some(descriptor) = from_common_prefix(common) {
                    yield descriptor;
                }
            }

            if resp.is_truncated == Some(true) {
                key_marker = resp.next_key_marker;
                version_id_marker = resp.next_version_id_marker;
                if key_marker.is_none() {
                    break;
                }
            } else {
                break;
            }
        }
    }
}

/// Order a page of versions and delete markers by key, newest first per key.
///
/// S3 returns the two kinds in separate lists; the verifier relies on all
/// entries of a key being adjacent.
fn merge_versions(mut entries: Vec<ObjectDescriptor>) -> Vec<ObjectDescriptor> {
    entries.sort_by(|a, b| {
        a.key
            .cmp(&b.key)
            .then_with(|| b.is_latest.cmp(&a.is_latest))
            .then_with(|| Reverse(a.last_modified).cmp(&Reverse(b.last_modified)))
    });
    entries
}

fn from_object(obj: Object, with_metadata: bool) -> Option<ObjectDescriptor> {
    let key = obj.key.filter(|k| !k.is_empty())?;
    let mut descriptor = ObjectDescriptor::new(key);

    if with_metadata {
        descriptor.size = obj.size.map(|s| s.max(0) as u64);
        descriptor.etag = obj.e_tag;
        descriptor.last_modified = obj.last_modified.and_then(to_chrono);
    }

    Some(descriptor)
}

fn from_version(version: ObjectVersion, with_metadata: bool) -> Option<ObjectDescriptor> {
    let key = version.key.filter(|k| !k.is_empty())?;
    let mut descriptor = ObjectDescriptor::new(key);
    descriptor.version_id = version.version_id;
    descriptor.is_latest = version.is_latest.unwrap_or(false);
    descriptor.last_modified = version.last_modified.and_then(to_chrono);

    if with_metadata {
        descriptor.size = version.size.map(|s| s.max(0) as u64);
        descriptor.etag = version.e_tag;
    }

    Some(descriptor)
}

fn from_delete_marker(marker: DeleteMarkerEntry) -> Option<ObjectDescriptor> {
    let key = marker.key.filter(|k| !k.is_empty())?;
    let mut descriptor = ObjectDescriptor::new(key).with_delete_marker(true);
    descriptor.version_id = marker.version_id;
    descriptor.is_latest = marker.is_latest.unwrap_or(false);
    descriptor.last_modified = marker.last_modified.and_then(to_chrono);

    Some(descriptor)
}

fn from_common_prefix(common: CommonPrefix) -> Option<ObjectDescriptor> {
    common
        .prefix
        .filter(|p| !p.is_empty())
        .map(ObjectDescriptor::new)
}

fn to_chrono(t: SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(t.secs(), t.subsec_nanos())
}
