//! Scanner integration tests using LocalStack.
//!
//! These tests verify that the scanner lists and probes real S3 buckets
//! without reporting healthy objects.

use crate::common::{CollectingOutput, LocalStackTestContext};
use futures::TryStreamExt;
use sr_error::ScanError;
use sr_scanner::{ListOptions, ObjectStore, S3Store, Scanner, create_s3_client};

async fn seeded_context(bucket: &str) -> Option<LocalStackTestContext> {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return None;
    }

    ctx.create_bucket(bucket).await.unwrap();
    ctx.put_object(bucket, "a.txt", "alpha").await.unwrap();
    ctx.put_object(bucket, "b.txt", "bravo").await.unwrap();
    ctx.put_object(bucket, "dir/", "").await.unwrap();
    ctx.put_object(bucket, "dir/c.txt", "charlie").await.unwrap();
    ctx.put_object(bucket, "logs/2024/d.txt", "delta").await.unwrap();

    Some(ctx)
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_healthy_bucket_reports_nothing() {
    let bucket = "sr-healthy-bucket";
    let Some(ctx) = seeded_context(bucket).await else {
        return;
    };

    let config = ctx.scan_config(bucket).with_recursive(true);
    let client = create_s3_client(&config).await.unwrap();
    let output = CollectingOutput::new();

    let scanner = Scanner::new(S3Store::new(client), output.clone(), config);
    let stats = scanner.scan().await.unwrap();

    assert!(output.paths().is_empty());
    assert_eq!(stats.entries_listed, 5);
    assert_eq!(stats.directory_markers, 1);
    assert_eq!(stats.objects_probed, 4);
    assert_eq!(stats.healthy, 4);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_flat_listing_skips_common_prefixes() {
    let bucket = "sr-flat-bucket";
    let Some(ctx) = seeded_context(bucket).await else {
        return;
    };

    let config = ctx.scan_config(bucket);
    let client = create_s3_client(&config).await.unwrap();

    let scanner = Scanner::new(S3Store::new(client), CollectingOutput::new(), config);
    let stats = scanner.scan().await.unwrap();

    // a.txt, b.txt plus the dir/ and logs/ prefixes
    assert_eq!(stats.objects_probed, 2);
    assert_eq!(stats.directory_markers, 2);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_prefix_limits_scan() {
    let bucket = "sr-prefix-bucket";
    let Some(ctx) = seeded_context(bucket).await else {
        return;
    };

    let config = ctx
        .scan_config(bucket)
        .with_prefix("/logs/")
        .with_recursive(true);
    let client = create_s3_client(&config).await.unwrap();

    let scanner = Scanner::new(S3Store::new(client), CollectingOutput::new(), config);
    let stats = scanner.scan().await.unwrap();

    assert_eq!(stats.entries_listed, 1);
    assert_eq!(stats.healthy, 1);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_versions_probed_once_per_key() {
    let bucket = "sr-versioned-bucket";
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    ctx.create_bucket(bucket).await.unwrap();
    ctx.enable_versioning(bucket).await.unwrap();
    for body in ["one", "two", "three"] {
        ctx.put_object(bucket, "report.csv", body).await.unwrap();
    }

    let config = ctx.scan_config(bucket).with_recursive(true);
    let client = create_s3_client(&config).await.unwrap();

    let scanner = Scanner::new(S3Store::new(client), CollectingOutput::new(), config);
    let stats = scanner.scan().await.unwrap();

    assert_eq!(stats.entries_listed, 3);
    assert_eq!(stats.objects_probed, 1);
    assert_eq!(stats.versions_collapsed, 2);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_bucket_fails_listing() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let config = ctx.scan_config("sr-bucket-that-does-not-exist");
    let client = create_s3_client(&config).await.unwrap();

    let scanner = Scanner::new(S3Store::new(client), CollectingOutput::new(), config);
    let err = scanner.scan().await.unwrap_err();

    assert!(matches!(err, ScanError::Listing { .. }));
}

async fn list_keys(store: &S3Store, bucket: &str, options: &ListOptions) -> Vec<String> {
    store
        .list_objects(bucket, options)
        .map_ok(|descriptor| descriptor.key)
        .try_collect()
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_latest_listing_follows_continuation_tokens() {
    let bucket = "sr-latest-listing-bucket";
    let Some(ctx) = seeded_context(bucket).await else {
        return;
    };

    let client = create_s3_client(&ctx.scan_config(bucket)).await.unwrap();
    let store = S3Store::new(client);

    // Five keys at two per page needs three ListObjectsV2 requests
    let options = ListOptions::new("").with_recursive(true).with_page_size(2);
    let keys = list_keys(&store, bucket, &options).await;
    assert_eq!(
        keys,
        vec!["a.txt", "b.txt", "dir/", "dir/c.txt", "logs/2024/d.txt"]
    );

    let options = ListOptions::new("").with_page_size(2);
    let keys = list_keys(&store, bucket, &options).await;
    assert_eq!(keys, vec!["a.txt", "b.txt", "dir/", "logs/"]);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_version_listing_follows_key_markers() {
    let bucket = "sr-version-listing-bucket";
    let Some(ctx) = seeded_context(bucket).await else {
        return;
    };

    let client = create_s3_client(&ctx.scan_config(bucket)).await.unwrap();
    let store = S3Store::new(client);

    let options = ListOptions::new("")
        .with_recursive(true)
        .with_versions(true)
        .with_page_size(2);
    let keys = list_keys(&store, bucket, &options).await;
    assert_eq!(
        keys,
        vec!["a.txt", "b.txt", "dir/", "dir/c.txt", "logs/2024/d.txt"]
    );
}
