//! S3 client and store implementation.
//!
//! This module provides the S3-backed [`ObjectStore`](crate::store::ObjectStore):
//! - Client configuration for S3-compatible endpoints
//! - Optional TLS verification bypass
//! - Paginated version listing with streaming
//! - Metadata probes with structured error extraction

mod client;
mod error;
mod list;
mod store;
mod tls;

pub use client::create_s3_client;
pub use error::MINIO_ERROR_CODE_HEADER;
pub use list::list_objects;
pub use store::S3Store;
