//! S3-backed object store.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use tracing::trace;

use super::error::{error_code, error_message, error_status};
use super::list::list_objects;
use crate::store::{ListOptions, ObjectStore, ObjectStream, StatError};

/// [`ObjectStore`] over any S3-compatible endpoint.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Wrap an S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The wrapped client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn list_objects<'a>(&'a self, bucket: &'a str, options: &'a ListOptions) -> ObjectStream<'a> {
        list_objects(&self.client, bucket, options)
    }

    async fn stat_object(&self, bucket: &str, key: &str) -> std::result::Result<(), StatError> {
        trace!(bucket = bucket, key = key, "HeadObject");

        self.client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| stat_error(&e))
    }
}

/// Extract code, status and a one-line message from a failed HeadObject.
fn stat_error(err: &SdkError<HeadObjectError, HttpResponse>) -> StatError {
    StatError {
        code: error_code(err).map(str::to_string),
        status: error_status(err),
        message: error_message(err),
    }
}
