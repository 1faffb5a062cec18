//! One-line diagnostics for failed S3 calls.

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};

/// Response header MinIO uses to carry the error code of bodiless responses.
pub const MINIO_ERROR_CODE_HEADER: &str = "x-minio-error-code";

/// Error code of a failed call.
///
/// HEAD responses have no body to parse a code from, so the MinIO error
/// header is used when the SDK found none.
pub(crate) fn error_code<E: ProvideErrorMetadata>(
    err: &SdkError<E, HttpResponse>,
) -> Option<&str> {
    err.code().or_else(|| {
        err.raw_response()
            .and_then(|raw| raw.headers().get(MINIO_ERROR_CODE_HEADER))
    })
}

/// HTTP status of a failed call, if a response was received.
pub(crate) fn error_status<E>(err: &SdkError<E, HttpResponse>) -> Option<u16> {
    err.raw_response().map(|raw| raw.status().as_u16())
}

/// Describe a failed call on one line.
///
/// Calls answered by the store read `"{code}: {message} (HTTP {status})"`.
/// Calls that never got a response (dispatch, timeout, construction) read as
/// the chain of error sources.
pub(crate) fn error_message<E>(err: &SdkError<E, HttpResponse>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let Some(status) = error_status(err) else {
        return source_chain(err);
    };

    let code = error_code(err);
    let message = err.message().filter(|m| !m.is_empty());

    match (code, message) {
        (Some(code), Some(message)) => format!("{code}: {message} (HTTP {status})"),
        (Some(code), None) => format!("{code} (HTTP {status})"),
        (None, Some(message)) => format!("{message} (HTTP {status})"),
        (None, None) => format!("HTTP {status}"),
    }
}

fn source_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }

    message
}
