//! S3 client creation.

use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_sdk_s3::Client;
use sr_error::Result;
use tracing::{debug, warn};

use super::tls;
use crate::config::ScanConfiguration;

/// Create an S3 client from a scan configuration.
///
/// The endpoint scheme decides TLS, credentials are static, addressing is
/// path-style and SDK retries are turned off: a probe is answered once.
pub async fn create_s3_client(config: &ScanConfiguration) -> Result<Client> {
    use aws_config::Region;

    let endpoint = config.endpoint()?;

    let credentials = aws_sdk_s3::config::Credentials::new(
        &config.access_key,
        &config.secret_key,
        None,
        None,
        "sr-scanner",
    );

    let mut aws_config_loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .endpoint_url(&endpoint.url)
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled());

    if endpoint.secure && config.insecure {
        warn!(endpoint = %endpoint.url, "TLS certificate verification is disabled");
        aws_config_loader = tls::with_insecure_tls(aws_config_loader)?;
    }

    let aws_config = aws_config_loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true)
        .build();

    debug!(
        endpoint = %endpoint.url,
        secure = endpoint.secure,
        region = %config.region,
        "Created S3 client"
    );

    Ok(Client::from_conf(s3_config))
}
