//! HTTP client that skips TLS certificate verification.
//!
//! Used only when the operator passes `--insecure` against an `https`
//! endpoint, typically a store with a self-signed certificate.

use aws_config::ConfigLoader;
use aws_smithy_runtime::client::http::hyper_014::HyperClientBuilder;
use rustls::client::{ServerCertVerified, ServerCertVerifier};
use rustls::{Certificate, ClientConfig, ServerName};
use sr_error::{Result, ScanError};
use std::sync::Arc;
use std::time::SystemTime;

/// Accepts any server certificate.
struct AcceptAnyServerCertificate;

impl ServerCertVerifier for AcceptAnyServerCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &Certificate,
        _intermediates: &[Certificate],
        _server_name: &ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: SystemTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }
}

fn insecure_tls_config() -> Result<ClientConfig> {
    let config = ClientConfig::builder()
        .with_safe_default_cipher_suites()
        .with_safe_default_kx_groups()
        .with_protocol_versions(rustls::DEFAULT_VERSIONS)
        .map_err(|e| ScanError::Client(format!("unable to configure TLS: {e}")))?
        .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCertificate))
        .with_no_client_auth();

    Ok(config)
}

/// Install an HTTP client on `loader` that does not verify certificates.
pub(crate) fn with_insecure_tls(loader: ConfigLoader) -> Result<ConfigLoader> {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(insecure_tls_config()?)
        .https_or_http()
        .enable_http1()
        .build();

    Ok(loader.http_client(HyperClientBuilder::new().build(connector)))
}
