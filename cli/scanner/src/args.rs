//! CLI argument definitions for sr-scanner.

use clap::{Parser, ValueEnum};

/// Find objects an S3-compatible store is currently repairing.
///
/// Lists a bucket, probes every object with a metadata request and prints the
/// path of each object answered with `SlowDownRead` (503), one per line.
///
/// ## Examples
///
/// Scan a whole bucket:
///   sr-scanner --endpoint https://minio.local:9000 --access-key KEY \
///       --secret-key SECRET --bucket photos --recursive
///
/// Scan one folder and keep going past unrelated failures:
///   sr-scanner --endpoint http://127.0.0.1:9000 --access-key KEY \
///       --secret-key SECRET --bucket logs --prefix 2024/ --recursive --skip-errors
#[derive(Parser, Debug)]
#[command(name = "sr-scanner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Store Configuration ===
    /// S3 endpoint URL (https enables TLS)
    #[arg(long, env = "SR_S3_ENDPOINT")]
    pub endpoint: String,

    /// S3 access key
    #[arg(long, env = "SR_ACCESS_KEY")]
    pub access_key: String,

    /// S3 secret key
    #[arg(long, env = "SR_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Region to sign requests for
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Disable TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    // === Selection ===
    /// Bucket to scan
    #[arg(short, long, env = "SR_S3_BUCKET")]
    pub bucket: String,

    /// Object or prefix to scan (a leading "/" is ignored)
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// List every object below the prefix instead of only the first level
    #[arg(short, long)]
    pub recursive: bool,

    // === Policy ===
    /// Skip objects that fail with any error other than SlowDownRead
    #[arg(long, alias = "skiperror")]
    pub skip_errors: bool,

    // === Output Options ===
    /// Output format for degraded objects
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormatArg,

    /// Print a scan summary to stderr when done
    #[arg(long)]
    pub summary: bool,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// One absolute object path per line
    Text,
    /// JSON Lines (one JSON object per line)
    Jsonl,
}

impl From<OutputFormatArg> for sr_scanner::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => sr_scanner::OutputFormat::Text,
            OutputFormatArg::Jsonl => sr_scanner::OutputFormat::Jsonl,
        }
    }
}

/// Log level argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warning level (default)
    Warn,
    /// Error level (least verbose)
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl Cli {
    /// Build the scan configuration from the parsed arguments.
    pub fn scan_configuration(&self) -> sr_scanner::ScanConfiguration {
        sr_scanner::ScanConfiguration::new(&self.endpoint, &self.bucket)
            .with_credentials(&self.access_key, &self.secret_key)
            .with_region(&self.region)
            .with_prefix(&self.prefix)
            .with_recursive(self.recursive)
            .with_insecure(self.insecure)
            .with_skip_other_errors(self.skip_errors)
    }
}
