//! Main execution logic for the sr-scanner CLI.

use anyhow::{Context, Result};
use sr_scanner::{S3Store, ScanStats, Scanner, StdoutOutput, create_s3_client};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::args::{Cli, LogLevel};

/// Initialize logging.
///
/// `RUST_LOG` wins over `--log-level` when set.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let level: Level = level.into();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
    });

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // stdout carries only degraded paths
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")?;

    Ok(())
}

/// Execute the scanner with the provided arguments.
pub async fn execute(args: Cli) -> Result<ScanStats> {
    let config = args.scan_configuration();

    // Nothing touches the store until the configuration is complete
    config.validate()?;

    let client = create_s3_client(&config).await?;
    let output = StdoutOutput::new(args.output_format.into());

    let scanner = Scanner::new(S3Store::new(client), output, config);
    let stats = scanner.scan().await?;

    Ok(stats)
}
