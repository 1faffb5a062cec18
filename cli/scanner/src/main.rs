//! sr-scanner CLI
//!
//! Reports objects that an S3-compatible store answers with `SlowDownRead`.

use clap::Parser;

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Initialize logging (to stderr, so stdout is clean for degraded paths)
    run::init_logging(args.log_level)?;

    let summary = args.summary;
    let stats = run::execute(args).await?;

    if summary {
        eprintln!();
        eprintln!("Scan completed:");
        eprintln!("  Entries listed:     {}", stats.entries_listed);
        eprintln!("  Directory markers:  {}", stats.directory_markers);
        eprintln!("  Versions collapsed: {}", stats.versions_collapsed);
        eprintln!("  Objects probed:     {}", stats.objects_probed);
        eprintln!("  Healthy:            {}", stats.healthy);
        eprintln!("  Degraded:           {}", stats.degraded);
        eprintln!("  Errors skipped:     {}", stats.errors_skipped);

        if let Some(duration) = stats.duration() {
            eprintln!(
                "  Duration:           {:.2}s",
                duration.num_milliseconds() as f64 / 1000.0
            );

            if let Some(pps) = stats.probes_per_second() {
                eprintln!("  Throughput:         {:.1} probes/sec", pps);
            }
        }
    }

    Ok(())
}
