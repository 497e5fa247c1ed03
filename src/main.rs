//! Main entry point for kwik-resolver CLI

use anyhow::Context;
use clap::Parser;
use kwik_resolver::cli::args::VerbosityLevel;
use kwik_resolver::cli::{Args, OutputFormatter};
use kwik_resolver::KwikResolver;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbosity_level())?;
    debug!("Starting kwik-resolver with args: {:?}", args);

    let formatter = OutputFormatter::new(args.verbosity_level()).with_json(args.json);

    let resolver = match KwikResolver::with_config(args.resolver_config()) {
        Ok(resolver) => resolver,
        Err(err) => {
            formatter.print_failure(&err)?;
            std::process::exit(1);
        }
    };

    let start_time = Instant::now();
    match resolver.resolve(&args.url).await {
        Ok(url) => {
            info!("Resolution completed successfully");
            formatter.print_resolved(&url, start_time.elapsed())?;
            Ok(())
        }
        Err(err) => {
            debug!("Resolution failed ({}): {:?}", err.kind(), err);
            formatter.print_failure(&err)?;
            std::process::exit(1);
        }
    }
}

/// Initialize logging system
///
/// Logs go to stderr so stdout only carries the result.
fn init_logging(verbosity: VerbosityLevel) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity.default_log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
