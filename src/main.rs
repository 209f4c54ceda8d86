use anyhow::Result;
use auditly::cli::Cli;
use auditly::config::Config;
use auditly::run;
use clap::Parser;
use colored::*;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::from_default_paths()?.unwrap_or_default(),
    };
    let args = config.merge_with_cli(&args);

    if let Err(e) = run(args, &config).await {
        eprintln!("{} {}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
