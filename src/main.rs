//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ip_spatial_index` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ip_spatial_index::initialization::init_logger_with;
use ip_spatial_index::{run_index, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let db_path = config.db_path.clone();

    // Run the ingestion using the library
    match run_index(config).await {
        Ok(report) => {
            // Print user-friendly summary
            println!(
                "✅ Indexed {} document{} ({} parsed, {} rejected) in {:.1}s",
                report.documents_indexed,
                if report.documents_indexed == 1 { "" } else { "s" },
                report.records_parsed,
                report.records_rejected,
                report.elapsed_seconds
            );
            println!("Index saved in {}", db_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("ip_spatial_index error: {:#}", e);
            process::exit(1);
        }
    }
}
