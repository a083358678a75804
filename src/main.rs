// src/main.rs

use anyhow::Result;
use clap::Parser;
use sential::cli::Cli;
use sential::config::ConfigBuilder;
use sential::errors::Error;
#[cfg(feature = "progress")]
use sential::progress::IndicatifProgress;
use sential::progress::ProgressReporter;
use sential::run;
use sential::signal::setup_signal_handler;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize logging. RUST_LOG overrides the default directive.
    let default_directive = if cfg!(debug_assertions) {
        "sential=debug"
    } else {
        "sential=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .init();

    log::info!("Starting sential v{}...", env!("CARGO_PKG_VERSION"));
    log::debug!("Raw arguments: {:?}", std::env::args().collect::<Vec<_>>());

    std::panic::set_hook(Box::new(|info| {
        let msg = match info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => s.as_str(),
                None => "Box<Any>",
            },
        };
        eprintln!("Application Error: {}", msg);
    }));

    // --- Setup ---
    let cli = Cli::parse();

    // Show a progress bar only when stderr is a TTY.
    let progress_reporter: Option<Arc<dyn ProgressReporter>> = {
        #[cfg(feature = "progress")]
        {
            if atty::is(atty::Stream::Stderr) {
                Some(Arc::new(IndicatifProgress::new()))
            } else {
                None
            }
        }
        #[cfg(not(feature = "progress"))]
        {
            None
        }
    };

    // --- Configuration & Execution ---
    let config = ConfigBuilder::from_cli(cli).build()?;
    log::debug!("Configuration built successfully.");

    let token = setup_signal_handler()?;

    let result = run(&config, &token, progress_reporter);

    // --- Error Handling ---
    match result {
        Ok(report) => {
            // The signal token carries no deadline, so this is Ctrl+C only.
            if token.is_cancelled() {
                eprintln!("\nOperation cancelled. Partial output was written.");
                std::process::exit(130);
            }
            if let Some(e) = &report.tagger_error {
                if config.strict_tagger {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
                log::warn!("Source symbols are incomplete: {}", e);
            }
        }
        Err(Error::Interrupted) => {
            eprintln!("\nOperation cancelled.");
            std::process::exit(130);
        }
        Err(Error::NoFilesFound) => {
            eprintln!(
                "sential: No files relevant to '{}' were found.",
                config.language.id()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
