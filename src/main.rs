// src/main.rs

use anyhow::Result;
use clap::Parser;
use repodigest::cli::Cli;
use repodigest::config::{OutputDestination, QueryBuilder};
use repodigest::errors::Error;
#[cfg(feature = "progress")]
use repodigest::progress::IndicatifProgress;
use repodigest::progress::{NoOpProgress, ProgressReporter};
use repodigest::run;
use repodigest::signal::setup_signal_handler;

fn main() -> Result<()> {
    // Initialize logging. Default to 'info' if RUST_LOG is not set.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                if cfg!(debug_assertions) {
                    "repodigest=debug".parse()?
                } else {
                    "repodigest=info".parse()?
                },
            ),
        )
        .init();

    log::debug!("Starting repodigest v{}...", env!("CARGO_PKG_VERSION"));

    // --- Setup ---
    let cli = Cli::parse();

    // --- Configuration & Execution ---
    let mut query = QueryBuilder::from_cli(&cli)?.build()?;
    if cli.json {
        query.output = None;
    }
    log::debug!("Query built successfully.");

    // Decide whether to show a spinner. Only clones report progress, and only to a TTY.
    let progress_reporter: Box<dyn ProgressReporter> = {
        #[cfg(feature = "progress")]
        {
            if query.is_remote() && atty::is(atty::Stream::Stderr) {
                Box::new(IndicatifProgress::new())
            } else {
                Box::new(NoOpProgress)
            }
        }
        #[cfg(not(feature = "progress"))]
        {
            Box::new(NoOpProgress)
        }
    };

    let cancel = setup_signal_handler()?;

    let result = run(
        &query,
        cli.token.as_deref(),
        &cancel,
        progress_reporter.as_ref(),
    );

    // --- Error Handling ---
    let digest = match result {
        Ok(digest) => digest,
        Err(Error::Interrupted) => {
            eprintln!("\nOperation cancelled.");
            std::process::exit(130);
        }
        Err(Error::NoFilesFound) => {
            eprintln!("repodigest: No files found matching the specified criteria.");
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // --- Report ---
    match &query.output {
        _ if cli.json => println!("{}", serde_json::to_string_pretty(&digest)?),
        Some(OutputDestination::Stdout) => eprintln!("\n{}", digest.summary),
        Some(OutputDestination::File(path)) => {
            println!("Analysis complete! Output written to: {}", path.display());
            println!("\nSummary:\n{}", digest.summary);
        }
        None => println!("{}", digest.summary),
    }

    Ok(())
}
