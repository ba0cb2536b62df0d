//! parallel-du - Parallel Disk Usage Calculator
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use parallel_du::config::{CliArgs, ScanConfig};
use parallel_du::progress::{print_header, print_summary, ProgressReporter};
use parallel_du::walker::Coordinator;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose);

    // Validate and create config; a bad thread count also gets the usage text
    let config = match ScanConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", CliArgs::command().render_help());
            return Err(e).context("Invalid configuration");
        }
    };

    if config.show_progress {
        print_header(config.roots.len(), config.concurrency_limit);
    }

    let progress = config.show_progress.then(ProgressReporter::new);

    let mut coordinator = Coordinator::new(config.roots.clone(), config.concurrency_limit)
        .context("Failed to initialize scanner")?;

    if let Some(ref p) = progress {
        p.set_status("Scanning...");
        let reporter = p.clone();
        coordinator = coordinator.on_progress(move |snapshot| reporter.update(snapshot));
    }

    // Setup signal handler for graceful shutdown
    let shutdown_flag = coordinator.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, finishing in-flight scans...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    // Run the scan
    let summary = coordinator.run().context("Scan failed")?;

    if let Some(ref p) = progress {
        if summary.completed {
            p.finish_and_clear();
        } else {
            p.finish("Scan interrupted");
        }
        print_summary(&summary);
    }

    if !summary.completed {
        info!("Scan was interrupted before completion");
    }

    if !summary.errors.is_empty() {
        info!(errors = summary.errors.len(), "Scan completed with errors");
    }

    println!("{}", summary.total_bytes);

    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("parallel_du=debug,warn")
    } else {
        EnvFilter::new("parallel_du=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
