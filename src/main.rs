//! # chainsaw CLI
//!
//! Command-line interface for the chainsaw library.

use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chainsaw::ChainsawError;
use chainsaw::cli::Args;
use chainsaw::progress::{FlushCallback, print_saved};
use chainsaw::splitter::{RunReport, split_file};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChainsawError> {
    let start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = args.to_config()?;
    tracing::debug!(?config, "loaded configuration");

    let json = args.json;

    if config.dry_run && !json {
        println!("Running in dry-run mode, no file will be written");
    }

    let on_flush: FlushCallback = if json {
        chainsaw::progress::no_progress()
    } else {
        Arc::new(print_saved)
    };
    let report = split_file(&args.file, config, on_flush)?;
    tracing::debug!(elapsed = ?start.elapsed(), "done");

    if json {
        print_json(&report);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!();
    if report.stopped_early {
        println!("Not after filter used, lines after specified date skipped");
    }
    println!("{} lines dropped", report.dropped);
    println!("{} lines saved", report.processed);
    if let Some(passed) = report.passed {
        println!("{} lines passed", passed);
    }
    if let Some(total) = report.total {
        println!("{} lines in given file", total);
    }
    if report.reopened_groups > 0 {
        println!(
            "warning: {} date groups reappeared out of order; their files may have been overwritten",
            report.reopened_groups
        );
    }
}

fn print_json(report: &RunReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: cannot serialize report: {}", e),
    }
}
