// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! hdds-seq-publisher - Publishes `sequences` samples with owned and loaned data
//!
//! Writes two instances per round on the same topic: one whose sequence
//! memory belongs to the sample, one whose sequence borrows a block owned by
//! this program. Lengths cycle through `1..=MAX_SEQUENCE_LEN`.

mod config;
mod publisher;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::PublisherConfig;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Sequences publisher
#[derive(Parser, Debug)]
#[command(name = "hdds-seq-publisher")]
#[command(version = "0.1.0")]
#[command(about = "Publish sequence samples with owned and loaned buffers")]
struct Args {
    /// DDS domain ID
    #[arg(short, long)]
    domain: Option<u32>,

    /// Rounds to publish (0 = until Ctrl+C)
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Pause between rounds in milliseconds
    #[arg(short, long)]
    period_ms: Option<u64>,

    /// YAML configuration file (CLI flags take precedence)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PublisherConfig::load_from_file(path)?,
        None => PublisherConfig::default(),
    };
    config.apply_overrides(args.domain, args.count, args.period_ms);
    config.validate()?;

    let running = Arc::new(AtomicBool::new(true));

    // Ctrl+C handler
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")?;

    println!("hdds-seq-publisher v{}", hdds_seq::VERSION);
    println!("  Domain:  {}", config.domain_id);
    println!("  Topic:   {}", config.topic_name);
    if config.sample_count == 0 {
        println!("  Samples: unlimited (Ctrl+C to stop)");
    } else {
        println!("  Samples: {}", config.sample_count);
    }
    println!("  Period:  {} ms\n", config.send_period_ms);

    let start = Instant::now();
    let report = publisher::run(&config, &running)?;

    println!(
        "\nDone: {} rounds, {} samples written, {} write errors in {:.1}s",
        report.rounds,
        report.samples_written,
        report.write_errors,
        start.elapsed().as_secs_f64()
    );

    if report.teardown_errors > 0 {
        bail!("{} teardown step(s) failed", report.teardown_errors);
    }
    Ok(())
}
