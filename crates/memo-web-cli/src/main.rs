//! Memo web CLI
//!
//! Thin wrapper around memo-web-core for checking page behaviour from the
//! command line.
//!
//! ## Usage
//!
//! ```bash
//! # Derive an album name from a label
//! memo-web slug "Summer Trip 2024"
//!
//! # Show the swap decision for response codes
//! memo-web swap 200 422 502
//!
//! # Replay a scripted page session and print the report
//! memo-web replay session.json
//!
//! # Use custom element ids / status codes
//! memo-web --config client.json replay session.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use memo_web_core::{
    label_to_name, replay, ClientConfig, FeatureKey, Scenario, SwapDetail, SwapPolicy,
};
use tracing_subscriber::EnvFilter;

/// Memo photo albums - page behaviour tools
#[derive(Parser)]
#[command(name = "memo-web")]
#[command(version = "0.1.0")]
#[command(about = "Memo photo albums - page behaviour tools")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Client config file (JSON); defaults match the server templates
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert album labels to url friendly names
    Slug {
        /// Labels to convert, one name printed per label
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Show how responses are swapped
    Swap {
        /// HTTP status codes
        #[arg(required = true)]
        statuses: Vec<u16>,
    },

    /// Replay a scenario file against an in-memory page
    Replay {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List feature areas and their registration flags
    Features,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("memo_web_core={level},memo_web={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ClientConfig::default(),
    };

    match cli.command {
        Commands::Slug { labels } => {
            for label in labels {
                println!("{}", label_to_name(&label));
            }
        }
        Commands::Swap { statuses } => {
            for status in statuses {
                print_swap(&config.swap, status);
            }
        }
        Commands::Replay { scenario, json } => {
            let loaded = Scenario::load(&scenario)
                .with_context(|| format!("failed to load scenario {}", scenario.display()))?;
            let report = replay(loaded, config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for step in &report.steps {
                    println!("#{:<3} {:<15} handled: {}", step.index, step.step, step.handled);
                    if let Some(swap) = &step.swap {
                        println!("      swap: {}, error: {}", swap.should_swap, swap.is_error);
                    }
                }
                println!();
                println!("Registered features: {}", report.registered.len());
                for key in &report.registered {
                    println!("  {} ({})", key, key.flag_name());
                }
                println!("Listeners: {}", report.listeners);
                println!("Captcha renders: {}", report.captcha_renders.len());
                println!("Lightbox inits: {}", report.lightbox_inits.len());
                println!("Elements: {}", report.dom.len());
            }
        }
        Commands::Features => {
            for key in FeatureKey::ALL {
                println!("{:<12} {}", key.to_string(), key.flag_name());
            }
        }
    }

    Ok(())
}

fn print_swap(policy: &SwapPolicy, status: u16) {
    let mut detail = SwapDetail::engine_default(status);
    let source = if policy.apply(&mut detail) {
        "policy"
    } else {
        "engine default"
    };
    println!(
        "{}: swap={} error={} ({})",
        status, detail.should_swap, detail.is_error, source
    );
}
