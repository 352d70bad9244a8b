//! invadersd — the Pod Invaders backend daemon.
//!
//! Assembles the game backend subsystems from one config file:
//! - URL monitors (periodic reachability probes)
//! - Kill dedup cache
//! - Highscore ledger (in-memory or redb)
//! - Pod sourcing for game rounds
//!
//! # Usage
//!
//! ```text
//! invadersd --config invaders.toml watch --url https://shop.example.test
//! invadersd pods --count 20
//! invadersd --config invaders.toml highscores
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use invaders_core::InvadersConfig;
use invadersd::{Services, validate_monitor_url};

const DEFAULT_LOG_FILTER: &str =
    "info,invadersd=debug,invaders_health=debug,invaders_state=debug,invaders_pods=debug";

#[derive(Parser)]
#[command(name = "invadersd", about = "Pod Invaders game backend")]
struct Cli {
    /// Path to invaders.toml. Built-in defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Monitor URLs and log their status every interval until Ctrl-C.
    Watch {
        /// URL to monitor (repeatable).
        #[arg(long = "url", required = true)]
        urls: Vec<String>,
    },
    /// Print one game round of pods as JSON.
    Pods {
        /// Number of pods in the round.
        #[arg(long, default_value = "10")]
        count: usize,
    },
    /// Print all stored highscores as JSON.
    Highscores,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => InvadersConfig::from_file(path)?,
        None => InvadersConfig::default(),
    };
    let services = Services::from_config(config)?;

    match cli.command {
        Command::Watch { urls } => run_watch(&services, &urls).await,
        Command::Pods { count } => {
            let round = services.next_round(count).await;
            println!("{}", serde_json::to_string_pretty(&round)?);
            Ok(())
        }
        Command::Highscores => {
            let scores = services.ledger.get();
            if scores.is_empty() {
                warn!("no highscores found");
            }
            println!("{}", serde_json::to_string_pretty(&scores)?);
            Ok(())
        }
    }
}

async fn run_watch(services: &Services, urls: &[String]) -> anyhow::Result<()> {
    for url in urls {
        validate_monitor_url(url)?;
    }
    for url in urls {
        services.monitors.start(url)?;
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut report = tokio::time::interval(services.monitors.interval());

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                info!("shutdown signal received");
                break;
            }
            _ = report.tick() => {
                for id in services.monitors.active_monitors() {
                    if let Ok(status) = services.monitors.status(&id) {
                        info!(id = %status.id, url = %status.url, status = %status.status, "monitor status");
                    }
                }
            }
        }
    }

    services.shutdown();
    info!("invadersd stopped");
    Ok(())
}
