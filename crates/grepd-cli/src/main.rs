#![deny(unsafe_code)]

//! grepd CLI — process bootstrap for the search daemon.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use grepd_config::AppConfig;
use grepd_core::http::ApiState;
use grepd_core::{Library, SearchEngine, ShutdownGate};

/// grepd — a line-search HTTP daemon with graceful shutdown.
#[derive(Parser)]
#[command(name = "grepd", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "grepd.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the grepd server.
    Start,

    /// Check whether a grepd server is answering on the configured address.
    Status,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let config = if config_found {
        AppConfig::load(&cli.config)
            .await
            .map_err(|e| anyhow::anyhow!(e))?
    } else {
        AppConfig::default()
    };

    // Verbosity flag wins over the configured level
    let filter = match cli.verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    if !config_found {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    match cli.command {
        Commands::Start => cmd_start(config).await?,
        Commands::Status => cmd_status(&config).await?,
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

async fn cmd_start(config: AppConfig) -> Result<()> {
    info!("Starting grepd server");

    let library = Library::from_config(&config.library);
    let gate = Arc::new(ShutdownGate::new(Duration::from_secs(
        config.server.grace_period_secs,
    )));

    let state = Arc::new(ApiState {
        engine: SearchEngine::new(library),
        gate: gate.clone(),
        wait_delay: Duration::from_secs(config.server.wait_delay_secs),
    });

    tokio::spawn(watch_signals(gate));

    let addr = format!(
        "{}:{}",
        config.server.listen_addr, config.server.listen_port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    grepd_core::http::serve(listener, state).await?;
    info!("grepd stopped");
    Ok(())
}

/// Wait for an interrupt or terminate signal, then start draining.
async fn watch_signals(gate: Arc<ShutdownGate>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("SIGINT received"),
                    _ = term.recv() => info!("SIGTERM received"),
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                info!("SIGINT received");
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("interrupt received");
    }

    gate.begin_drain();
}

async fn cmd_status(config: &AppConfig) -> Result<()> {
    let url = format!(
        "http://{}:{}/",
        config.server.listen_addr, config.server.listen_port
    );
    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            println!("grepd is running at {url}");
        }
        Ok(resp) => {
            println!("grepd answered {} at {url}", resp.status());
        }
        Err(_) => {
            println!("grepd is not reachable at {url}");
        }
    }
    Ok(())
}

fn cmd_config(path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", path.display());
    }
    Ok(())
}
