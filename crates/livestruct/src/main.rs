// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! livestruct CLI
//!
//! Serves the demo record over HTTP, or reads from a running server.
//!
//! # Usage
//!
//! ```bash
//! # Serve on the default port 8080 (or $PORT)
//! livestruct
//!
//! # Custom port and update interval
//! livestruct --port 9000 --update-interval-ms 250
//!
//! # Using configuration file
//! livestruct --config livestruct.toml
//!
//! # Read schema and current data from a server
//! livestruct fetch --url http://127.0.0.1:8080
//! ```

use clap::{Parser, Subcommand};
use livestruct::demo::Person;
use livestruct::http::{DATA_PATH, HEALTH_PATH, SCHEMA_PATH};
use livestruct::schema::Schema;
use livestruct::{router, spawn_updater, AppState, ExportClient, ExportService, RecordStore, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Live record export server
#[derive(Parser, Debug)]
#[command(name = "livestruct")]
#[command(about = "Serve a live record over HTTP as a schema plus binary snapshots")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP server port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Interval between record updates (milliseconds)
    #[arg(long)]
    update_interval_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the demo record (default)
    Serve,

    /// Fetch the schema and current data from a running server
    Fetch {
        /// Server base URL
        #[arg(short, long, default_value = "http://127.0.0.1:8080")]
        url: String,

        /// Print the encoded bytes instead of the decoded value
        #[arg(long)]
        raw: bool,
    },

    /// Print the schema metadata of the demo record
    Schema,

    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "livestruct.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = build_config(&args)?;

    // Initialize logging
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match args.command {
        None | Some(Commands::Serve) => cmd_serve(config).await,
        Some(Commands::Fetch { url, raw }) => cmd_fetch(&url, raw).await,
        Some(Commands::Schema) => cmd_schema(),
        Some(Commands::GenConfig { output }) => cmd_gen_config(output),
    }
}

fn build_config(args: &Args) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = match args.config {
        Some(ref path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    // Command-line flags override file values
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(ref bind) = args.bind {
        config.bind = bind.clone();
    }
    if let Some(interval) = args.update_interval_ms {
        config.update_interval_ms = interval;
    }
    if let Some(ref level) = args.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn cmd_serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr()?;

    let store = Arc::new(RecordStore::new(Person::default()));
    let updater = spawn_updater(store.clone(), config.update_interval(), Person::tick);
    let state = AppState::new(ExportService::new(store)?).with_updater(updater.clone());
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("livestruct v{}", env!("CARGO_PKG_VERSION"));
    info!("HTTP server listening on http://{}", listener.local_addr()?);
    info!("Endpoint: {}", SCHEMA_PATH);
    info!("Endpoint: {}", DATA_PATH);
    info!("Endpoint: {}", HEALTH_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
            }
            info!("Shutting down...");
        })
        .await?;

    updater.stop();
    info!("Applied {} updates", updater.generation());
    Ok(())
}

async fn cmd_fetch(url: &str, raw: bool) -> Result<(), Box<dyn std::error::Error>> {
    let client = ExportClient::new(url)?;

    if raw {
        let bytes = client.fetch_raw().await?;
        let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        println!("{}", hex.join(" "));
        return Ok(());
    }

    let schema = client.fetch_schema().await?;
    let value = client.fetch_data(&schema).await?;

    println!("Schema:");
    println!("{}", String::from_utf8_lossy(&schema.to_metadata()?));
    println!();
    println!("Data:");
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_schema() -> Result<(), Box<dyn std::error::Error>> {
    let metadata = Schema::of::<Person>()?.to_metadata()?;
    println!("{}", String::from_utf8_lossy(&metadata));
    Ok(())
}

fn cmd_gen_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig {
        update_interval_ms: 500,
        ..Default::default()
    };

    let content = format!(
        "# livestruct configuration\n# Generated by livestruct gen-config\n\n{}",
        config.to_toml()?
    );
    std::fs::write(&output, content)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}
