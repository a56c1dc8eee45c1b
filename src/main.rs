use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use jsonkv::cli::{Cli, Command, ConnectArgs, GetArgs, ServeArgs, SetArgs};
use jsonkv::{Client, Config, LogConfig, Server};

fn init_tracing(log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &log.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file '{}'", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }
    Ok(())
}

fn init_client_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(args: ServeArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(addr) = args.addr {
        config.server_addr = addr;
    }
    if let Some(level) = args.log_level {
        config.log.level = level;
    }
    config.validate()?;

    init_tracing(&config.log)?;
    info!("Starting jsonkv");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let server = Arc::new(
        Server::bind(&config)
            .await
            .with_context(|| format!("failed to bind {}", config.server_addr))?,
    );
    info!("Server listening on: {}", server.local_addr());

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {}", e);
            }
        })
        .await;

    Ok(())
}

async fn connect(args: &ConnectArgs) -> Result<Client> {
    let timeout = Duration::from_millis(args.timeout_ms);
    Client::connect(args.server, timeout)
        .await
        .with_context(|| format!("failed to connect to {}", args.server))
}

async fn get(args: GetArgs) -> Result<()> {
    let mut client = connect(&args.connect).await?;
    let value = client.get(&args.key).await?;
    println!("{}", value);
    client.close().await?;
    Ok(())
}

async fn set(args: SetArgs) -> Result<()> {
    let value: Value = serde_json::from_str(&args.value)
        .with_context(|| format!("value is not valid JSON: {}", args.value))?;
    let mut client = connect(&args.connect).await?;
    client.set(&args.key, &value).await?;
    client.close().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Get(args) => {
            init_client_tracing();
            get(args).await
        }
        Command::Set(args) => {
            init_client_tracing();
            set(args).await
        }
    }
}
