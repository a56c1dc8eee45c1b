use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the key-value server until Ctrl-C.
    Serve(ServeArgs),
    /// Print the JSON value stored under a key (`null` if missing).
    Get(GetArgs),
    /// Store a JSON value under a key.
    Set(SetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on, overrides the configuration file.
    #[arg(long)]
    pub addr: Option<String>,

    /// Log level, overrides the configuration file.
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Address of the server.
    #[arg(long, default_value = "127.0.0.1:5555")]
    pub server: SocketAddr,

    /// Milliseconds to wait for connect and for each reply.
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,
}

#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    pub key: String,

    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    pub key: String,

    /// Value as JSON text.
    pub value: String,

    #[command(flatten)]
    pub connect: ConnectArgs,
}
