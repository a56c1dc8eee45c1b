//! JSON key-value server with a line-oriented request/reply protocol.
//!
//! - [`store`] holds the shared in-memory map from keys to JSON values.
//! - [`protocol`] frames request lines, parses `SET`/`GET` and encodes replies.
//! - [`handler`] runs one raw request against the store and always yields a reply.
//! - [`server`] accepts TCP connections and serves each in strict lockstep.
//! - [`client`] is a connection handle speaking the same protocol.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod protocol;
pub mod server;
pub mod store;

pub use client::{Client, ClientError};
pub use config::{Config, LogConfig};
pub use error::Error;
pub use server::Server;
pub use store::Store;
