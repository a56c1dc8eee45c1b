//! Line protocol implementation
//!
//! Requests are single text lines (`SET <key> <json>` or `GET <key>`), replies
//! are single lines of JSON text. This module provides request framing,
//! command parsing and reply encoding.

pub mod command;
pub mod frame;
pub mod get;
pub mod reply;
pub mod set;

pub use command::{Command, Execute};
pub use frame::Parser;
pub use reply::{ACK, Reply};
