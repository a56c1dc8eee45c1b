use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::protocol::command::Execute;
use crate::protocol::reply::Reply;
use crate::store::Store;

/// GET command: GET key
///
/// The key is the whole remainder of the request line, embedded whitespace
/// included. Nothing is trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct GetCmd {
    pub key: String,
}

impl GetCmd {
    /// Create a new GET command
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Parse GET arguments (everything after `GET `)
    pub fn parse(args: Option<&str>) -> Result<Self> {
        match args {
            Some(key) if !key.is_empty() => Ok(GetCmd::new(key)),
            _ => Err(Error::MalformedCommand(
                "wrong number of arguments for 'get' command".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Execute for GetCmd {
    async fn execute(&self, store: &Store) -> Reply {
        match store.get(&self.key) {
            Ok(value) => Reply::Value(value),
            Err(e) => Reply::from(e),
        }
    }
}
