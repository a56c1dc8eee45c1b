use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::protocol::command::Execute;
use crate::protocol::reply::Reply;
use crate::store::Store;

/// SET command: SET key json
#[derive(Debug, Clone, PartialEq)]
pub struct SetCmd {
    pub key: String,
    pub value: Value,
}

impl SetCmd {
    /// Create a new SET command
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Parse SET arguments (everything after `SET `)
    ///
    /// The key ends at the first whitespace character; the rest of the line,
    /// whitespace and all, must be a JSON document.
    pub fn parse(args: Option<&str>) -> Result<Self> {
        let args = args.ok_or_else(|| {
            Error::MalformedCommand("wrong number of arguments for 'set' command".to_string())
        })?;

        let (key, payload) = args
            .split_once(char::is_whitespace)
            .ok_or_else(|| Error::MalformedCommand("missing value for 'set' command".to_string()))?;

        if key.is_empty() {
            return Err(Error::MalformedCommand(
                "missing key for 'set' command".to_string(),
            ));
        }

        let value = serde_json::from_str(payload)
            .map_err(|e| Error::MalformedCommand(format!("invalid JSON payload: {}", e)))?;

        Ok(SetCmd::new(key, value))
    }
}

#[async_trait]
impl Execute for SetCmd {
    async fn execute(&self, store: &Store) -> Reply {
        store.put(self.key.clone(), self.value.clone());
        Reply::Ack
    }
}
