use std::sync::Arc;

use tracing::debug;

use crate::error::Error;
use crate::protocol::{Command, Execute, Reply};
use crate::store::Store;

/// Turns raw requests into replies against a shared store
pub struct Handler {
    store: Arc<Store>,
}

impl Handler {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Execute an already parsed command
    pub async fn handle(&self, command: &Command) -> Reply {
        command.execute(&self.store).await
    }

    /// Parse and execute one raw request. Always yields exactly one reply;
    /// parse failures become error replies.
    pub async fn handle_request(&self, request: &[u8]) -> Reply {
        let request = match std::str::from_utf8(request) {
            Ok(request) => request,
            Err(_) => {
                return Reply::from(Error::MalformedCommand(
                    "request is not valid UTF-8".to_string(),
                ));
            }
        };

        match Command::parse(request) {
            Ok(command) => {
                debug!(command = command.name(), key = command.key(), "executing command");
                self.handle(&command).await
            }
            Err(e) => {
                debug!(error = %e, "rejecting request");
                Reply::from(e)
            }
        }
    }
}
