use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::protocol::get::GetCmd;
use crate::protocol::reply::Reply;
use crate::protocol::set::SetCmd;
use crate::store::Store;

/// Executes a parsed command against the store
#[async_trait]
pub trait Execute {
    async fn execute(&self, store: &Store) -> Reply;
}

/// Supported command types
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// GET key
    Get(GetCmd),
    /// SET key value
    Set(SetCmd),
}

impl Command {
    /// Parse a request line into a Command
    ///
    /// The verb is everything up to the first space and is matched
    /// case-insensitively. The rest of the line is handed to the command's
    /// own parser untouched.
    pub fn parse(request: &str) -> Result<Self> {
        if request.is_empty() {
            return Err(Error::MalformedCommand("empty request".to_string()));
        }

        let (verb, args) = match request.split_once(' ') {
            Some((verb, args)) => (verb, Some(args)),
            None => (request, None),
        };

        match verb.to_ascii_uppercase().as_str() {
            "GET" => GetCmd::parse(args).map(Command::Get),
            "SET" => SetCmd::parse(args).map(Command::Set),
            "" => Err(Error::MalformedCommand("missing command verb".to_string())),
            _ => Err(Error::UnknownCommand(verb.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Get(_) => "GET",
            Command::Set(_) => "SET",
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Command::Get(cmd) => &cmd.key,
            Command::Set(cmd) => &cmd.key,
        }
    }
}

#[async_trait]
impl Execute for Command {
    async fn execute(&self, store: &Store) -> Reply {
        match self {
            Command::Get(cmd) => cmd.execute(store).await,
            Command::Set(cmd) => cmd.execute(store).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_get_command() {
        let cmd = Command::parse("GET mykey").unwrap();
        assert_eq!(cmd, Command::Get(GetCmd::new("mykey")));
        assert_eq!(cmd.name(), "GET");
    }

    #[test]
    fn test_parse_set_command() {
        let cmd = Command::parse(r#"SET mykey {"a": [1, 2]}"#).unwrap();
        assert_eq!(cmd, Command::Set(SetCmd::new("mykey", json!({"a": [1, 2]}))));
        assert_eq!(cmd.key(), "mykey");
    }

    #[test]
    fn test_parse_verb_case_insensitive() {
        assert_eq!(
            Command::parse("get mykey").unwrap(),
            Command::Get(GetCmd::new("mykey"))
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            Command::parse("DEL mykey"),
            Err(Error::UnknownCommand("DEL".to_string()))
        );
        assert_eq!(
            Command::parse("PING"),
            Err(Error::UnknownCommand("PING".to_string()))
        );
    }

    #[test]
    fn test_parse_empty_request() {
        assert!(matches!(
            Command::parse(""),
            Err(Error::MalformedCommand(_))
        ));
        assert!(matches!(
            Command::parse(" mykey"),
            Err(Error::MalformedCommand(_))
        ));
    }

    #[test]
    fn test_parse_verb_without_arguments() {
        assert!(matches!(Command::parse("GET"), Err(Error::MalformedCommand(_))));
        assert!(matches!(Command::parse("SET"), Err(Error::MalformedCommand(_))));
    }

    #[tokio::test]
    async fn test_execute_set_and_get() {
        let store = Store::new();

        let set = Command::parse(r#"SET wallet_info {"type":"eth","addr":"0xabc","amount":42}"#)
            .unwrap();
        assert_eq!(set.execute(&store).await, Reply::Ack);

        let get = Command::parse("GET wallet_info").unwrap();
        assert_eq!(
            get.execute(&store).await,
            Reply::Value(json!({"type": "eth", "addr": "0xabc", "amount": 42}))
        );
    }

    #[tokio::test]
    async fn test_execute_get_not_found() {
        let store = Store::new();
        let get = Command::parse("GET nonexistent_key").unwrap();
        assert_eq!(get.execute(&store).await, Reply::NotFound);
    }
}
