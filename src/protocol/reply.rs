use serde_json::{Value, json};

use crate::error::Error;

/// Acknowledgment text sent for every successful SET
pub const ACK: &str = "done.";

/// Reply to a single request. Every variant encodes to one line of JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// SET acknowledgment, encoded as the JSON string `"done."`
    Ack,
    /// Stored value for a GET
    Value(Value),
    /// GET on a key that was never set, encoded as `null`
    NotFound,
    /// Request could not be served
    Error { kind: &'static str, message: String },
}

impl Reply {
    /// Encode Reply to wire bytes, newline included
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = self.to_json().to_string().into_bytes();
        buf.push(b'\n');
        buf
    }

    fn to_json(&self) -> Value {
        match self {
            Reply::Ack => Value::String(ACK.to_string()),
            Reply::Value(value) => value.clone(),
            Reply::NotFound => Value::Null,
            Reply::Error { kind, message } => json!({
                "error": kind,
                "message": message,
            }),
        }
    }
}

impl From<Error> for Reply {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(_) => Reply::NotFound,
            other => Reply::Error {
                kind: other.kind(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ack() {
        assert_eq!(Reply::Ack.encode(), b"\"done.\"\n");
    }

    #[test]
    fn test_encode_not_found() {
        assert_eq!(Reply::NotFound.encode(), b"null\n");
    }

    #[test]
    fn test_encode_value_is_single_line() {
        let reply = Reply::Value(json!({"text": "line one\nline two"}));
        let encoded = reply.encode();
        assert_eq!(encoded.iter().filter(|&&b| b == b'\n').count(), 1);
        assert_eq!(encoded.last(), Some(&b'\n'));
    }

    #[test]
    fn test_error_reply_is_json() {
        let reply = Reply::from(Error::UnknownCommand("DEL".to_string()));
        let encoded = reply.encode();
        let parsed: Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(parsed["error"], "unknown_command");
        assert_eq!(parsed["message"], "unknown command 'DEL'");
    }

    #[test]
    fn test_not_found_error_maps_to_null() {
        let reply = Reply::from(Error::NotFound("k".to_string()));
        assert_eq!(reply, Reply::NotFound);
    }
}
