use thiserror::Error;

/// Errors produced while decoding or executing a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Request could not be decoded into a command
    #[error("malformed command: {0}")]
    MalformedCommand(String),
    /// Leading verb is not one the server understands
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    /// Key has never been set
    #[error("key not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Stable identifier used in error replies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedCommand(_) => "malformed_command",
            Error::UnknownCommand(_) => "unknown_command",
            Error::NotFound(_) => "not_found",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert_eq!(
            Error::MalformedCommand("x".into()).kind(),
            "malformed_command"
        );
        assert_eq!(Error::UnknownCommand("DEL".into()).kind(), "unknown_command");
        assert_eq!(Error::NotFound("k".into()).kind(), "not_found");
    }

    #[test]
    fn test_error_display() {
        let err = Error::UnknownCommand("DEL".to_string());
        assert_eq!(err.to_string(), "unknown command 'DEL'");
    }
}
