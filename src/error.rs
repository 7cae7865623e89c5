//! Error handling for the NUT exporter crate.

/// A specialized `Result` type for NUT exporter operations.
pub type Result<T> = std::result::Result<T, NutError>;

/// The main error type for NUT exporter operations.
#[derive(Debug, thiserror::Error)]
pub enum NutError {
    /// The connection to a NUT server could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// Reading from or writing to an established connection failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server sent something that violates the NUT protocol
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Prometheus registration or encoding failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NutError {
    /// Create a new connection error
    pub fn connection_error(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a new transport error
    pub fn transport_error(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new protocol error
    pub fn protocol_error(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error leaves the connection it happened on unusable.
    pub fn is_fatal_to_connection(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Transport(_) | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NutError::protocol_error("expected \"BEGIN LIST UPS\"");
        assert_eq!(
            err.to_string(),
            "Protocol error: expected \"BEGIN LIST UPS\""
        );

        let err = NutError::connection_error("localhost:3493: refused");
        assert!(err.to_string().starts_with("Connection error"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(NutError::transport_error("eof").is_fatal_to_connection());
        assert!(NutError::connection_error("refused").is_fatal_to_connection());
        assert!(!NutError::protocol_error("bad prefix").is_fatal_to_connection());
        assert!(!NutError::config_error("no hosts").is_fatal_to_connection());
    }
}
