//! Error types for boxwalk

use thiserror::Error;

/// Result type alias
pub type BwResult<T> = Result<T, BwError>;

/// Main error type
#[derive(Error, Debug)]
pub enum BwError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Rate limited: retry after {retry_after_secs:?}s")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider API error ({provider}): {message}")]
    ProviderApi { provider: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Timeout")]
    Timeout,

    #[error("Visitor failed: {0}")]
    Visitor(String),
}

/// Broad failure class, used by callers to decide how to report an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing input, raised before any request is sent
    Configuration,
    /// Failure while talking to the remote API
    Transport,
    /// Failure raised by the action applied to an item
    Visitor,
}

impl BwError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BwError::Config(_) | BwError::InvalidArgument(_) => ErrorKind::Configuration,
            // Local I/O after startup only happens in the listing sink.
            BwError::Visitor(_) | BwError::Io(_) => ErrorKind::Visitor,
            _ => ErrorKind::Transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(BwError::Config("no token".into()).kind(), ErrorKind::Configuration);
        assert_eq!(
            BwError::InvalidArgument("page size".into()).kind(),
            ErrorKind::Configuration
        );

        assert_eq!(BwError::Network("reset".into()).kind(), ErrorKind::Transport);
        assert_eq!(BwError::AuthFailed("401".into()).kind(), ErrorKind::Transport);
        assert_eq!(BwError::RateLimited { retry_after_secs: None }.kind(), ErrorKind::Transport);
        assert_eq!(BwError::Timeout.kind(), ErrorKind::Transport);
        assert_eq!(
            BwError::ProviderApi { provider: "box".into(), message: "boom".into() }.kind(),
            ErrorKind::Transport
        );

        assert_eq!(BwError::Visitor("closed".into()).kind(), ErrorKind::Visitor);
    }

    #[test]
    fn test_error_display() {
        let err = BwError::NotFound("folder 42".into());
        assert_eq!(format!("{}", err), "Not found: folder 42");

        let err = BwError::RateLimited { retry_after_secs: Some(60) };
        assert!(format!("{}", err).contains("60"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: BwError = io_err.into();
        assert!(matches!(err, BwError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Visitor);
    }
}
