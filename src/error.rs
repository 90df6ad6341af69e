use thiserror::Error;

/// Unified error type for the proxy checker
#[derive(Error, Debug)]
pub enum CheckError {
    // Candidate format errors
    #[error("Invalid format ({0})")]
    InvalidFormat(String),

    // Probe errors
    #[error("Proxy connection failed: {0}")]
    ProxyConnectionFailed(String),

    #[error("SOCKS5 handshake failed: {0}")]
    Socks5Handshake(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unexpected status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Operation timed out")]
    Timeout,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Input file unreadable: {path}: {source}")]
    InputUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for checker operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Coarse classification of a [`CheckError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Candidate failed structural validation
    Format,
    /// Connection, handshake, timeout or upstream response failure
    Network,
    /// The run cannot start
    Configuration,
    /// Unexpected fault inside the checker itself
    Internal,
}

impl CheckError {
    /// Get the taxonomy bucket for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckError::InvalidFormat(_) => ErrorKind::Format,

            CheckError::ProxyConnectionFailed(_)
            | CheckError::Socks5Handshake(_)
            | CheckError::Http(_)
            | CheckError::UnexpectedStatus { .. }
            | CheckError::Timeout => ErrorKind::Network,

            CheckError::InvalidConfig(_)
            | CheckError::InputNotFound { .. }
            | CheckError::InputUnreadable { .. } => ErrorKind::Configuration,

            CheckError::Io(_) | CheckError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether this error aborts the whole run rather than a single candidate
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

// Convert from hyper errors
impl From<hyper::Error> for CheckError {
    fn from(err: hyper::Error) -> Self {
        CheckError::Http(err.to_string())
    }
}

// Convert from URL parse errors
impl From<url::ParseError> for CheckError {
    fn from(err: url::ParseError) -> Self {
        CheckError::InvalidConfig(format!("invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            CheckError::InvalidFormat("bad".to_string()).kind(),
            ErrorKind::Format
        );
        assert_eq!(CheckError::Timeout.kind(), ErrorKind::Network);
        assert_eq!(
            CheckError::UnexpectedStatus { status: 403 }.kind(),
            ErrorKind::Network
        );
        assert_eq!(
            CheckError::InputNotFound {
                path: "proxy.txt".to_string()
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            CheckError::InputUnreadable {
                path: "proxy.txt".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            CheckError::Internal("boom".to_string()).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            CheckError::from(std::io::Error::from(std::io::ErrorKind::WriteZero)).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_only_configuration_errors_are_fatal() {
        assert!(CheckError::InvalidConfig("bad".to_string()).is_fatal());
        assert!(!CheckError::InvalidFormat("bad".to_string()).is_fatal());
        assert!(!CheckError::ProxyConnectionFailed("refused".to_string()).is_fatal());
        assert!(!CheckError::Internal("boom".to_string()).is_fatal());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CheckError::UnexpectedStatus { status: 503 }.to_string(),
            "Unexpected status 503"
        );
        assert_eq!(CheckError::Timeout.to_string(), "Operation timed out");
        assert_eq!(
            CheckError::InvalidFormat("invalid port 'http'".to_string()).to_string(),
            "Invalid format (invalid port 'http')"
        );
    }
}
