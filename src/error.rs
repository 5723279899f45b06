//! Error handling for invite-forge

use thiserror::Error;

/// Main error type for invite-forge
#[derive(Error, Debug, Clone)]
pub enum InviteForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Unexpected HTTP status for code '{code}': {status} {reason}")]
    UnexpectedStatus {
        code: String,
        status: u16,
        reason: String,
    },

    #[error("Timeout error: {operation} timed out")]
    Timeout { operation: String },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl InviteForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create an error for a status the lookup endpoint should never return
    pub fn unexpected_status(code: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            code: code.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error came from the egress path rather than the remote service
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your flags or .env file", message)
            }
            Self::Network { message, status_code, url } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                let target = url.as_ref().map_or(String::new(), |u| format!(" [{}]", u));
                format!(
                    "❌ Network error{}{}: {}\n💡 Check your internet connection and proxies",
                    status, target, message
                )
            }
            Self::UnexpectedStatus { code, status, reason } => {
                format!(
                    "❌ Lookup for '{}' returned {} {}\n💡 The endpoint may have changed or blocked this egress path",
                    code, status, reason
                )
            }
            Self::Timeout { operation } => {
                format!("⏱️  Operation '{}' timed out\n💡 Try a larger --request-timeout or fewer proxies", operation)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 The lookup endpoint returned an unexpected payload", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input format", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for InviteForgeError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout("HTTP request")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {}", describe_chain(&err)), status_code, url)
        } else if err.is_request() {
            Self::network(format!("Request failed: {}", describe_chain(&err)), status_code, url)
        } else if err.is_builder() {
            Self::config(format!("Invalid HTTP client settings: {}", err))
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

/// Render an error with its sources, e.g. the proxy or TLS failure under a connect error
fn describe_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl From<serde_json::Error> for InviteForgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<std::io::Error> for InviteForgeError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, InviteForgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::InviteForgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::InviteForgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::InviteForgeError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::InviteForgeError::validation(format!($fmt, $($arg)*))
    };
}
