//! Error types for the terminal

use thiserror::Error;

use crate::provider::Provider;

/// Terminal-wide error type
///
/// Every upstream call resolves to one of these; the orchestrator turns them
/// into "keep the last good value" plus a log line, so none of them ever
/// reaches the presentation layer.
#[derive(Error, Debug)]
pub enum TerminalError {
    /// Request could not be sent or the connection failed mid-flight
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered, but with a non-2xx status or an error payload
    #[error("Provider error ({provider}{}): {message}", format_status(.status))]
    Provider {
        provider: Provider,
        status: Option<u16>,
        message: String,
    },

    /// The provider answered 2xx but a field we need was missing or unparseable
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// A credentialed service was called without its credential
    #[error("Credential missing: {0}")]
    CredentialMissing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TerminalError {
    pub fn network(msg: impl Into<String>) -> Self {
        TerminalError::Network(msg.into())
    }

    /// Provider-reported error that came back with an HTTP status
    pub fn http_status(provider: Provider, status: u16, message: impl Into<String>) -> Self {
        TerminalError::Provider {
            provider,
            status: Some(status),
            message: message.into(),
        }
    }

    /// Provider-reported error carried inside a 2xx body
    pub fn provider(provider: Provider, message: impl Into<String>) -> Self {
        TerminalError::Provider {
            provider,
            status: None,
            message: message.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        TerminalError::Malformed(msg.into())
    }

    pub fn credential_missing(msg: impl Into<String>) -> Self {
        TerminalError::CredentialMissing(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        TerminalError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        TerminalError::Internal(msg.into())
    }

    /// HTTP status reported by the provider, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            TerminalError::Provider { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the provider told us to slow down (HTTP 429)
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}

fn format_status(status: &Option<u16>) -> String {
    status.map(|s| format!(", status {}", s)).unwrap_or_default()
}

/// Result type alias for terminal operations
pub type TerminalResult<T> = Result<T, TerminalError>;
