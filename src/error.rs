//! Client errors

use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api {
        status: u16,
        detail: Option<String>,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),
}

impl ClientError {
    /// Backend `detail` for API errors, if the body carried one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message surfaced on store error flags
    pub fn message(&self) -> String {
        match self.detail() {
            Some(detail) => detail.to_string(),
            None => self.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::WebSocket(e.to_string())
    }
}

/// Fallback shown when the backend gives no reason for a rejected join
pub const JOIN_FALLBACK_MESSAGE: &str = "Failed to join the raffle";

/// Normalized failure of a join attempt
#[derive(Debug, Error)]
#[error("{message}")]
pub struct JoinError {
    pub message: String,
    #[source]
    pub source: ClientError,
}

impl From<ClientError> for JoinError {
    fn from(source: ClientError) -> Self {
        let message = source
            .detail()
            .map(str::to_string)
            .unwrap_or_else(|| JOIN_FALLBACK_MESSAGE.to_string());
        Self { message, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api { status: 400, detail: Some("Already joined this raffle".to_string()) };
        assert_eq!(err.to_string(), "API error 400: Already joined this raffle");
        assert_eq!(err.message(), "Already joined this raffle");
        assert_eq!(err.status(), Some(400));

        let bare = ClientError::Api { status: 502, detail: None };
        assert_eq!(bare.message(), "API error 502: no detail");
    }

    #[test]
    fn test_join_error_uses_detail_or_fallback() {
        let with_detail: JoinError = ClientError::Api {
            status: 400,
            detail: Some("Transaction already used".to_string()),
        }
        .into();
        assert_eq!(with_detail.to_string(), "Transaction already used");

        let without: JoinError = ClientError::Decode("eof".to_string()).into();
        assert_eq!(without.message, JOIN_FALLBACK_MESSAGE);
        assert!(matches!(without.source, ClientError::Decode(_)));
    }
}
