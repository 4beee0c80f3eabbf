//! Client error types

use shared::ValidationErrors;
use std::collections::BTreeMap;
use thiserror::Error;

/// Generic message for unclassified failures
pub const UNKNOWN_ERROR: &str = "Ocurrió un error inesperado";

/// Message for requests that never got a response
pub const CONNECTION_ERROR: &str = "Error de conexión con el servidor";

/// Client error type
///
/// Every failure of a rooms API call is normalized into one of these
/// variants. The type is `Clone` so it can be held in published state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No response reached the client (connect failure, timeout, broken body)
    #[error("{0}")]
    Connection(String),

    /// Server-side field validation failed
    #[error("{message}")]
    Validation {
        /// All field messages joined by ", "
        message: String,
        fields: BTreeMap<String, String>,
    },

    /// Server rejected the request on a domain rule (e.g. duplicate room number)
    #[error("{0}")]
    Business(String),

    /// Lookup by id missed
    #[error("{0}")]
    NotFound(String),

    /// Non-2xx without a recognized error body
    #[error("{0}")]
    Unknown(String),

    /// 2xx whose body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Unusable client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Server-side validation error from a field → message map
    pub fn validation(fields: BTreeMap<String, String>) -> Self {
        let message = fields.values().cloned().collect::<Vec<_>>().join(", ");
        ClientError::Validation { message, fields }
    }

    pub fn room_not_found(id: i64) -> Self {
        ClientError::NotFound(format!("No se encontró la habitación con ID {id}"))
    }

    pub fn unknown(status: u16) -> Self {
        ClientError::Unknown(format!("{UNKNOWN_ERROR} (HTTP {status})"))
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ClientError::Connection(_))
    }

    pub fn is_business(&self) -> bool {
        matches!(self, ClientError::Business(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClientError::InvalidResponse(err.to_string());
        }
        if err.is_builder() {
            return ClientError::Config(err.to_string());
        }
        tracing::debug!(error = %err, timeout = err.is_timeout(), "Request got no response");
        ClientError::Connection(CONNECTION_ERROR.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of a form submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Rejected locally; nothing was sent
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Client(#[from] ClientError),
}
