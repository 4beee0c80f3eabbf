//! API Response types
//!
//! Error bodies returned by the rooms API on non-2xx responses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error body of a failed API call
///
/// The server sends one of two shapes:
/// ```json
/// { "status": 409, "error": "Número de habitación duplicado", "message": "..." }
/// { "status": 400, "error": "Errores de validación", "validationErrors": { "capacity": "..." } }
/// ```
/// Every field is optional so that partial or foreign bodies still decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Short error title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Business message (e.g. duplicate room number)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Field name → message, for server-side validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ApiErrorBody {
    /// Business error body
    pub fn message(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            error: Some(error.into()),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Field-level validation error body
    pub fn validation(status: u16, errors: BTreeMap<String, String>) -> Self {
        Self {
            status: Some(status),
            error: Some("Errores de validación".to_string()),
            validation_errors: Some(errors),
            ..Default::default()
        }
    }

    /// Field errors, if the body carries a non-empty map
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        self.validation_errors.as_ref().filter(|m| !m.is_empty())
    }

    /// Business message, if present and non-blank
    pub fn business_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}
