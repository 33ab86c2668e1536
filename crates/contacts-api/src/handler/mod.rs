//! HTTP handlers for the contacts service
//!
//! ## Architecture
//!
//! - `routes`: router construction, per-operation handlers and `ApiError`
//! - `middleware`: request logging and request id propagation
//!
//! Every response body is JSON. Failures use [`ErrorBody`]; internal failures
//! never expose their cause to the client.

pub mod middleware;
pub mod routes;

pub use middleware::{request_logging_middleware, REQUEST_ID_HEADER};
pub use routes::{
    create_contact, create_router, delete_contact, get_contact, health_check, list_contacts,
    search_contacts, update_contact, ApiError, AppState,
};

use contacts_core::FieldViolation;
use serde::{Deserialize, Serialize};

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    /// All violations, only when the validator collects every error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldViolation>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Plain confirmation body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Store backend name
    pub store: String,
    pub uptime_seconds: u64,
    /// ISO 8601
    pub timestamp: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_omits_errors_by_default() {
        let json = serde_json::to_value(ErrorBody::new("name is required")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "name is required"}));
    }

    #[test]
    fn test_error_body_with_errors() {
        let body = ErrorBody::new("name is required")
            .with_errors(vec![FieldViolation::new("name", "name is required")]);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["errors"][0]["field"], "name");
    }

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_value(HealthStatus::Unhealthy).unwrap(),
            serde_json::json!("unhealthy")
        );
    }
}
