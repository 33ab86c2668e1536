//! Route definitions for the contacts service
//!
//! - GET    /contacts         - List all contacts
//! - GET    /contacts/search  - Case-insensitive substring search on name/email
//! - GET    /contacts/:id     - Fetch one contact
//! - POST   /contacts         - Create a contact
//! - PUT    /contacts/:id     - Replace a contact
//! - DELETE /contacts/:id     - Delete a contact
//! - GET    /health           - Health check
//!
//! Static segments outrank parameters in the router, so `/contacts/search`
//! is never captured as an id. PUT and DELETE on it answer as they would for
//! any other malformed id. Unmatched paths get a JSON 404.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use contacts_core::{
    Contact, ContactFilter, ContactId, ContactStore, FieldViolation, StoreError, Validator,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use super::{ErrorBody, HealthResponse, HealthStatus, MessageResponse};

const NOT_FOUND_MESSAGE: &str = "Contact not found";
const NO_ROUTE_MESSAGE: &str = "Resource not found";
const SEARCH_SEGMENT: &str = "search";
const INTERNAL_MESSAGE: &str = "Server error";
const DELETED_MESSAGE: &str = "Contact deleted successfully";

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    pub validator: Validator,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>, validator: Validator) -> Self {
        Self {
            store,
            validator,
            start_time: Instant::now(),
        }
    }
}

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload violates a field rule
    #[error("{}", first_message(.violations))]
    Validation {
        violations: Vec<FieldViolation>,
        /// Expose every violation under `errors`
        report_all: bool,
    },

    /// The request could not be decoded
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Contact not found")]
    NotFound,

    #[error("Server error")]
    Internal(#[from] StoreError),
}

fn first_message(violations: &[FieldViolation]) -> &str {
    violations
        .first()
        .map(|v| v.message.as_str())
        .unwrap_or("invalid payload")
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Validation {
                violations,
                report_all: true,
            } => ErrorBody::new(first_message(violations)).with_errors(violations.clone()),
            ApiError::Validation { violations, .. } => ErrorBody::new(first_message(violations)),
            ApiError::Rejected { message, .. } => ErrorBody::new(message.clone()),
            ApiError::NotFound => ErrorBody::new(NOT_FOUND_MESSAGE),
            ApiError::Internal(_) => ErrorBody::new(INTERNAL_MESSAGE),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            tracing::error!(error = %source, "Store operation failed");
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/search",
            get(search_contacts)
                .put(update_search_segment)
                .delete(delete_search_segment),
        )
        .route(
            "/contacts/:id",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .route("/health", get(health_check))
        .fallback(route_not_found)
        .with_state(state)
}

/// GET /contacts
pub async fn list_contacts(State(state): State<AppState>) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state.store.find_all().await?;
    Ok(Json(contacts))
}

/// GET /contacts/search?name=..&email=..
///
/// Omitted or empty terms impose no constraint. A repeated term keeps its
/// last value.
pub async fn search_contacts(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let Query(pairs) = query?;
    let filter = ContactFilter::from_query_pairs(pairs);
    let contacts = state.store.find_matching(&filter).await?;

    tracing::debug!(
        name = ?filter.name,
        email = ?filter.email,
        matches = contacts.len(),
        "Searched contacts"
    );
    Ok(Json(contacts))
}

/// GET /contacts/:id
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    let id = parse_id(&id)?;
    let contact = state.store.find_by_id(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(contact))
}

/// POST /contacts
pub async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let Json(payload) = payload?;
    let draft = state
        .validator
        .validate(&payload)
        .into_result()
        .map_err(|violations| validation_error(&state, violations))?;

    let contact = state.store.insert(draft).await?;
    tracing::info!(id = %contact.id, "Created contact");

    Ok((StatusCode::CREATED, Json(contact)))
}

/// PUT /contacts/:id
///
/// The payload is validated before the id is looked up.
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    replace_contact(&state, &id, payload).await
}

/// PUT /contacts/search
pub async fn update_search_segment(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    replace_contact(&state, SEARCH_SEGMENT, payload).await
}

async fn replace_contact(
    state: &AppState,
    raw_id: &str,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    let Json(payload) = payload?;
    let draft = state
        .validator
        .validate(&payload)
        .into_result()
        .map_err(|violations| validation_error(state, violations))?;

    let id = parse_id(raw_id)?;
    let contact = state
        .store
        .update(&id, draft)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(id = %contact.id, "Updated contact");

    Ok(Json(contact))
}

/// DELETE /contacts/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete(&id).await?.ok_or(ApiError::NotFound)?;
    tracing::info!(id = %id, "Deleted contact");

    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}

/// DELETE /contacts/search
pub async fn delete_search_segment() -> ApiError {
    ApiError::NotFound
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, code) = match state.store.health_check().await {
        Ok(()) => (HealthStatus::Healthy, StatusCode::OK),
        Err(e) => {
            tracing::warn!(error = %e, store = state.store.name(), "Store health check failed");
            (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            store: state.store.name().to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

// Helper functions

async fn route_not_found() -> ApiError {
    ApiError::Rejected {
        status: StatusCode::NOT_FOUND,
        message: NO_ROUTE_MESSAGE.to_string(),
    }
}

/// A malformed id cannot name a live record
fn parse_id(raw: &str) -> Result<ContactId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

fn validation_error(state: &AppState, violations: Vec<FieldViolation>) -> ApiError {
    tracing::debug!(violations = ?violations, "Rejected contact payload");
    ApiError::Validation {
        violations,
        report_all: state.validator.collects_all_errors(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::Validation {
                violations: vec![FieldViolation::new("name", "name is required")],
                report_all: false,
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(StoreError::unavailable("down")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let err = ApiError::Internal(StoreError::unavailable("password=hunter2"));
        assert_eq!(err.body(), ErrorBody::new("Server error"));
        assert_eq!(err.to_string(), "Server error");
    }

    #[test]
    fn test_validation_error_body() {
        let violations = vec![
            FieldViolation::new("name", "name is required"),
            FieldViolation::new("phone", "phone is required"),
        ];

        let first_only = ApiError::Validation {
            violations: violations.clone(),
            report_all: false,
        }
        .body();
        assert_eq!(first_only, ErrorBody::new("name is required"));

        let all = ApiError::Validation {
            violations: violations.clone(),
            report_all: true,
        }
        .body();
        assert_eq!(all.message, "name is required");
        assert_eq!(all.errors, Some(violations));
    }

    #[test]
    fn test_parse_id() {
        let id = ContactId::generate();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id(SEARCH_SEGMENT), Err(ApiError::NotFound)));
        assert!(matches!(parse_id("507f1f77bcf86cd799439011"), Err(ApiError::NotFound)));
    }
}
