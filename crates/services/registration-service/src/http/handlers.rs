//! Registration and health handlers.

use std::borrow::Cow;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use common::AppResult;
use domain::registration::{
    has_valid_name_characters, has_valid_name_length, has_valid_password_length,
    is_valid_email, meets_password_composition,
};
use domain::{RegistrationRequest, Rule, UserAccountResponse};

use super::extractors::ValidatedJson;
use super::state::AppState;

// =============================================================================
// DTOs
// =============================================================================

/// Register request body.
#[derive(Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(custom(function = "check_email"))]
    pub email: String,
    #[validate(custom(function = "check_password"))]
    pub password: String,
    #[serde(rename = "firstName")]
    #[validate(custom(function = "check_name"))]
    pub first_name: String,
    #[serde(rename = "lastName")]
    #[validate(custom(function = "check_name"))]
    pub last_name: String,
}

impl From<RegisterUserRequest> for RegistrationRequest {
    fn from(body: RegisterUserRequest) -> Self {
        RegistrationRequest::new(body.email, body.password, body.first_name, body.last_name)
    }
}

fn rule_error(rule: Rule) -> ValidationError {
    let mut err = ValidationError::new(rule.code());
    err.message = Some(Cow::Borrowed(rule.message()));
    err
}

fn check_email(value: &str) -> Result<(), ValidationError> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(rule_error(Rule::EmailSyntax))
    }
}

fn check_password(value: &str) -> Result<(), ValidationError> {
    if !has_valid_password_length(value) {
        return Err(rule_error(Rule::PasswordLength));
    }
    if !meets_password_composition(value) {
        return Err(rule_error(Rule::PasswordComposition));
    }
    Ok(())
}

fn check_name(value: &str) -> Result<(), ValidationError> {
    if !has_valid_name_length(value) {
        return Err(rule_error(Rule::NameLength));
    }
    if !has_valid_name_characters(value) {
        return Err(rule_error(Rule::NameCharacters));
    }
    Ok(())
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: StoreHealth,
}

/// Store health with optional error message.
#[derive(Debug, Serialize)]
pub struct StoreHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<UserAccountResponse>)> {
    let account = state.registrar.register(body.into()).await?;
    Ok((StatusCode::CREATED, Json(UserAccountResponse::from(account))))
}

/// Health check endpoint - verifies store connectivity.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let (status, store) = match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            StoreHealth {
                status: "healthy".to_string(),
                error: None,
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                StoreHealth {
                    status: "unhealthy".to_string(),
                    error: Some(e.to_string()),
                },
            )
        }
    };

    let response = HealthResponse {
        status: if status == StatusCode::OK { "healthy" } else { "degraded" }.to_string(),
        store,
    };

    (status, Json(response)).into_response()
}
