//! HTTP-facing errors.
//!
//! Every failure a handler can produce ends up here and is rendered as
//! `{"error", "message"?, "details"?, "user_id"?, "timestamp"}`. Store
//! failures are logged and replaced by a generic message.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::model::israeli_id::IdError;
use crate::model::validation::ValidationErrors;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("invalid user id {user_id}: {source}")]
    InvalidId { user_id: String, source: IdError },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("user already exists: {0}")]
    Conflict(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("route not found")]
    RouteNotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("store unavailable")]
    StoreUnavailable,

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(id) => Self::Conflict(id),
            RepositoryError::NotFound(id) => Self::UserNotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Content-Type must be application/json".to_owned()
            }
            other => format!("JSON parsing error: {}", other.body_text()),
        };
        Self::InvalidRequest(message)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidId { .. } | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UserNotFound(_) | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::StoreUnavailable | Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ErrorBody {
        let mut body = ErrorBody {
            error: "",
            message: None,
            details: None,
            user_id: None,
            timestamp: crate::routes::timestamp(),
        };

        match self {
            Self::Validation(errors) => {
                body.error = "Validation failed";
                body.message = Some(format!(
                    "Invalid or missing fields: {}",
                    errors.fields().collect::<Vec<_>>().join(", ")
                ));
                body.details = Some(errors.to_details());
            }
            Self::InvalidId { user_id, source } => {
                body.error = "Invalid Israeli ID format";
                body.message = Some(source.to_string());
                body.user_id = Some(user_id);
            }
            Self::InvalidRequest(message) => {
                body.error = "Invalid Request";
                body.message = Some(message);
            }
            Self::Conflict(user_id) => {
                body.error = "User already exists";
                body.user_id = Some(user_id);
            }
            Self::UserNotFound(user_id) => {
                body.error = "User not found";
                body.user_id = Some(user_id);
            }
            Self::RouteNotFound => {
                body.error = "Not Found";
                body.message = Some("The requested resource was not found".to_owned());
            }
            Self::MethodNotAllowed => {
                body.error = "Method Not Allowed";
                body.message = Some("The method is not allowed for the requested URL".to_owned());
            }
            Self::StoreUnavailable => {
                body.error = "Internal Server Error";
                body.message = Some("Database is unreachable".to_owned());
            }
            Self::Repository(_) => {
                body.error = "Internal Server Error";
                body.message = Some("An unexpected error occurred".to_owned());
            }
        }
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
