use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: ApiErrorInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorInfo {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    InternalServerError,
}

/// Error every HTTP handler returns; each domain error converts into it.
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    code: String,
    message: String,
    details: Option<String>,
}

impl AppError {
    fn new(kind: ErrorKind, code: &str, message: &str) -> Self {
        Self {
            kind,
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::new(ErrorKind::BadRequest, code, message)
    }

    pub fn not_found(code: &str, message: &str) -> Self {
        Self::new(ErrorKind::NotFound, code, message)
    }

    /// The request is well formed but clashes with the current state of the
    /// target, e.g. trashing an entity that is already trashed.
    pub fn conflict(code: &str, message: &str) -> Self {
        Self::new(ErrorKind::Conflict, code, message)
    }

    pub fn internal_server_error(message: &str) -> Self {
        Self::new(ErrorKind::InternalServerError, "INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn kind(&self) -> ErrorKind { self.kind }

    pub fn code(&self) -> &str { &self.code }

    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_response_data(&self) -> ApiErrorResponse {
        ApiErrorResponse {
            error: ApiErrorInfo {
                code: self.code.clone(),
                message: self.message.clone(),
                details: self.details.clone(),
            },
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = %self.code, details = ?self.details, "{}", self.message);
        }
        (status, Json(self.to_response_data())).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal_server_error(&format!(
            "An unexpected error occurred: {}",
            err
        ))
    }
}

pub type AppResult<T> = Result<T, AppError>;
