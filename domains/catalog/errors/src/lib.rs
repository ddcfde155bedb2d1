use catalog_models::Lifecycle;
use common_errors::AppError;
use dao_utils::DaoError;
use thiserror::Error;

/// Rejected input, reported against the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, "must not be empty")
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Cannot {operation} {entity} {id} while it is {state}")]
    InvalidTransition {
        entity: &'static str,
        id: i64,
        state: Lifecycle,
        operation: &'static str,
    },
    #[error("Failed to {operation} {entity}: {message}")]
    Repository {
        entity: &'static str,
        operation: &'static str,
        message: String,
    },
}

impl CatalogError {
    /// Maps a repository failure for `operation`. A missing row only counts
    /// as not-found when the operation addressed a single id.
    pub fn from_dao(
        entity: &'static str, operation: &'static str, id: Option<i64>,
        err: DaoError,
    ) -> Self {
        match (err, id) {
            (DaoError::NotFound, Some(id)) => Self::NotFound { entity, id },
            (err, _) => {
                Self::Repository {
                    entity,
                    operation,
                    message: err.to_string(),
                }
            }
        }
    }

    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::Validation { field, .. } => {
                AppError::bad_request("VALIDATION_FAILED", &message)
                    .with_details(field)
            }
            CatalogError::NotFound { entity, .. } => {
                AppError::not_found(
                    &format!("{}_NOT_FOUND", entity.to_uppercase()),
                    &message,
                )
            }
            CatalogError::InvalidTransition { .. } => {
                AppError::conflict("INVALID_TRANSITION", &message)
            }
            CatalogError::Repository { .. } => {
                AppError::internal_server_error(&message)
            }
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
