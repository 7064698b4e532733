use std::fmt::Display;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ErrorBody;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error")]
    DatabaseError(#[source] sqlx::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        if status_code.is_server_error() {
            log::error!("Request failed with status {}: {}", status_code, error_message);
        } else {
            log::warn!("Request failed with status {}: {}", status_code, error_message);
        }

        HttpResponse::build(status_code).json(ErrorBody::new(error_message))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => AppError::DatabaseError(sqlx_err),
            Err(original_error) => AppError::InternalServerError(Some(original_error.to_string())),
        }
    }
}

impl AppError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        AppError::NotFound(format!("{} {} not found", entity, id))
    }

    /// A failed read surfaces as a 500 carrying only the generic message.
    pub fn read_failed(message: &str, error: impl Display) -> Self {
        log::error!("{}: {}", message, error);
        AppError::InternalServerError(Some(message.to_string()))
    }

    /// A failed write (constraint violations included) surfaces as a 400.
    pub fn write_failed(message: &str, error: impl Display) -> Self {
        log::error!("{}: {}", message, error);
        AppError::BadRequest(message.to_string())
    }

    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_codes_follow_the_error_kind() {
        assert_eq!(
            AppError::not_found("Driver", 4).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("nope".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_stay_generic() {
        assert_eq!(AppError::not_found("Unit", 9).to_string(), "Unit 9 not found");
        assert_eq!(
            AppError::write_failed("Failed to delete company", "FOREIGN KEY constraint failed")
                .to_string(),
            "Failed to delete company"
        );
        assert_eq!(
            AppError::read_failed("Failed to fetch units", "disk I/O error").to_string(),
            "Internal server error: Failed to fetch units"
        );
    }

    #[test]
    fn anyhow_wrapping_a_sqlx_error_becomes_a_database_error() {
        let error = AppError::from(anyhow::Error::new(sqlx::Error::RowNotFound));
        assert!(matches!(error, AppError::DatabaseError(_)));

        let error = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(error.to_string(), "Internal server error: boom");
    }
}
