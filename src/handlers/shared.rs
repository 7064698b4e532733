use actix_web::{HttpMessage, HttpRequest, web};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::CorrelationId;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub fn correlation_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<CorrelationId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "-".to_string())
}

fn bad_request(message: String) -> actix_web::Error {
    AppError::BadRequest(message).into()
}

/// Malformed JSON bodies answer 400 in the `{ error }` shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| bad_request(format!("Invalid request body: {}", err)))
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| bad_request(format!("Invalid path: {}", err)))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| bad_request(format!("Invalid query: {}", err)))
}
