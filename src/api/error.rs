use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use tracing::warn;
use validator::ValidationErrors;

use crate::api::validation::{fields_json, ErrorResponse};

/// Errors surfaced by the request handlers
#[derive(Debug)]
pub enum ApiError {
    /// Request body failed descriptor construction
    Validation(ValidationErrors),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => write!(f, "Validation error: {}", errors),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(errors) => {
                warn!("Validation error: {}", errors);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: fields_json(errors),
                })
            }
        }
    }
}
