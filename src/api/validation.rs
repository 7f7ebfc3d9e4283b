use actix_web::{error::JsonPayloadError, web, HttpResponse};
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// Render field errors as `{"<field>": {"errors": [..messages]}}`
pub fn fields_json(validation_errors: &ValidationErrors) -> serde_json::Value {
    let mut fields = serde_json::Map::new();

    for (field, errors) in validation_errors.field_errors() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation error in field: {}", field))
            })
            .collect();
        fields.insert(field.to_string(), serde_json::json!({"errors": messages}));
    }

    serde_json::Value::Object(fields)
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default().limit(limit).error_handler(|err, _req| {
        let message = match &err {
            JsonPayloadError::Deserialize(de_err) if de_err.is_eof() => {
                "Request body is empty. Expected JSON payload"
            }
            JsonPayloadError::Deserialize(_) => "Invalid JSON format",
            JsonPayloadError::ContentType => "Expected Content-Type: application/json",
            JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                "Request body is too large"
            }
            _ => "Invalid request body",
        };

        let error_response = ErrorResponse {
            error: "Request validation failed".to_string(),
            fields: serde_json::json!({ "message": message }),
        };
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(error_response),
        )
        .into()
    })
}
