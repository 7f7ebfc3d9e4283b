use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

/// Liveness check endpoint
///
/// Simple check that the process is alive. The service has no dependencies
/// to probe, so there is no separate readiness check.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config.service(liveness_check);
}
