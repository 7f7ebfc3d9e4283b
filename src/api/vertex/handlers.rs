use actix_web::{
    post,
    web::{scope, Json, ServiceConfig},
    HttpResponse,
};
use serde_json::Value;
use tracing::info;

use super::dto::JobResponse;
use super::models::{JobDescriptor, JobMode};
use crate::api::error::ApiError;

fn accept_job(mode: JobMode, body: &Value) -> Result<HttpResponse, ApiError> {
    let job = JobDescriptor::from_value(mode, body)?;
    let name = job.display_name.clone().unwrap_or_default();
    info!("Accepted {:?} request for job '{}'", mode, name);

    Ok(HttpResponse::Ok().json(JobResponse {
        message: format!("Job {} validated successfully", name),
        job,
    }))
}

#[post("/createJobScheduler")]
async fn create_job_scheduler(body: Json<Value>) -> Result<HttpResponse, ApiError> {
    accept_job(JobMode::Update, &body)
}

#[post("/describeJob")]
async fn describe_job(body: Json<Value>) -> Result<HttpResponse, ApiError> {
    accept_job(JobMode::Describe, &body)
}

pub fn vertex_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/vertex")
            .service(create_job_scheduler)
            .service(describe_job),
    );
}
