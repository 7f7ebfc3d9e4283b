use actix_web::{
    post,
    web::{scope, Json, ServiceConfig},
    HttpResponse,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::models::BucketDescriptor;
use crate::api::error::ApiError;

#[derive(Serialize)]
struct BucketResponse {
    message: String,
    bucket: BucketDescriptor,
}

#[post("/createNewBucket")]
async fn create_new_bucket(body: Json<Value>) -> Result<HttpResponse, ApiError> {
    let bucket = BucketDescriptor::from_value(&body)?;
    info!("Accepted bucket request for '{}'", bucket.bucket_name);

    Ok(HttpResponse::Ok().json(BucketResponse {
        message: format!("Bucket {} validated successfully", bucket.bucket_name),
        bucket,
    }))
}

pub fn storage_config(config: &mut ServiceConfig) {
    config.service(scope("/api/storage").service(create_new_bucket));
}
