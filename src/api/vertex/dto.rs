use serde::Serialize;
use super::models::JobDescriptor;

/// Response for an accepted job request
#[derive(Serialize)]
pub struct JobResponse {
    pub message: String,
    pub job: JobDescriptor,
}
