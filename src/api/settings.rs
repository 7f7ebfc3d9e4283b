use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

/// Plugin settings shared with every worker
#[derive(Clone, Debug, Serialize)]
pub struct PluginSettings {
    pub log_path: String,
}

impl PluginSettings {
    pub fn new(log_path: &str) -> Self {
        PluginSettings {
            log_path: log_path.into(),
        }
    }
}

#[get("/settings")]
async fn get_settings(data: web::Data<PluginSettings>) -> impl Responder {
    HttpResponse::Ok().json(data.get_ref())
}

pub fn settings_config(config: &mut web::ServiceConfig) {
    config.service(web::scope("/scheduler-plugin").service(get_settings));
}
