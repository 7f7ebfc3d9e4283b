use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;
use validator::ValidationErrors;

use crate::api::storage::BucketDescriptor;
use crate::api::validation::fields_json;
use crate::api::vertex::{JobDescriptor, JobMode};

#[derive(Parser, Debug)]
#[command(name = "scheduler-plugin", about = "Vertex notebook job request service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Validate a job request stored in a JSON file
    Check {
        #[arg(long, value_enum, default_value_t = JobMode::Update)]
        mode: JobMode,
        file: PathBuf,
    },
    /// Validate a bucket request stored in a JSON file
    CheckBucket { file: PathBuf },
}

fn read_json(path: &Path) -> Result<Value, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))
}

fn render<T: serde::Serialize>(result: Result<T, ValidationErrors>) -> Result<String, String> {
    match result {
        Ok(value) => serde_json::to_string_pretty(&value).map_err(|e| e.to_string()),
        Err(errors) => Err(serde_json::to_string_pretty(&fields_json(&errors))
            .unwrap_or_else(|_| errors.to_string())),
    }
}

/// Validate a job request file, returning the normalised job or the field errors
pub fn check_job(mode: JobMode, path: &Path) -> Result<String, String> {
    let body = read_json(path)?;
    render(JobDescriptor::from_value(mode, &body))
}

/// Validate a bucket request file
pub fn check_bucket(path: &Path) -> Result<String, String> {
    let body = read_json(path)?;
    render(BucketDescriptor::from_value(&body))
}
