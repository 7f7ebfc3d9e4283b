pub mod dto;
pub mod handlers;
pub mod models;

// Re-export commonly used types
pub use models::{JobDescriptor, JobMode};
