pub mod error;
pub mod extract;
pub mod health;
pub mod settings;
pub mod storage;
pub mod validation;
pub mod vertex;
