//! Research Attainments Common Library
//!
//! Shared code for the attainments binaries including:
//! - Database entities, schema creation and read-side repository
//! - Write services with score propagation and authorship aggregation
//! - Error types and handling
//! - Configuration management
//! - Authentication utilities
//! - Profile photo processing
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod media;
pub mod metrics;
pub mod services;
pub mod validation;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};
pub use media::MediaStore;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
