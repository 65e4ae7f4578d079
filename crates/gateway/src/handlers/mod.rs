//! API handlers module

pub mod auth;
pub mod employees;
pub mod health;
pub mod publications;
pub mod units;

use attainments_common::errors::{AppError, Result};
use axum::http::StatusCode;

/// 204 when a row was deleted, 404 naming the resource otherwise
pub(crate) fn deleted(removed: bool, resource_type: &str, id: i32) -> Result<StatusCode> {
    if removed {
        tracing::info!(resource_type, id, "Resource deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(resource_type, id))
    }
}
