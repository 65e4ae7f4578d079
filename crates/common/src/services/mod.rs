//! Write services
//!
//! Each save/delete function runs validation, persistence and propagation as
//! one sequence inside a single transaction. They accept any connection that
//! can open a transaction, so they compose: called on a transaction they
//! nest through a savepoint.

pub mod accounts;
pub mod authorship;
pub mod employees;
pub mod scoring;
pub mod units;

use crate::errors::{AppError, Result};
use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};

/// Row being updated; a missing id is a not-found error
pub(crate) async fn fetch<E, C>(db: &C, id: i32, resource_type: &str) -> Result<E::Model>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(resource_type, id))
}

/// Row referenced by a form field; a missing id is a validation error on that field
pub(crate) async fn referenced<E, C>(db: &C, id: i32, field: &str) -> Result<E::Model>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::invalid(field, format!("No entry with id {} exists.", id)))
}

/// Optional reference; `None` passes through
pub(crate) async fn referenced_opt<E, C>(
    db: &C,
    id: Option<i32>,
    field: &str,
) -> Result<Option<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    match id {
        Some(id) => referenced::<E, C>(db, id, field).await.map(Some),
        None => Ok(None),
    }
}

/// Delete by primary key, reporting whether a row went away
pub(crate) async fn delete_row<E, C>(db: &C, id: i32) -> Result<bool>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    let result = E::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
