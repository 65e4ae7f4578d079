//! Employee, classification and employment handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::deleted;
use crate::AppState;
use attainments_common::{
    auth::AuthContext,
    db::models::*,
    db::{DomainSummary, PositionSummary},
    errors::Result,
    services::employees::{
        self, DegreeForm, DisciplineForm, DomainForm, EmployeeForm, EmploymentForm, NamedForm,
        PositionForm, SubgroupForm,
    },
};

// ============================================================================
// Statuses and degrees
// ============================================================================

pub async fn list_statuses(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Status>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<StatusEntity>().await?))
}

pub async fn create_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<NamedForm>,
) -> Result<(StatusCode, Json<Status>)> {
    auth.require_staff()?;
    form.id = None;
    let status = employees::save_status(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(status)))
}

pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<NamedForm>,
) -> Result<Json<Status>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(employees::save_status(state.db.write(), form).await?))
}

pub async fn delete_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(employees::delete_status(state.db.write(), id).await?, "status", id)
}

pub async fn list_degrees(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Degree>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<DegreeEntity>().await?))
}

pub async fn create_degree(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<DegreeForm>,
) -> Result<(StatusCode, Json<Degree>)> {
    auth.require_staff()?;
    form.id = None;
    let degree = employees::save_degree(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(degree)))
}

pub async fn update_degree(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<DegreeForm>,
) -> Result<Json<Degree>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(employees::save_degree(state.db.write(), form).await?))
}

pub async fn delete_degree(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(employees::delete_degree(state.db.write(), id).await?, "degree", id)
}

// ============================================================================
// Domains and disciplines
// ============================================================================

pub async fn list_domains(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<DomainSummary>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.domain_summaries().await?))
}

pub async fn create_domain(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<DomainForm>,
) -> Result<(StatusCode, Json<Domain>)> {
    auth.require_staff()?;
    form.id = None;
    let domain = employees::save_domain(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(domain)))
}

pub async fn update_domain(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<DomainForm>,
) -> Result<Json<Domain>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(employees::save_domain(state.db.write(), form).await?))
}

pub async fn delete_domain(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(employees::delete_domain(state.db.write(), id).await?, "domain", id)
}

pub async fn list_disciplines(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Discipline>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<DisciplineEntity>().await?))
}

pub async fn create_discipline(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<DisciplineForm>,
) -> Result<(StatusCode, Json<Discipline>)> {
    auth.require_staff()?;
    form.id = None;
    let discipline = employees::save_discipline(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(discipline)))
}

pub async fn update_discipline(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<DisciplineForm>,
) -> Result<Json<Discipline>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(employees::save_discipline(state.db.write(), form).await?))
}

pub async fn delete_discipline(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(employees::delete_discipline(state.db.write(), id).await?, "discipline", id)
}

// ============================================================================
// Groups, subgroups and positions
// ============================================================================

pub async fn list_groups(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Group>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<GroupEntity>().await?))
}

pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<NamedForm>,
) -> Result<(StatusCode, Json<Group>)> {
    auth.require_staff()?;
    form.id = None;
    let group = employees::save_group(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn update_group(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<NamedForm>,
) -> Result<Json<Group>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(employees::save_group(state.db.write(), form).await?))
}

pub async fn delete_group(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(employees::delete_group(state.db.write(), id).await?, "group", id)
}

pub async fn list_subgroups(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Subgroup>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<SubgroupEntity>().await?))
}

pub async fn create_subgroup(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<SubgroupForm>,
) -> Result<(StatusCode, Json<Subgroup>)> {
    auth.require_staff()?;
    form.id = None;
    let subgroup = employees::save_subgroup(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(subgroup)))
}

pub async fn update_subgroup(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<SubgroupForm>,
) -> Result<Json<Subgroup>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(employees::save_subgroup(state.db.write(), form).await?))
}

pub async fn delete_subgroup(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(employees::delete_subgroup(state.db.write(), id).await?, "subgroup", id)
}

/// Positions with their subgroups, groups and classification
pub async fn list_positions(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<PositionSummary>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.position_summaries().await?))
}

pub async fn create_position(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<PositionForm>,
) -> Result<(StatusCode, Json<PositionSummary>)> {
    auth.require_staff()?;
    form.id = None;
    let position = employees::save_position(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(state.repo.position_summary(position).await?)))
}

pub async fn update_position(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<PositionForm>,
) -> Result<Json<PositionSummary>> {
    auth.require_staff()?;
    form.id = Some(id);
    let position = employees::save_position(state.db.write(), form).await?;
    Ok(Json(state.repo.position_summary(position).await?))
}

pub async fn delete_position(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(employees::delete_position(state.db.write(), id).await?, "position", id)
}

// ============================================================================
// Employees and employments
// ============================================================================

pub async fn list_employees(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Employee>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<EmployeeEntity>().await?))
}

pub async fn create_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<EmployeeForm>,
) -> Result<(StatusCode, Json<Employee>)> {
    auth.require_staff()?;
    form.id = None;
    let employee = employees::save_employee(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<EmployeeForm>,
) -> Result<Json<Employee>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(employees::save_employee(state.db.write(), form).await?))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(employees::delete_employee(state.db.write(), id).await?, "employee", id)
}

pub async fn list_employments(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Employment>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<EmploymentEntity>().await?))
}

pub async fn create_employment(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<EmploymentForm>,
) -> Result<(StatusCode, Json<Employment>)> {
    auth.require_staff()?;
    form.id = None;
    let employment = employees::save_employment(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(employment)))
}

pub async fn update_employment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<EmploymentForm>,
) -> Result<Json<Employment>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(employees::save_employment(state.db.write(), form).await?))
}

pub async fn delete_employment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(employees::delete_employment(state.db.write(), id).await?, "employment", id)
}
