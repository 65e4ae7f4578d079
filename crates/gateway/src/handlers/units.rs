//! University, faculty and department handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::deleted;
use crate::AppState;
use attainments_common::{
    auth::AuthContext,
    db::models::{Department, Faculty, University},
    db::{DepartmentSummary, FacultySummary, UniversitySummary},
    errors::Result,
    services::units::{self, DepartmentForm, FacultyForm, UniversityForm},
};

pub async fn list_universities(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<UniversitySummary>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.university_summaries().await?))
}

pub async fn create_university(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<UniversityForm>,
) -> Result<(StatusCode, Json<University>)> {
    auth.require_staff()?;
    form.id = None;
    let university = units::save_university(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(university)))
}

pub async fn update_university(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<UniversityForm>,
) -> Result<Json<University>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(units::save_university(state.db.write(), form).await?))
}

/// Cascades to the university's faculties and departments
pub async fn delete_university(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(units::delete_university(state.db.write(), id).await?, "university", id)
}

pub async fn list_faculties(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<FacultySummary>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.faculty_summaries().await?))
}

pub async fn create_faculty(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<FacultyForm>,
) -> Result<(StatusCode, Json<Faculty>)> {
    auth.require_staff()?;
    form.id = None;
    let faculty = units::save_faculty(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(faculty)))
}

pub async fn update_faculty(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<FacultyForm>,
) -> Result<Json<Faculty>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(units::save_faculty(state.db.write(), form).await?))
}

pub async fn delete_faculty(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(units::delete_faculty(state.db.write(), id).await?, "faculty", id)
}

pub async fn list_departments(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<DepartmentSummary>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.department_summaries().await?))
}

pub async fn create_department(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<DepartmentForm>,
) -> Result<(StatusCode, Json<Department>)> {
    auth.require_staff()?;
    form.id = None;
    let department = units::save_department(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn update_department(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<DepartmentForm>,
) -> Result<Json<Department>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(units::save_department(state.db.write(), form).await?))
}

pub async fn delete_department(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(units::delete_department(state.db.write(), id).await?, "department", id)
}
