//! Organizational units: universities, faculties, departments

use crate::db::models::*;
use crate::errors::Result;
use crate::services::{delete_row, fetch, referenced};
use crate::validation;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UniversityForm {
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub abbreviation: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FacultyForm {
    #[serde(default)]
    pub id: Option<i32>,

    pub university_id: i32,

    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub abbreviation: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DepartmentForm {
    #[serde(default)]
    pub id: Option<i32>,

    pub faculty_id: i32,

    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub abbreviation: String,
}

#[instrument(skip(db, form), fields(university_id = ?form.id))]
pub async fn save_university<C>(db: &C, form: UniversityForm) -> Result<University>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;

    let mut model: UniversityActiveModel = match form.id {
        Some(id) => fetch::<UniversityEntity, _>(db, id, "university").await?.into(),
        None => Default::default(),
    };
    model.name = Set(name);
    model.abbreviation = Set(form.abbreviation.trim().to_string());

    let university = match form.id {
        Some(_) => model.update(db).await?,
        None => model.insert(db).await?,
    };

    info!(university_id = university.id, "University saved");
    Ok(university)
}

/// Deleting a university deletes its faculties and their departments
pub async fn delete_university<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<UniversityEntity, _>(db, id).await
}

#[instrument(skip(db, form), fields(faculty_id = ?form.id))]
pub async fn save_faculty<C>(db: &C, form: FacultyForm) -> Result<Faculty>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;

    let txn = db.begin().await?;

    referenced::<UniversityEntity, _>(&txn, form.university_id, "university_id").await?;

    let mut model: FacultyActiveModel = match form.id {
        Some(id) => fetch::<FacultyEntity, _>(&txn, id, "faculty").await?.into(),
        None => Default::default(),
    };
    model.university_id = Set(form.university_id);
    model.name = Set(name);
    model.abbreviation = Set(form.abbreviation.trim().to_string());

    let faculty = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    txn.commit().await?;

    info!(faculty_id = faculty.id, "Faculty saved");
    Ok(faculty)
}

pub async fn delete_faculty<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<FacultyEntity, _>(db, id).await
}

#[instrument(skip(db, form), fields(department_id = ?form.id))]
pub async fn save_department<C>(db: &C, form: DepartmentForm) -> Result<Department>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;

    let txn = db.begin().await?;

    referenced::<FacultyEntity, _>(&txn, form.faculty_id, "faculty_id").await?;

    let mut model: DepartmentActiveModel = match form.id {
        Some(id) => fetch::<DepartmentEntity, _>(&txn, id, "department").await?.into(),
        None => Default::default(),
    };
    model.faculty_id = Set(form.faculty_id);
    model.name = Set(name);
    model.abbreviation = Set(form.abbreviation.trim().to_string());

    let department = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    txn.commit().await?;

    info!(department_id = department.id, "Department saved");
    Ok(department)
}

pub async fn delete_department<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<DepartmentEntity, _>(db, id).await
}
