//! Employees and their dictionaries
//!
//! Statuses, degrees, domains and disciplines, the position classification
//! (groups, subgroups, positions), employees and their employments.

use crate::db::models::*;
use crate::errors::Result;
use crate::services::{delete_row, fetch, referenced, referenced_opt};
use crate::validation;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{info, instrument};
use validator::Validate;

/// Form shared by the name/abbreviation dictionaries
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NamedForm {
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub abbreviation: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DegreeForm {
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(length(max = 32))]
    pub abbreviation: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DomainForm {
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(length(max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DisciplineForm {
    #[serde(default)]
    pub id: Option<i32>,

    pub domain_id: i32,

    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub abbreviation: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubgroupForm {
    #[serde(default)]
    pub id: Option<i32>,

    pub group_id: i32,

    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub abbreviation: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PositionForm {
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(length(max = 255))]
    pub name: String,

    /// Replaces the position's subgroup set
    #[serde(default)]
    pub subgroup_ids: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmployeeForm {
    #[serde(default)]
    pub id: Option<i32>,

    pub user_id: i32,

    #[validate(length(max = 64))]
    pub slug: String,

    #[serde(default)]
    pub degree_id: Option<i32>,

    #[serde(default)]
    pub orcid: Option<String>,

    pub status_id: i32,

    #[serde(default = "default_in_evaluation")]
    pub in_evaluation: bool,

    #[serde(default)]
    pub discipline_id: Option<i32>,
}

fn default_in_evaluation() -> bool {
    true
}

impl EmployeeForm {
    pub fn new(user_id: i32, slug: &str, status_id: i32) -> Self {
        Self {
            id: None,
            user_id,
            slug: slug.to_string(),
            degree_id: None,
            orcid: None,
            status_id,
            in_evaluation: default_in_evaluation(),
            discipline_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EmploymentForm {
    #[serde(default)]
    pub id: Option<i32>,

    pub employee_id: i32,

    #[serde(default)]
    pub position_id: Option<i32>,

    #[serde(default)]
    pub subgroup_id: Option<i32>,

    #[serde(default)]
    pub department_id: Option<i32>,
}

// ============================================================================
// Dictionaries
// ============================================================================

pub async fn save_status<C>(db: &C, form: NamedForm) -> Result<Status>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;

    let mut model: StatusActiveModel = match form.id {
        Some(id) => fetch::<StatusEntity, _>(db, id, "status").await?.into(),
        None => Default::default(),
    };
    model.name = Set(name);
    model.abbreviation = Set(form.abbreviation.trim().to_string());

    Ok(match form.id {
        Some(_) => model.update(db).await?,
        None => model.insert(db).await?,
    })
}

/// Deleting a status deletes the employees holding it
pub async fn delete_status<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<StatusEntity, _>(db, id).await
}

pub async fn save_degree<C>(db: &C, form: DegreeForm) -> Result<Degree>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let abbreviation = validation::required("abbreviation", &form.abbreviation)?;

    let mut model: DegreeActiveModel = match form.id {
        Some(id) => fetch::<DegreeEntity, _>(db, id, "degree").await?.into(),
        None => Default::default(),
    };
    model.abbreviation = Set(abbreviation);

    Ok(match form.id {
        Some(_) => model.update(db).await?,
        None => model.insert(db).await?,
    })
}

pub async fn delete_degree<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<DegreeEntity, _>(db, id).await
}

pub async fn save_domain<C>(db: &C, form: DomainForm) -> Result<Domain>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;

    let mut model: DomainActiveModel = match form.id {
        Some(id) => fetch::<DomainEntity, _>(db, id, "domain").await?.into(),
        None => Default::default(),
    };
    model.name = Set(name);

    Ok(match form.id {
        Some(_) => model.update(db).await?,
        None => model.insert(db).await?,
    })
}

pub async fn delete_domain<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<DomainEntity, _>(db, id).await
}

pub async fn save_discipline<C>(db: &C, form: DisciplineForm) -> Result<Discipline>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;

    let txn = db.begin().await?;

    referenced::<DomainEntity, _>(&txn, form.domain_id, "domain_id").await?;

    let mut model: DisciplineActiveModel = match form.id {
        Some(id) => fetch::<DisciplineEntity, _>(&txn, id, "discipline").await?.into(),
        None => Default::default(),
    };
    model.domain_id = Set(form.domain_id);
    model.name = Set(name);
    model.abbreviation = Set(form.abbreviation.trim().to_string());

    let discipline = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    txn.commit().await?;
    Ok(discipline)
}

pub async fn delete_discipline<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<DisciplineEntity, _>(db, id).await
}

// ============================================================================
// Position Classification
// ============================================================================

pub async fn save_group<C>(db: &C, form: NamedForm) -> Result<Group>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;

    let mut model: GroupActiveModel = match form.id {
        Some(id) => fetch::<GroupEntity, _>(db, id, "group").await?.into(),
        None => Default::default(),
    };
    model.name = Set(name);
    model.abbreviation = Set(form.abbreviation.trim().to_string());

    Ok(match form.id {
        Some(_) => model.update(db).await?,
        None => model.insert(db).await?,
    })
}

pub async fn delete_group<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<GroupEntity, _>(db, id).await
}

pub async fn save_subgroup<C>(db: &C, form: SubgroupForm) -> Result<Subgroup>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;

    let txn = db.begin().await?;

    referenced::<GroupEntity, _>(&txn, form.group_id, "group_id").await?;

    let mut model: SubgroupActiveModel = match form.id {
        Some(id) => fetch::<SubgroupEntity, _>(&txn, id, "subgroup").await?.into(),
        None => Default::default(),
    };
    model.group_id = Set(form.group_id);
    model.name = Set(name);
    model.abbreviation = Set(form.abbreviation.trim().to_string());

    let subgroup = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    txn.commit().await?;
    Ok(subgroup)
}

pub async fn delete_subgroup<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<SubgroupEntity, _>(db, id).await
}

/// Save a position and replace its subgroup links
#[instrument(skip(db, form), fields(position_id = ?form.id))]
pub async fn save_position<C>(db: &C, form: PositionForm) -> Result<Position>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;
    let subgroup_ids: BTreeSet<i32> = form.subgroup_ids.iter().copied().collect();

    let txn = db.begin().await?;

    for subgroup_id in &subgroup_ids {
        referenced::<SubgroupEntity, _>(&txn, *subgroup_id, "subgroup_ids").await?;
    }

    let mut model: PositionActiveModel = match form.id {
        Some(id) => fetch::<PositionEntity, _>(&txn, id, "position").await?.into(),
        None => Default::default(),
    };
    model.name = Set(name);

    let position = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    PositionSubgroupEntity::delete_many()
        .filter(PositionSubgroupColumn::PositionId.eq(position.id))
        .exec(&txn)
        .await?;
    if !subgroup_ids.is_empty() {
        let links = subgroup_ids.iter().map(|subgroup_id| PositionSubgroupActiveModel {
            position_id: Set(position.id),
            subgroup_id: Set(*subgroup_id),
        });
        PositionSubgroupEntity::insert_many(links)
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    info!(position_id = position.id, subgroups = subgroup_ids.len(), "Position saved");
    Ok(position)
}

pub async fn delete_position<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<PositionEntity, _>(db, id).await
}

// ============================================================================
// Employees
// ============================================================================

#[instrument(skip(db, form), fields(employee_id = ?form.id, user_id = form.user_id))]
pub async fn save_employee<C>(db: &C, form: EmployeeForm) -> Result<Employee>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let slug = validation::required("slug", &form.slug)?;
    validation::slug(&slug)?;
    let orcid = validation::blank_to_none(form.orcid);
    if let Some(ref orcid) = orcid {
        validation::orcid(orcid)?;
    }

    let txn = db.begin().await?;

    referenced::<UserEntity, _>(&txn, form.user_id, "user_id").await?;
    referenced::<StatusEntity, _>(&txn, form.status_id, "status_id").await?;
    referenced_opt::<DegreeEntity, _>(&txn, form.degree_id, "degree_id").await?;
    referenced_opt::<DisciplineEntity, _>(&txn, form.discipline_id, "discipline_id").await?;

    let mut model: EmployeeActiveModel = match form.id {
        Some(id) => fetch::<EmployeeEntity, _>(&txn, id, "employee").await?.into(),
        None => Default::default(),
    };
    model.user_id = Set(form.user_id);
    model.slug = Set(slug);
    model.degree_id = Set(form.degree_id);
    model.orcid = Set(orcid);
    model.status_id = Set(form.status_id);
    model.in_evaluation = Set(form.in_evaluation);
    model.discipline_id = Set(form.discipline_id);

    let employee = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    txn.commit().await?;

    info!(employee_id = employee.id, slug = %employee.slug, "Employee saved");
    Ok(employee)
}

pub async fn delete_employee<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<EmployeeEntity, _>(db, id).await
}

pub async fn save_employment<C>(db: &C, form: EmploymentForm) -> Result<Employment>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;

    let txn = db.begin().await?;

    referenced::<EmployeeEntity, _>(&txn, form.employee_id, "employee_id").await?;
    referenced_opt::<PositionEntity, _>(&txn, form.position_id, "position_id").await?;
    referenced_opt::<SubgroupEntity, _>(&txn, form.subgroup_id, "subgroup_id").await?;
    referenced_opt::<DepartmentEntity, _>(&txn, form.department_id, "department_id").await?;

    let mut model: EmploymentActiveModel = match form.id {
        Some(id) => fetch::<EmploymentEntity, _>(&txn, id, "employment").await?.into(),
        None => Default::default(),
    };
    model.employee_id = Set(form.employee_id);
    model.position_id = Set(form.position_id);
    model.subgroup_id = Set(form.subgroup_id);
    model.department_id = Set(form.department_id);

    let employment = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    txn.commit().await?;
    Ok(employment)
}

pub async fn delete_employment<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    delete_row::<EmploymentEntity, _>(db, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{position_groups, DbPool};
    use crate::errors::AppError;
    use crate::services::accounts::{self, NewUser};

    fn named(name: &str) -> NamedForm {
        NamedForm {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_position_classification() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let research = save_group(db, named("Research")).await.unwrap();
        let teaching = save_group(db, named("Teaching")).await.unwrap();
        let professors = save_subgroup(
            db,
            SubgroupForm {
                group_id: research.id,
                name: "Professors".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let adjuncts = save_subgroup(
            db,
            SubgroupForm {
                group_id: research.id,
                name: "Adjuncts".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let lecturers = save_subgroup(
            db,
            SubgroupForm {
                group_id: teaching.id,
                name: "Lecturers".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let position = save_position(
            db,
            PositionForm {
                name: "Professor".to_string(),
                subgroup_ids: vec![professors.id, adjuncts.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let groups = position_groups(db, position.id).await.unwrap();
        assert_eq!(groups.len(), 1);

        save_position(
            db,
            PositionForm {
                id: Some(position.id),
                name: "Professor".to_string(),
                subgroup_ids: vec![professors.id, lecturers.id],
            },
        )
        .await
        .unwrap();
        let groups = position_groups(db, position.id).await.unwrap();
        assert_eq!(groups.len(), 2);

        let err = save_position(
            db,
            PositionForm {
                name: "Ghost".to_string(),
                subgroup_ids: vec![999],
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field(), Some("subgroup_ids"));
    }

    #[tokio::test]
    async fn test_employee_validation_and_uniqueness() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let user = accounts::create_user(db, NewUser::new("jkowalski", "correct horse"))
            .await
            .unwrap();
        let status = save_status(db, named("Employed")).await.unwrap();

        let err = save_employee(db, EmployeeForm::new(user.id, "jan kowalski", status.id))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("slug"));

        let err = save_employee(
            db,
            EmployeeForm {
                orcid: Some("0000-0002".to_string()),
                ..EmployeeForm::new(user.id, "jan-kowalski", status.id)
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field(), Some("orcid"));

        let employee = save_employee(
            db,
            EmployeeForm {
                orcid: Some("  ".to_string()),
                ..EmployeeForm::new(user.id, "jan-kowalski", status.id)
            },
        )
        .await
        .unwrap();
        assert_eq!(employee.orcid, None);
        assert!(employee.in_evaluation);

        let err = save_employee(db, EmployeeForm::new(user.id, "second", status.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));

        let employment = save_employment(
            db,
            EmploymentForm {
                employee_id: employee.id,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(delete_employee(db, employee.id).await.unwrap());
        assert!(EmploymentEntity::find_by_id(employment.id).one(db).await.unwrap().is_none());
    }
}
