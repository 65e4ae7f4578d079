//! Repository for read-side queries
//!
//! Listings, lookups and the aggregation queries that summarise units,
//! journals, authors and domains with related-row counts. Writes live in
//! `crate::services`.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use sea_orm::prelude::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, Iterable,
    JoinType, ModelTrait, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use serde::{Deserialize, Serialize};

/// University with the size of its subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct UniversitySummary {
    pub id: i32,
    pub name: String,
    pub abbreviation: String,
    pub faculty_count: i64,
    pub department_count: i64,
    /// Distinct employees employed in any of its departments
    pub employee_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct FacultySummary {
    pub id: i32,
    pub university_id: i32,
    pub name: String,
    pub abbreviation: String,
    pub department_count: i64,
    pub employee_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct DepartmentSummary {
    pub id: i32,
    pub faculty_id: i32,
    pub name: String,
    pub abbreviation: String,
    pub employee_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct JournalSummary {
    pub id: i32,
    pub publisher_id: Option<i32>,
    pub title: String,
    pub abbreviation: String,
    pub issn: Option<String>,
    pub ancestor_id: Option<i32>,
    pub impact_factor: Decimal,
    pub points: i32,
    pub article_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct AuthorSummary {
    pub id: i32,
    pub employee_id: Option<i32>,
    pub alias: String,
    pub authorship_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct DomainSummary {
    pub id: i32,
    pub name: String,
    pub discipline_count: i64,
}

/// Position with the distinct groups reached through its subgroups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSummary {
    pub id: i32,
    pub name: String,
    pub subgroup_ids: Vec<i32>,
    pub groups: Vec<Group>,
    /// Exactly one group
    pub is_classified: bool,
}

/// Authorship rows targeting a publication, in author-list order
pub(crate) fn authorship_rows(target: PublicationRef) -> Select<AuthorshipEntity> {
    AuthorshipEntity::find()
        .filter(AuthorshipColumn::PublicationKind.eq(target.kind()))
        .filter(AuthorshipColumn::PublicationId.eq(target.id()))
        .order_by_asc(AuthorshipColumn::Order)
        .order_by_asc(AuthorshipColumn::Id)
}

/// Distinct groups of a position, by group id
pub(crate) async fn position_groups<C: ConnectionTrait>(
    db: &C,
    position_id: i32,
) -> Result<Vec<Group>> {
    GroupEntity::find()
        .join(JoinType::InnerJoin, group::Relation::Subgroup.def())
        .join(JoinType::InnerJoin, subgroup::Relation::PositionSubgroup.def())
        .filter(PositionSubgroupColumn::PositionId.eq(position_id))
        .distinct()
        .order_by_asc(GroupColumn::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Generic Lookups
    // ========================================================================

    /// Every row of an entity, ascending primary key
    pub async fn list<E>(&self) -> Result<Vec<E::Model>>
    where
        E: EntityTrait,
    {
        let mut query = E::find();
        for key in E::PrimaryKey::iter() {
            query = query.order_by_asc(key.into_column());
        }

        query.all(self.read_conn()).await.map_err(Into::into)
    }

    /// One row by id, or `NotFound` naming `resource_type`
    pub async fn get<E>(&self, id: i32, resource_type: &str) -> Result<E::Model>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        E::find_by_id(id)
            .one(self.read_conn())
            .await?
            .ok_or_else(|| AppError::not_found(resource_type, id))
    }

    // ========================================================================
    // Unit Aggregations
    // ========================================================================

    /// Universities with faculty, department and employee counts
    pub async fn university_summaries(&self) -> Result<Vec<UniversitySummary>> {
        UniversityEntity::find()
            .select_only()
            .column(UniversityColumn::Id)
            .column(UniversityColumn::Name)
            .column(UniversityColumn::Abbreviation)
            .column_as(Expr::cust("COUNT(DISTINCT faculties.id)"), "faculty_count")
            .column_as(Expr::cust("COUNT(DISTINCT departments.id)"), "department_count")
            .column_as(
                Expr::cust("COUNT(DISTINCT employments.employee_id)"),
                "employee_count",
            )
            .join(JoinType::LeftJoin, university::Relation::Faculty.def())
            .join(JoinType::LeftJoin, faculty::Relation::Department.def())
            .join(JoinType::LeftJoin, department::Relation::Employment.def())
            .group_by(UniversityColumn::Id)
            .group_by(UniversityColumn::Name)
            .group_by(UniversityColumn::Abbreviation)
            .order_by_asc(UniversityColumn::Id)
            .into_model::<UniversitySummary>()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Faculties with department and employee counts
    pub async fn faculty_summaries(&self) -> Result<Vec<FacultySummary>> {
        FacultyEntity::find()
            .select_only()
            .column(FacultyColumn::Id)
            .column(FacultyColumn::UniversityId)
            .column(FacultyColumn::Name)
            .column(FacultyColumn::Abbreviation)
            .column_as(Expr::cust("COUNT(DISTINCT departments.id)"), "department_count")
            .column_as(
                Expr::cust("COUNT(DISTINCT employments.employee_id)"),
                "employee_count",
            )
            .join(JoinType::LeftJoin, faculty::Relation::Department.def())
            .join(JoinType::LeftJoin, department::Relation::Employment.def())
            .group_by(FacultyColumn::Id)
            .group_by(FacultyColumn::UniversityId)
            .group_by(FacultyColumn::Name)
            .group_by(FacultyColumn::Abbreviation)
            .order_by_asc(FacultyColumn::Id)
            .into_model::<FacultySummary>()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Departments with employee counts
    pub async fn department_summaries(&self) -> Result<Vec<DepartmentSummary>> {
        DepartmentEntity::find()
            .select_only()
            .column(DepartmentColumn::Id)
            .column(DepartmentColumn::FacultyId)
            .column(DepartmentColumn::Name)
            .column(DepartmentColumn::Abbreviation)
            .column_as(
                Expr::cust("COUNT(DISTINCT employments.employee_id)"),
                "employee_count",
            )
            .join(JoinType::LeftJoin, department::Relation::Employment.def())
            .group_by(DepartmentColumn::Id)
            .group_by(DepartmentColumn::FacultyId)
            .group_by(DepartmentColumn::Name)
            .group_by(DepartmentColumn::Abbreviation)
            .order_by_asc(DepartmentColumn::Id)
            .into_model::<DepartmentSummary>()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Publication Aggregations
    // ========================================================================

    /// Journals with article counts
    pub async fn journal_summaries(&self) -> Result<Vec<JournalSummary>> {
        JournalEntity::find()
            .select_only()
            .columns(JournalColumn::iter())
            .column_as(Expr::cust("COUNT(articles.id)"), "article_count")
            .join(JoinType::LeftJoin, journal::Relation::Article.def())
            .group_by(JournalColumn::Id)
            .group_by(JournalColumn::PublisherId)
            .group_by(JournalColumn::Title)
            .group_by(JournalColumn::Abbreviation)
            .group_by(JournalColumn::Issn)
            .group_by(JournalColumn::AncestorId)
            .group_by(JournalColumn::ImpactFactor)
            .group_by(JournalColumn::Points)
            .order_by_asc(JournalColumn::Id)
            .into_model::<JournalSummary>()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Authors with authorship counts
    pub async fn author_summaries(&self) -> Result<Vec<AuthorSummary>> {
        AuthorEntity::find()
            .select_only()
            .column(AuthorColumn::Id)
            .column(AuthorColumn::EmployeeId)
            .column(AuthorColumn::Alias)
            .column_as(Expr::cust("COUNT(authorships.id)"), "authorship_count")
            .join(JoinType::LeftJoin, author::Relation::Authorship.def())
            .group_by(AuthorColumn::Id)
            .group_by(AuthorColumn::EmployeeId)
            .group_by(AuthorColumn::Alias)
            .order_by_asc(AuthorColumn::Id)
            .into_model::<AuthorSummary>()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// An article's authorship rows in author-list order
    pub async fn article_authorships(&self, article_id: i32) -> Result<Vec<Authorship>> {
        self.get::<ArticleEntity>(article_id, "article").await?;

        authorship_rows(PublicationRef::Article(article_id))
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Journals naming `journal_id` as their ancestor
    pub async fn journal_successors(&self, journal_id: i32) -> Result<Vec<Journal>> {
        JournalEntity::find()
            .filter(JournalColumn::AncestorId.eq(journal_id))
            .order_by_asc(JournalColumn::Id)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// The journal's ancestor, if it has one that still exists
    pub async fn journal_ancestor(&self, journal: &Journal) -> Result<Option<Journal>> {
        match journal.ancestor_id {
            Some(id) => JournalEntity::find_by_id(id)
                .one(self.read_conn())
                .await
                .map_err(Into::into),
            None => Ok(None),
        }
    }

    /// Whether the journal's publisher is international; false without one
    pub async fn journal_is_international(&self, journal: &Journal) -> Result<bool> {
        let publisher = journal.find_related(PublisherEntity).one(self.read_conn()).await?;
        Ok(publisher.is_some_and(|p| p.international))
    }

    // ========================================================================
    // Employee Aggregations
    // ========================================================================

    /// Domains with discipline counts
    pub async fn domain_summaries(&self) -> Result<Vec<DomainSummary>> {
        DomainEntity::find()
            .select_only()
            .column(DomainColumn::Id)
            .column(DomainColumn::Name)
            .column_as(Expr::cust("COUNT(disciplines.id)"), "discipline_count")
            .join(JoinType::LeftJoin, domain::Relation::Discipline.def())
            .group_by(DomainColumn::Id)
            .group_by(DomainColumn::Name)
            .order_by_asc(DomainColumn::Id)
            .into_model::<DomainSummary>()
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// One position with its subgroups, groups and classification
    pub async fn position_summary(&self, position: Position) -> Result<PositionSummary> {
        let subgroups = position
            .find_related(SubgroupEntity)
            .order_by_asc(SubgroupColumn::Id)
            .all(self.read_conn())
            .await?;
        let groups = position_groups(self.read_conn(), position.id).await?;

        Ok(PositionSummary {
            id: position.id,
            name: position.name,
            subgroup_ids: subgroups.into_iter().map(|s| s.id).collect(),
            is_classified: groups.len() == 1,
            groups,
        })
    }

    /// All positions, summarised
    pub async fn position_summaries(&self) -> Result<Vec<PositionSummary>> {
        let positions = self.list::<PositionEntity>().await?;

        let mut summaries = Vec::with_capacity(positions.len());
        for position in positions {
            summaries.push(self.position_summary(position).await?);
        }

        Ok(summaries)
    }

    /// An employee's employments, ascending id
    pub async fn employee_employments(&self, employee_id: i32) -> Result<Vec<Employment>> {
        EmploymentEntity::find()
            .filter(EmploymentColumn::EmployeeId.eq(employee_id))
            .order_by_asc(EmploymentColumn::Id)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    pub async fn find_user(&self, id: i32) -> Result<User> {
        self.get::<UserEntity>(id, "user").await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Username.eq(username))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }
}
