//! Author entity
//!
//! An author is either an employee or a free-standing alias; the alias is
//! what appears in an article's author list.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub employee_id: Option<i32>,

    pub alias: String,
}

impl Model {
    pub fn is_employed(&self) -> bool {
        self.employee_id.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "SetNull"
    )]
    Employee,

    #[sea_orm(has_many = "super::authorship::Entity")]
    Authorship,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::authorship::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Authorship.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
