//! Position entity
//!
//! A position is classified into groups through its subgroups.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "positions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::position_subgroup::Entity")]
    PositionSubgroup,
}

impl Related<super::subgroup::Entity> for Entity {
    fn to() -> RelationDef {
        super::position_subgroup::Relation::Subgroup.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::position_subgroup::Relation::Position.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
