//! Group of positions entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "position_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub abbreviation: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subgroup::Entity")]
    Subgroup,
}

impl Related<super::subgroup::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subgroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
