//! Journal entity
//!
//! Journals carry the bibliometric scores (impact factor, points) that
//! unlocked articles inherit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub publisher_id: Option<i32>,

    pub title: String,

    pub abbreviation: String,

    /// Electronic ISSN, or the print one when there is no e-ISSN
    pub issn: Option<String>,

    /// Predecessor journal
    pub ancestor_id: Option<i32>,

    #[sea_orm(column_type = "Decimal(Some((6, 3)))")]
    pub impact_factor: Decimal,

    pub points: i32,
}

impl Model {
    /// Title followed by the publisher label in parentheses, when there is one
    pub fn display_name(&self, publisher: Option<&super::publisher::Model>) -> String {
        match publisher {
            Some(publisher) => format!("{} ({})", self.title, publisher.label()),
            None => self.title.clone(),
        }
    }

    /// Abbreviation when set, otherwise the full title
    pub fn short_title(&self) -> &str {
        if self.abbreviation.is_empty() {
            &self.title
        } else {
            &self.abbreviation
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::publisher::Entity",
        from = "Column::PublisherId",
        to = "super::publisher::Column::Id",
        on_delete = "SetNull"
    )]
    Publisher,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::AncestorId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Ancestor,

    #[sea_orm(has_many = "super::article::Entity")]
    Article,
}

impl Related<super::publisher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publisher.def()
    }
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Article.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
