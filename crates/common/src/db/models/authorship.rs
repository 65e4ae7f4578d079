//! Authorship entity: links an author to a publication
//!
//! The publication side is a closed tagged reference rather than a
//! foreign key, so rows survive independently of the target table and the
//! aggregation code resolves the target explicitly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of publication an authorship row points at
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum PublicationKind {
    #[sea_orm(string_value = "article")]
    Article,
}

/// Typed publication reference
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PublicationRef {
    Article(i32),
}

impl PublicationRef {
    pub fn kind(&self) -> PublicationKind {
        match self {
            PublicationRef::Article(_) => PublicationKind::Article,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            PublicationRef::Article(id) => *id,
        }
    }

    pub fn from_parts(kind: PublicationKind, id: i32) -> Self {
        match kind {
            PublicationKind::Article => PublicationRef::Article(id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "authorships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub author_id: i32,

    pub publication_kind: PublicationKind,

    pub publication_id: i32,

    /// Position in the author list, starting at 1
    pub order: i32,

    pub percentage: i32,

    pub corresponding_author: bool,

    pub status_id: Option<i32>,

    /// Department the author declared for this publication
    pub affiliation_id: Option<i32>,
}

impl Model {
    pub fn publication(&self) -> PublicationRef {
        PublicationRef::from_parts(self.publication_kind, self.publication_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(
        belongs_to = "super::contribution_status::Entity",
        from = "Column::StatusId",
        to = "super::contribution_status::Column::Id",
        on_delete = "SetNull"
    )]
    Status,

    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::AffiliationId",
        to = "super::department::Column::Id",
        on_delete = "SetNull"
    )]
    Affiliation,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publication_ref_parts() {
        let reference = PublicationRef::Article(42);
        assert_eq!(reference.kind(), PublicationKind::Article);
        assert_eq!(reference.id(), 42);
        assert_eq!(PublicationRef::from_parts(PublicationKind::Article, 42), reference);
    }

    #[test]
    fn test_publication_ref_json_shape() {
        let json = serde_json::to_value(PublicationRef::Article(3)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "article", "id": 3}));
    }
}
