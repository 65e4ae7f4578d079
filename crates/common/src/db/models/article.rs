//! Article entity
//!
//! `impact_factor` and `points` are derived from the journal unless the
//! article is locked; `authors` and `author_count` are a cache of the
//! article's authorship rows. None of the four is edited through forms.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub journal_id: i32,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    pub year: i32,

    pub volume: String,

    pub issue: String,

    pub first_page: String,

    pub last_page: String,

    #[sea_orm(unique)]
    pub doi: Option<String>,

    pub url: String,

    /// Frozen scores, exempt from journal propagation
    pub locked: bool,

    #[sea_orm(column_type = "Decimal(Some((6, 3)))")]
    pub impact_factor: Decimal,

    pub points: i32,

    /// Author aliases joined with ", " in authorship order
    #[sea_orm(column_type = "Text")]
    pub authors: String,

    pub author_count: i32,
}

impl Model {
    /// "12 (3)", "12" or "3" depending on which of volume/issue are set
    pub fn volume_issue(&self) -> String {
        let head = if self.volume.is_empty() { &self.issue } else { &self.volume };
        let tail = if !self.issue.is_empty() && !self.volume.is_empty() {
            format!("({})", self.issue)
        } else {
            String::new()
        };
        format!("{} {}", head, tail).trim().to_string()
    }

    /// "10-20", or just the first page
    pub fn pages(&self) -> String {
        if self.last_page.is_empty() {
            self.first_page.clone()
        } else {
            format!("{}-{}", self.first_page, self.last_page)
        }
    }

    /// Reference string: "Title. J Abbr; 2021, 12 (3), 10-20."
    pub fn citation(&self, journal: &super::journal::Model) -> String {
        let details = [self.year.to_string(), self.volume_issue(), self.pages()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        format!("{}. {}; {}.", self.title, journal.short_title(), details)
    }

    /// DOI resolver link when a DOI is known, otherwise the stored URL
    pub fn resolved_url(&self) -> String {
        match &self.doi {
            Some(doi) => format!("https://doi.org/{}", doi),
            None => self.url.clone(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal::Entity",
        from = "Column::JournalId",
        to = "super::journal::Column::Id",
        on_delete = "Cascade"
    )]
    Journal,
}

impl Related<super::journal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Model {
        Model {
            id: 1,
            journal_id: 1,
            title: "On cascading updates".to_string(),
            year: 2021,
            volume: "12".to_string(),
            issue: "3".to_string(),
            first_page: "10".to_string(),
            last_page: "20".to_string(),
            doi: None,
            url: "https://example.org/a".to_string(),
            locked: false,
            impact_factor: Decimal::ZERO,
            points: 0,
            authors: String::new(),
            author_count: 0,
        }
    }

    fn journal(abbreviation: &str) -> super::super::journal::Model {
        super::super::journal::Model {
            id: 1,
            publisher_id: None,
            title: "Journal of Tests".to_string(),
            abbreviation: abbreviation.to_string(),
            issn: None,
            ancestor_id: None,
            impact_factor: Decimal::ZERO,
            points: 0,
        }
    }

    #[test]
    fn test_volume_issue() {
        let mut a = article();
        assert_eq!(a.volume_issue(), "12 (3)");
        a.issue.clear();
        assert_eq!(a.volume_issue(), "12");
        a.issue = "3".to_string();
        a.volume.clear();
        assert_eq!(a.volume_issue(), "3");
    }

    #[test]
    fn test_citation() {
        let mut a = article();
        assert_eq!(
            a.citation(&journal("J Tests")),
            "On cascading updates. J Tests; 2021, 12 (3), 10-20."
        );

        a.volume.clear();
        a.issue.clear();
        a.last_page.clear();
        assert_eq!(
            a.citation(&journal("")),
            "On cascading updates. Journal of Tests; 2021, 10."
        );
    }

    #[test]
    fn test_resolved_url_prefers_doi() {
        let mut a = article();
        assert_eq!(a.resolved_url(), "https://example.org/a");
        a.doi = Some("10.1000/xyz123".to_string());
        assert_eq!(a.resolved_url(), "https://doi.org/10.1000/xyz123");
    }
}
