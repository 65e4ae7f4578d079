//! Scoring propagation
//!
//! An unlocked article mirrors its journal's impact factor and points. The
//! rule is applied when the article itself is saved, and a journal save fans
//! out to every unlocked article of that journal. The journal write and the
//! fan-out share one transaction, so a failure part way leaves no article
//! re-scored and the journal unchanged.

use crate::db::models::*;
use crate::errors::{AppError, Result};
use crate::services::{authorship, delete_row, fetch, referenced, referenced_opt};
use crate::validation;
use chrono::Datelike;
use sea_orm::prelude::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PublisherForm {
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 64))]
    pub abbreviation: String,

    #[serde(default)]
    pub international: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct JournalForm {
    #[serde(default)]
    pub id: Option<i32>,

    #[serde(default)]
    pub publisher_id: Option<i32>,

    #[validate(length(max = 255))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 128))]
    pub abbreviation: String,

    #[serde(default)]
    pub issn: Option<String>,

    #[serde(default)]
    pub ancestor_id: Option<i32>,

    #[serde(default)]
    pub impact_factor: Decimal,

    #[serde(default)]
    pub points: i32,
}

/// Editable article fields; scores only count for locked articles
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ArticleForm {
    #[serde(default)]
    pub id: Option<i32>,

    pub journal_id: i32,

    pub title: String,

    pub year: i32,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub volume: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub issue: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub first_page: String,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub last_page: String,

    #[serde(default)]
    pub doi: Option<String>,

    #[serde(default)]
    #[validate(length(max = 1024))]
    pub url: String,

    #[serde(default)]
    pub locked: bool,

    #[serde(default)]
    pub impact_factor: Option<Decimal>,

    #[serde(default)]
    pub points: Option<i32>,
}

/// Scores an article should carry before it is persisted
///
/// Unlocked articles take the journal's values. Locked articles keep what
/// was asked for, then what they had, then the journal's values.
pub fn article_scores(
    locked: bool,
    requested: (Option<Decimal>, Option<i32>),
    current: Option<(Decimal, i32)>,
    journal: &Journal,
) -> (Decimal, i32) {
    if !locked {
        return (journal.impact_factor, journal.points);
    }

    let (current_if, current_points) =
        current.unwrap_or((journal.impact_factor, journal.points));

    (
        requested.0.unwrap_or(current_if),
        requested.1.unwrap_or(current_points),
    )
}

/// Page and link fields after cleaning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPages {
    pub first_page: String,
    pub last_page: String,
}

/// A last page needs a first page; a one-page range keeps only the first page
pub fn clean_pages(first_page: &str, last_page: &str) -> Result<CleanedPages> {
    let first_page = first_page.trim();
    let last_page = last_page.trim();

    if !last_page.is_empty() && first_page.is_empty() {
        return Err(AppError::invalid(
            "first_page",
            "A last page needs a first page.",
        ));
    }

    let last_page = if first_page == last_page { "" } else { last_page };

    Ok(CleanedPages {
        first_page: first_page.to_string(),
        last_page: last_page.to_string(),
    })
}

// ============================================================================
// Publishers
// ============================================================================

#[instrument(skip(db, form), fields(publisher_id = ?form.id))]
pub async fn save_publisher<C>(db: &C, form: PublisherForm) -> Result<Publisher>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;

    let mut model: PublisherActiveModel = match form.id {
        Some(id) => fetch::<PublisherEntity, _>(db, id, "publisher").await?.into(),
        None => Default::default(),
    };
    model.name = Set(name);
    model.abbreviation = Set(form.abbreviation.trim().to_string());
    model.international = Set(form.international);

    let publisher = match form.id {
        Some(_) => model.update(db).await?,
        None => model.insert(db).await?,
    };

    info!(publisher_id = publisher.id, "Publisher saved");
    Ok(publisher)
}

pub async fn delete_publisher<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    JournalEntity::update_many()
        .col_expr(JournalColumn::PublisherId, Expr::value(Option::<i32>::None))
        .filter(JournalColumn::PublisherId.eq(id))
        .exec(&txn)
        .await?;
    let deleted = delete_row::<PublisherEntity, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(deleted)
}

// ============================================================================
// Journals
// ============================================================================

/// Validate, persist, then re-score every unlocked article of the journal
#[instrument(skip(db, form), fields(journal_id = ?form.id))]
pub async fn save_journal<C>(db: &C, form: JournalForm) -> Result<Journal>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;

    if form.id.is_some() && form.ancestor_id == form.id {
        return Err(AppError::invalid(
            "ancestor",
            "A journal cannot be its own ancestor.",
        ));
    }

    let title = validation::required("title", &form.title)?;
    let issn = validation::blank_to_none(form.issn);
    if let Some(ref issn) = issn {
        validation::issn(issn)?;
    }
    validation::non_negative_decimal("impact_factor", form.impact_factor)?;
    validation::non_negative("points", form.points)?;

    let txn = db.begin().await?;

    referenced_opt::<PublisherEntity, _>(&txn, form.publisher_id, "publisher_id").await?;
    referenced_opt::<JournalEntity, _>(&txn, form.ancestor_id, "ancestor").await?;

    let mut model: JournalActiveModel = match form.id {
        Some(id) => fetch::<JournalEntity, _>(&txn, id, "journal").await?.into(),
        None => Default::default(),
    };
    model.publisher_id = Set(form.publisher_id);
    model.title = Set(title);
    model.abbreviation = Set(form.abbreviation.trim().to_string());
    model.issn = Set(issn);
    model.ancestor_id = Set(form.ancestor_id);
    model.impact_factor = Set(form.impact_factor);
    model.points = Set(form.points);

    let journal = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    let rescored = rescore_articles(&txn, &journal).await?;

    txn.commit().await?;

    info!(
        journal_id = journal.id,
        impact_factor = %journal.impact_factor,
        points = journal.points,
        rescored,
        "Journal saved"
    );
    Ok(journal)
}

/// Copy the journal's scores onto each of its unlocked articles
///
/// One guarded update per article, ascending id. The guard re-checks
/// `locked` at write time, so an article locked since the listing keeps its
/// scores.
pub async fn rescore_articles<C: ConnectionTrait>(db: &C, journal: &Journal) -> Result<u64> {
    let article_ids: Vec<i32> = ArticleEntity::find()
        .select_only()
        .column(ArticleColumn::Id)
        .filter(ArticleColumn::JournalId.eq(journal.id))
        .filter(ArticleColumn::Locked.eq(false))
        .order_by_asc(ArticleColumn::Id)
        .into_tuple()
        .all(db)
        .await?;

    let mut rescored = 0;
    for article_id in article_ids {
        let result = ArticleEntity::update_many()
            .col_expr(ArticleColumn::ImpactFactor, Expr::value(journal.impact_factor))
            .col_expr(ArticleColumn::Points, Expr::value(journal.points))
            .filter(ArticleColumn::Id.eq(article_id))
            .filter(ArticleColumn::Locked.eq(false))
            .exec(db)
            .await?;
        rescored += result.rows_affected;
    }

    debug!(journal_id = journal.id, rescored, "Fan-out finished");
    crate::metrics::record_rescore("journal", rescored);
    Ok(rescored)
}

/// Delete a journal with its articles and their authorship rows
///
/// Successors lose their ancestor link.
#[instrument(skip(db))]
pub async fn delete_journal<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let article_ids: Vec<i32> = ArticleEntity::find()
        .select_only()
        .column(ArticleColumn::Id)
        .filter(ArticleColumn::JournalId.eq(id))
        .into_tuple()
        .all(&txn)
        .await?;

    if !article_ids.is_empty() {
        AuthorshipEntity::delete_many()
            .filter(AuthorshipColumn::PublicationKind.eq(PublicationKind::Article))
            .filter(AuthorshipColumn::PublicationId.is_in(article_ids.clone()))
            .exec(&txn)
            .await?;
        ArticleEntity::delete_many()
            .filter(ArticleColumn::Id.is_in(article_ids.clone()))
            .exec(&txn)
            .await?;
    }

    JournalEntity::update_many()
        .col_expr(JournalColumn::AncestorId, Expr::value(Option::<i32>::None))
        .filter(JournalColumn::AncestorId.eq(id))
        .exec(&txn)
        .await?;

    let deleted = delete_row::<JournalEntity, _>(&txn, id).await?;

    txn.commit().await?;

    info!(journal_id = id, articles = article_ids.len(), deleted, "Journal deleted");
    Ok(deleted)
}

// ============================================================================
// Articles
// ============================================================================

/// Clean, score from the journal, persist and refresh the author summary
#[instrument(skip(db, form), fields(article_id = ?form.id, journal_id = form.journal_id))]
pub async fn save_article<C>(db: &C, form: ArticleForm) -> Result<Article>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;

    let title = validation::required("title", &form.title)?;
    let max_year = chrono::Utc::now().year() + 1;
    if form.year < 0 || form.year > max_year {
        return Err(AppError::invalid(
            "year",
            format!("The year must be between 0 and {}.", max_year),
        ));
    }
    let pages = clean_pages(&form.first_page, &form.last_page)?;
    let doi = validation::blank_to_none(form.doi);
    if let Some(ref doi) = doi {
        validation::doi(doi)?;
    }
    let url = match doi {
        Some(_) => String::new(),
        None => form.url.trim().to_string(),
    };
    if let Some(impact_factor) = form.impact_factor {
        validation::non_negative_decimal("impact_factor", impact_factor)?;
    }
    if let Some(points) = form.points {
        validation::non_negative("points", points)?;
    }

    let txn = db.begin().await?;

    let journal = referenced::<JournalEntity, _>(&txn, form.journal_id, "journal_id").await?;

    let (mut model, current): (ArticleActiveModel, _) = match form.id {
        Some(id) => {
            let existing = fetch::<ArticleEntity, _>(&txn, id, "article").await?;
            let current = (existing.impact_factor, existing.points);
            (existing.into(), Some(current))
        }
        None => {
            let model = ArticleActiveModel {
                authors: Set(String::new()),
                author_count: Set(0),
                ..Default::default()
            };
            (model, None)
        }
    };

    let (impact_factor, points) = article_scores(
        form.locked,
        (form.impact_factor, form.points),
        current,
        &journal,
    );

    model.journal_id = Set(journal.id);
    model.title = Set(title);
    model.year = Set(form.year);
    model.volume = Set(form.volume.trim().to_string());
    model.issue = Set(form.issue.trim().to_string());
    model.first_page = Set(pages.first_page);
    model.last_page = Set(pages.last_page);
    model.doi = Set(doi);
    model.url = Set(url);
    model.locked = Set(form.locked);
    model.impact_factor = Set(impact_factor);
    model.points = Set(points);

    let article = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    let article = authorship::refresh_article_authors(&txn, article.id)
        .await?
        .unwrap_or(article);

    txn.commit().await?;

    if !article.locked {
        crate::metrics::record_rescore("article", 1);
    }
    info!(article_id = article.id, locked = article.locked, "Article saved");
    Ok(article)
}

/// Delete an article and the authorship rows pointing at it
#[instrument(skip(db))]
pub async fn delete_article<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    AuthorshipEntity::delete_many()
        .filter(AuthorshipColumn::PublicationKind.eq(PublicationKind::Article))
        .filter(AuthorshipColumn::PublicationId.eq(id))
        .exec(&txn)
        .await?;
    let deleted = delete_row::<ArticleEntity, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbPool;

    fn journal(impact_factor: Decimal, points: i32) -> Journal {
        Journal {
            id: 1,
            publisher_id: None,
            title: "Journal of Tests".to_string(),
            abbreviation: String::new(),
            issn: None,
            ancestor_id: None,
            impact_factor,
            points,
        }
    }

    fn journal_form(title: &str, impact_factor: Decimal, points: i32) -> JournalForm {
        JournalForm {
            title: title.to_string(),
            impact_factor,
            points,
            ..Default::default()
        }
    }

    fn article_form(journal_id: i32, title: &str) -> ArticleForm {
        ArticleForm {
            journal_id,
            title: title.to_string(),
            year: 2020,
            ..Default::default()
        }
    }

    #[test]
    fn test_unlocked_article_takes_journal_scores() {
        let j = journal(Decimal::new(25, 1), 20);
        let scores = article_scores(false, (Some(Decimal::ONE), Some(5)), None, &j);
        assert_eq!(scores, (Decimal::new(25, 1), 20));
    }

    #[test]
    fn test_locked_article_keeps_scores() {
        let j = journal(Decimal::new(25, 1), 20);

        let requested = article_scores(true, (Some(Decimal::ONE), Some(5)), None, &j);
        assert_eq!(requested, (Decimal::ONE, 5));

        let kept = article_scores(true, (None, None), Some((Decimal::ONE, 5)), &j);
        assert_eq!(kept, (Decimal::ONE, 5));

        let fresh = article_scores(true, (None, None), None, &j);
        assert_eq!(fresh, (Decimal::new(25, 1), 20));
    }

    #[test]
    fn test_clean_pages() {
        let pages = clean_pages("10", "20").unwrap();
        assert_eq!(pages.last_page, "20");

        let single = clean_pages("10", "10").unwrap();
        assert_eq!(single.first_page, "10");
        assert_eq!(single.last_page, "");

        let err = clean_pages("", "20").unwrap_err();
        assert_eq!(err.field(), Some("first_page"));
    }

    #[tokio::test]
    async fn test_journal_change_propagates_to_unlocked_articles() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let j = save_journal(db, journal_form("Journal of Tests", Decimal::new(25, 1), 20))
            .await
            .unwrap();

        let a1 = save_article(db, article_form(j.id, "Unlocked")).await.unwrap();
        assert_eq!(a1.impact_factor, Decimal::new(25, 1));
        assert_eq!(a1.points, 20);

        let a2 = save_article(
            db,
            ArticleForm {
                locked: true,
                impact_factor: Some(Decimal::ONE),
                points: Some(5),
                ..article_form(j.id, "Locked")
            },
        )
        .await
        .unwrap();
        assert_eq!(a2.impact_factor, Decimal::ONE);
        assert_eq!(a2.points, 5);

        save_journal(
            db,
            JournalForm {
                id: Some(j.id),
                ..journal_form("Journal of Tests", Decimal::new(30, 1), 20)
            },
        )
        .await
        .unwrap();

        let a1 = ArticleEntity::find_by_id(a1.id).one(db).await.unwrap().unwrap();
        assert_eq!(a1.impact_factor, Decimal::new(30, 1));

        let a2 = ArticleEntity::find_by_id(a2.id).one(db).await.unwrap().unwrap();
        assert_eq!(a2.impact_factor, Decimal::ONE);
        assert_eq!(a2.points, 5);
    }

    #[tokio::test]
    async fn test_resave_is_idempotent() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let j = save_journal(db, journal_form("Journal", Decimal::new(1500, 3), 40))
            .await
            .unwrap();
        let a = save_article(db, article_form(j.id, "Stable")).await.unwrap();

        let again = save_article(
            db,
            ArticleForm {
                id: Some(a.id),
                ..article_form(j.id, "Stable")
            },
        )
        .await
        .unwrap();
        assert_eq!(again, a);

        let j_again = save_journal(
            db,
            JournalForm {
                id: Some(j.id),
                ..journal_form("Journal", Decimal::new(1500, 3), 40)
            },
        )
        .await
        .unwrap();
        assert_eq!(j_again, j);

        let reloaded = ArticleEntity::find_by_id(a.id).one(db).await.unwrap().unwrap();
        assert_eq!(reloaded, a);
    }

    #[tokio::test]
    async fn test_unchanged_journal_resave_resyncs_articles() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let j = save_journal(db, journal_form("Journal", Decimal::new(25, 1), 20))
            .await
            .unwrap();
        let a = save_article(db, article_form(j.id, "Drifted")).await.unwrap();

        // Out-of-band write leaves the article out of step with its journal
        db.execute_unprepared(&format!(
            "UPDATE articles SET impact_factor = 9, points = 1 WHERE id = {}",
            a.id
        ))
        .await
        .unwrap();
        let drifted = ArticleEntity::find_by_id(a.id).one(db).await.unwrap().unwrap();
        assert_eq!(drifted.impact_factor, Decimal::new(9, 0));

        save_journal(
            db,
            JournalForm {
                id: Some(j.id),
                ..journal_form("Journal", Decimal::new(25, 1), 20)
            },
        )
        .await
        .unwrap();

        let synced = ArticleEntity::find_by_id(a.id).one(db).await.unwrap().unwrap();
        assert_eq!(synced.impact_factor, Decimal::new(25, 1));
        assert_eq!(synced.points, 20);
    }

    #[tokio::test]
    async fn test_self_ancestor_rejected_without_write() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let j = save_journal(db, journal_form("Journal", Decimal::ONE, 10))
            .await
            .unwrap();

        let err = save_journal(
            db,
            JournalForm {
                id: Some(j.id),
                ancestor_id: Some(j.id),
                ..journal_form("Renamed", Decimal::new(2, 0), 10)
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field(), Some("ancestor"));

        let stored = JournalEntity::find_by_id(j.id).one(db).await.unwrap().unwrap();
        assert_eq!(stored.title, "Journal");
        assert_eq!(stored.impact_factor, Decimal::ONE);
    }

    #[tokio::test]
    async fn test_journal_validation() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let err = save_journal(
            db,
            JournalForm {
                issn: Some("1234".to_string()),
                ..journal_form("Journal", Decimal::ONE, 10)
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field(), Some("issn"));

        let err = save_journal(db, journal_form("Journal", Decimal::new(-1, 0), 10))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("impact_factor"));

        let err = save_journal(
            db,
            JournalForm {
                publisher_id: Some(99),
                ..journal_form("Journal", Decimal::ONE, 10)
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field(), Some("publisher_id"));
    }

    #[tokio::test]
    async fn test_article_cleaning() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let j = save_journal(db, journal_form("Journal", Decimal::ONE, 10))
            .await
            .unwrap();

        let a = save_article(
            db,
            ArticleForm {
                first_page: "7".to_string(),
                last_page: "7".to_string(),
                doi: Some(" 10.1000/xyz123 ".to_string()),
                url: "https://example.org/a".to_string(),
                ..article_form(j.id, "Cleaned")
            },
        )
        .await
        .unwrap();
        assert_eq!(a.last_page, "");
        assert_eq!(a.url, "");
        assert_eq!(a.doi.as_deref(), Some("10.1000/xyz123"));

        let blank_doi = save_article(
            db,
            ArticleForm {
                doi: Some("   ".to_string()),
                ..article_form(j.id, "No DOI")
            },
        )
        .await
        .unwrap();
        assert_eq!(blank_doi.doi, None);

        let err = save_article(
            db,
            ArticleForm {
                year: chrono::Utc::now().year() + 2,
                ..article_form(j.id, "From the future")
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field(), Some("year"));

        let err = save_article(db, article_form(42, "Orphan")).await.unwrap_err();
        assert_eq!(err.field(), Some("journal_id"));
    }

    #[tokio::test]
    async fn test_duplicate_doi_is_conflict() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let j = save_journal(db, journal_form("Journal", Decimal::ONE, 10))
            .await
            .unwrap();
        let form = ArticleForm {
            doi: Some("10.1000/dup".to_string()),
            ..article_form(j.id, "First")
        };
        save_article(db, form.clone()).await.unwrap();

        let err = save_article(db, form).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_fan_out_rolls_back_on_failure() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let j = save_journal(db, journal_form("Journal", Decimal::ONE, 10))
            .await
            .unwrap();
        let first = save_article(db, article_form(j.id, "First")).await.unwrap();
        let second = save_article(db, article_form(j.id, "Second")).await.unwrap();

        db.execute_unprepared(&format!(
            "CREATE TRIGGER fail_rescore BEFORE UPDATE ON articles \
             WHEN NEW.id = {} BEGIN SELECT RAISE(ABORT, 'rescore failed'); END;",
            second.id
        ))
        .await
        .unwrap();

        let result = save_journal(
            db,
            JournalForm {
                id: Some(j.id),
                ..journal_form("Journal", Decimal::new(9, 0), 90)
            },
        )
        .await;
        assert!(result.is_err());

        let stored = JournalEntity::find_by_id(j.id).one(db).await.unwrap().unwrap();
        assert_eq!(stored.impact_factor, Decimal::ONE);

        let first = ArticleEntity::find_by_id(first.id).one(db).await.unwrap().unwrap();
        assert_eq!(first.impact_factor, Decimal::ONE);
        assert_eq!(first.points, 10);
    }

    #[tokio::test]
    async fn test_delete_journal_cascades_and_detaches_successors() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let old = save_journal(db, journal_form("Old", Decimal::ONE, 10))
            .await
            .unwrap();
        let new = save_journal(
            db,
            JournalForm {
                ancestor_id: Some(old.id),
                ..journal_form("New", Decimal::ONE, 10)
            },
        )
        .await
        .unwrap();
        let article = save_article(db, article_form(old.id, "Gone")).await.unwrap();

        let author = AuthorActiveModel {
            employee_id: Set(None),
            alias: Set("Nowak A.".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        AuthorshipActiveModel {
            author_id: Set(author.id),
            publication_kind: Set(PublicationKind::Article),
            publication_id: Set(article.id),
            order: Set(1),
            percentage: Set(0),
            corresponding_author: Set(false),
            status_id: Set(None),
            affiliation_id: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        assert!(delete_journal(db, old.id).await.unwrap());
        assert!(!delete_journal(db, old.id).await.unwrap());

        assert!(ArticleEntity::find_by_id(article.id).one(db).await.unwrap().is_none());
        assert_eq!(AuthorshipEntity::find().all(db).await.unwrap().len(), 0);

        let new = JournalEntity::find_by_id(new.id).one(db).await.unwrap().unwrap();
        assert_eq!(new.ancestor_id, None);
    }
}
