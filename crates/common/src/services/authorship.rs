//! Authorship aggregation
//!
//! An article caches its author list (`authors`) and the number of
//! authorship rows (`author_count`). Every write that can change either one
//! (authorship rows, author aliases, the article itself) recomputes the
//! cache for each affected article before its transaction commits.

use crate::db::models::*;
use crate::db::authorship_rows;
use crate::errors::{AppError, Result};
use crate::services::{delete_row, fetch, referenced, referenced_opt};
use crate::validation;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AuthorForm {
    #[serde(default)]
    pub id: Option<i32>,

    #[serde(default)]
    pub employee_id: Option<i32>,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub alias: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AuthorshipForm {
    #[serde(default)]
    pub id: Option<i32>,

    pub author_id: i32,

    pub publication: PublicationRef,

    #[serde(default = "default_order")]
    #[validate(range(min = 1))]
    pub order: i32,

    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub percentage: i32,

    #[serde(default)]
    pub corresponding_author: bool,

    #[serde(default)]
    pub status_id: Option<i32>,

    #[serde(default)]
    pub affiliation_id: Option<i32>,
}

fn default_order() -> i32 {
    1
}

impl AuthorshipForm {
    pub fn new(author_id: i32, publication: PublicationRef) -> Self {
        Self {
            id: None,
            author_id,
            publication,
            order: default_order(),
            percentage: 0,
            corresponding_author: false,
            status_id: None,
            affiliation_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContributionStatusForm {
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(length(max = 255))]
    pub name: String,

    #[validate(length(max = 16))]
    pub code: String,
}

/// Author list and count for aliases given in author-list order
pub fn summarize<'a>(aliases: impl IntoIterator<Item = &'a str>) -> (String, i32) {
    let aliases: Vec<&str> = aliases.into_iter().collect();
    (aliases.join(", "), aliases.len() as i32)
}

// ============================================================================
// Aggregation
// ============================================================================

/// Recompute the cached author fields of one publication
pub async fn refresh_publication<C: ConnectionTrait>(
    db: &C,
    target: PublicationRef,
) -> Result<()> {
    match target {
        PublicationRef::Article(id) => refresh_article_authors(db, id).await.map(|_| ()),
    }
}

/// Recompute `authors` and `author_count` of an article
///
/// Returns the updated article, or `None` when the article no longer exists.
/// Only the two cached columns are written.
pub async fn refresh_article_authors<C: ConnectionTrait>(
    db: &C,
    article_id: i32,
) -> Result<Option<Article>> {
    let Some(mut article) = ArticleEntity::find_by_id(article_id).one(db).await? else {
        debug!(article_id, "Article gone, skipping author refresh");
        return Ok(None);
    };

    let rows = authorship_rows(PublicationRef::Article(article_id))
        .find_also_related(AuthorEntity)
        .all(db)
        .await?;

    let (authors, author_count) =
        summarize(rows.iter().filter_map(|(_, author)| author.as_ref()).map(|a| a.alias.as_str()));

    ArticleEntity::update_many()
        .col_expr(ArticleColumn::Authors, Expr::value(authors.clone()))
        .col_expr(ArticleColumn::AuthorCount, Expr::value(author_count))
        .filter(ArticleColumn::Id.eq(article_id))
        .exec(db)
        .await?;

    crate::metrics::record_authorship_refresh();
    debug!(article_id, author_count, "Author summary refreshed");

    article.authors = authors;
    article.author_count = author_count;
    Ok(Some(article))
}

/// Distinct publications an author has rows on
async fn publications_of<C: ConnectionTrait>(
    db: &C,
    author_id: i32,
) -> Result<BTreeSet<(i32, PublicationKind)>> {
    let rows: Vec<(PublicationKind, i32)> = AuthorshipEntity::find()
        .select_only()
        .column(AuthorshipColumn::PublicationKind)
        .column(AuthorshipColumn::PublicationId)
        .filter(AuthorshipColumn::AuthorId.eq(author_id))
        .order_by_asc(AuthorshipColumn::PublicationId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|(kind, id)| (id, kind)).collect())
}

async fn refresh_all<C: ConnectionTrait>(
    db: &C,
    targets: BTreeSet<(i32, PublicationKind)>,
) -> Result<()> {
    for (id, kind) in targets {
        refresh_publication(db, PublicationRef::from_parts(kind, id)).await?;
    }
    Ok(())
}

// ============================================================================
// Authors
// ============================================================================

/// Save an author; an employee with no alias gets the employee's short name
#[instrument(skip(db, form), fields(author_id = ?form.id))]
pub async fn save_author<C>(db: &C, form: AuthorForm) -> Result<Author>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;

    let txn = db.begin().await?;

    let employee =
        referenced_opt::<EmployeeEntity, _>(&txn, form.employee_id, "employee_id").await?;

    let mut alias = form.alias.trim().to_string();
    match employee {
        None if alias.is_empty() => {
            return Err(AppError::invalid(
                "alias",
                "An author needs an employee or an alias.",
            ));
        }
        Some(ref employee) if alias.is_empty() => {
            let user = referenced::<UserEntity, _>(&txn, employee.user_id, "employee_id").await?;
            alias = user.short_name();
        }
        _ => {}
    }

    let mut model: AuthorActiveModel = match form.id {
        Some(id) => fetch::<AuthorEntity, _>(&txn, id, "author").await?.into(),
        None => Default::default(),
    };
    model.employee_id = Set(form.employee_id);
    model.alias = Set(alias);

    let author = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    if form.id.is_some() {
        let targets = publications_of(&txn, author.id).await?;
        refresh_all(&txn, targets).await?;
    }

    txn.commit().await?;

    info!(author_id = author.id, alias = %author.alias, "Author saved");
    Ok(author)
}

/// Delete an author with its rows, refreshing the articles it was on
#[instrument(skip(db))]
pub async fn delete_author<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let targets = publications_of(&txn, id).await?;
    AuthorshipEntity::delete_many()
        .filter(AuthorshipColumn::AuthorId.eq(id))
        .exec(&txn)
        .await?;
    let deleted = delete_row::<AuthorEntity, _>(&txn, id).await?;
    refresh_all(&txn, targets).await?;

    txn.commit().await?;
    Ok(deleted)
}

// ============================================================================
// Authorships
// ============================================================================

async fn ensure_publication<C: ConnectionTrait>(db: &C, target: PublicationRef) -> Result<()> {
    match target {
        PublicationRef::Article(id) => {
            referenced::<ArticleEntity, _>(db, id, "publication").await?;
        }
    }
    Ok(())
}

/// Save an authorship row and refresh the publications it touches
///
/// Moving a row to another publication refreshes both the old and the new
/// target.
#[instrument(skip(db, form), fields(authorship_id = ?form.id, publication = ?form.publication))]
pub async fn save_authorship<C>(db: &C, form: AuthorshipForm) -> Result<Authorship>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;

    let txn = db.begin().await?;

    referenced::<AuthorEntity, _>(&txn, form.author_id, "author_id").await?;
    ensure_publication(&txn, form.publication).await?;
    referenced_opt::<ContributionStatusEntity, _>(&txn, form.status_id, "status_id").await?;
    referenced_opt::<DepartmentEntity, _>(&txn, form.affiliation_id, "affiliation_id").await?;

    let (mut model, previous): (AuthorshipActiveModel, _) = match form.id {
        Some(id) => {
            let existing = fetch::<AuthorshipEntity, _>(&txn, id, "authorship").await?;
            let previous = existing.publication();
            (existing.into(), Some(previous))
        }
        None => (Default::default(), None),
    };
    model.author_id = Set(form.author_id);
    model.publication_kind = Set(form.publication.kind());
    model.publication_id = Set(form.publication.id());
    model.order = Set(form.order);
    model.percentage = Set(form.percentage);
    model.corresponding_author = Set(form.corresponding_author);
    model.status_id = Set(form.status_id);
    model.affiliation_id = Set(form.affiliation_id);

    let authorship = match form.id {
        Some(_) => model.update(&txn).await?,
        None => model.insert(&txn).await?,
    };

    refresh_publication(&txn, authorship.publication()).await?;
    if let Some(previous) = previous.filter(|p| *p != authorship.publication()) {
        refresh_publication(&txn, previous).await?;
    }

    txn.commit().await?;

    info!(authorship_id = authorship.id, "Authorship saved");
    Ok(authorship)
}

#[instrument(skip(db))]
pub async fn delete_authorship<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let Some(existing) = AuthorshipEntity::find_by_id(id).one(&txn).await? else {
        return Ok(false);
    };
    delete_row::<AuthorshipEntity, _>(&txn, id).await?;
    refresh_publication(&txn, existing.publication()).await?;

    txn.commit().await?;
    Ok(true)
}

// ============================================================================
// Contribution Statuses
// ============================================================================

pub async fn save_contribution_status<C>(
    db: &C,
    form: ContributionStatusForm,
) -> Result<ContributionStatus>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let name = validation::required("name", &form.name)?;
    let code = validation::required("code", &form.code)?;

    let mut model: ContributionStatusActiveModel = match form.id {
        Some(id) => fetch::<ContributionStatusEntity, _>(db, id, "contribution status")
            .await?
            .into(),
        None => Default::default(),
    };
    model.name = Set(name);
    model.code = Set(code);

    let status = match form.id {
        Some(_) => model.update(db).await?,
        None => model.insert(db).await?,
    };
    Ok(status)
}

pub async fn delete_contribution_status<C>(db: &C, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    AuthorshipEntity::update_many()
        .col_expr(AuthorshipColumn::StatusId, Expr::value(Option::<i32>::None))
        .filter(AuthorshipColumn::StatusId.eq(id))
        .exec(&txn)
        .await?;
    let deleted = delete_row::<ContributionStatusEntity, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbPool;
    use crate::services::scoring::{self, ArticleForm, JournalForm};
    use sea_orm::prelude::Decimal;

    async fn article(db: &sea_orm::DatabaseConnection, title: &str) -> Article {
        let journal = scoring::save_journal(
            db,
            JournalForm {
                title: "Journal".to_string(),
                impact_factor: Decimal::ONE,
                points: 10,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        scoring::save_article(
            db,
            ArticleForm {
                journal_id: journal.id,
                title: title.to_string(),
                year: 2021,
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    async fn author(db: &sea_orm::DatabaseConnection, alias: &str) -> Author {
        save_author(
            db,
            AuthorForm {
                alias: alias.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    async fn reload(db: &sea_orm::DatabaseConnection, id: i32) -> Article {
        ArticleEntity::find_by_id(id).one(db).await.unwrap().unwrap()
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize(["Nowak", "Kowalski"]), ("Nowak, Kowalski".to_string(), 2));
        assert_eq!(summarize(Vec::<&str>::new()), (String::new(), 0));
    }

    #[tokio::test]
    async fn test_authors_follow_order() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let a = article(db, "Ordered").await;
        let kowalski = author(db, "Kowalski").await;
        let nowak = author(db, "Nowak").await;

        save_authorship(
            db,
            AuthorshipForm {
                order: 2,
                ..AuthorshipForm::new(kowalski.id, PublicationRef::Article(a.id))
            },
        )
        .await
        .unwrap();
        save_authorship(db, AuthorshipForm::new(nowak.id, PublicationRef::Article(a.id)))
            .await
            .unwrap();

        let a = reload(db, a.id).await;
        assert_eq!(a.authors, "Nowak, Kowalski");
        assert_eq!(a.author_count, 2);
    }

    #[tokio::test]
    async fn test_equal_order_breaks_ties_by_creation() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let a = article(db, "Tied").await;
        let first = author(db, "Zieliński").await;
        let second = author(db, "Adamski").await;

        for author in [&first, &second] {
            save_authorship(db, AuthorshipForm::new(author.id, PublicationRef::Article(a.id)))
                .await
                .unwrap();
        }

        assert_eq!(reload(db, a.id).await.authors, "Zieliński, Adamski");
    }

    #[tokio::test]
    async fn test_deleting_last_row_resets_summary() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let a = article(db, "Lonely").await;
        let nowak = author(db, "Nowak").await;
        let row = save_authorship(db, AuthorshipForm::new(nowak.id, PublicationRef::Article(a.id)))
            .await
            .unwrap();
        assert_eq!(reload(db, a.id).await.author_count, 1);

        assert!(delete_authorship(db, row.id).await.unwrap());
        assert!(!delete_authorship(db, row.id).await.unwrap());

        let a = reload(db, a.id).await;
        assert_eq!(a.authors, "");
        assert_eq!(a.author_count, 0);
    }

    #[tokio::test]
    async fn test_moving_row_refreshes_both_articles() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let from = article(db, "From").await;
        let to = article(db, "To").await;
        let nowak = author(db, "Nowak").await;

        let row = save_authorship(db, AuthorshipForm::new(nowak.id, PublicationRef::Article(from.id)))
            .await
            .unwrap();

        save_authorship(
            db,
            AuthorshipForm {
                id: Some(row.id),
                ..AuthorshipForm::new(nowak.id, PublicationRef::Article(to.id))
            },
        )
        .await
        .unwrap();

        assert_eq!(reload(db, from.id).await.author_count, 0);
        let to = reload(db, to.id).await;
        assert_eq!(to.authors, "Nowak");
        assert_eq!(to.author_count, 1);
    }

    #[tokio::test]
    async fn test_alias_change_reaggregates() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let a = article(db, "Renamed").await;
        let nowak = author(db, "Nowak").await;
        save_authorship(db, AuthorshipForm::new(nowak.id, PublicationRef::Article(a.id)))
            .await
            .unwrap();

        save_author(
            db,
            AuthorForm {
                id: Some(nowak.id),
                alias: "Nowak A.".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(reload(db, a.id).await.authors, "Nowak A.");

        assert!(delete_author(db, nowak.id).await.unwrap());
        let a = reload(db, a.id).await;
        assert_eq!(a.authors, "");
        assert_eq!(a.author_count, 0);
    }

    #[tokio::test]
    async fn test_author_needs_identity() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let err = save_author(db, AuthorForm::default()).await.unwrap_err();
        assert_eq!(err.field(), Some("alias"));

        let err = save_author(
            db,
            AuthorForm {
                employee_id: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field(), Some("employee_id"));
    }

    #[tokio::test]
    async fn test_refresh_skips_missing_article() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        assert!(refresh_article_authors(db, 404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authorship_validation() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let a = article(db, "Checked").await;
        let nowak = author(db, "Nowak").await;

        let err = save_authorship(db, AuthorshipForm::new(nowak.id, PublicationRef::Article(999)))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("publication"));

        let err = save_authorship(
            db,
            AuthorshipForm {
                percentage: 150,
                ..AuthorshipForm::new(nowak.id, PublicationRef::Article(a.id))
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field(), Some("percentage"));
    }
}
