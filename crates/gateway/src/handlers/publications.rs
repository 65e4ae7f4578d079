//! Publisher, journal, article and authorship handlers
//!
//! Saves go through the scoring and authorship services, so journal edits
//! re-score unlocked articles and authorship edits refresh the article's
//! author summary before the response is written.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::deleted;
use crate::AppState;
use attainments_common::{
    auth::AuthContext,
    db::models::*,
    db::{AuthorSummary, JournalSummary},
    errors::Result,
    services::authorship::{self, AuthorForm, AuthorshipForm, ContributionStatusForm},
    services::scoring::{self, ArticleForm, JournalForm, PublisherForm},
};

// ============================================================================
// Publishers
// ============================================================================

pub async fn list_publishers(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Publisher>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<PublisherEntity>().await?))
}

pub async fn create_publisher(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<PublisherForm>,
) -> Result<(StatusCode, Json<Publisher>)> {
    auth.require_staff()?;
    form.id = None;
    let publisher = scoring::save_publisher(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(publisher)))
}

pub async fn update_publisher(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<PublisherForm>,
) -> Result<Json<Publisher>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(scoring::save_publisher(state.db.write(), form).await?))
}

pub async fn delete_publisher(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(scoring::delete_publisher(state.db.write(), id).await?, "publisher", id)
}

// ============================================================================
// Journals
// ============================================================================

pub async fn list_journals(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<JournalSummary>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.journal_summaries().await?))
}

pub async fn create_journal(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<JournalForm>,
) -> Result<(StatusCode, Json<Journal>)> {
    auth.require_staff()?;
    form.id = None;
    let journal = scoring::save_journal(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(journal)))
}

pub async fn update_journal(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<JournalForm>,
) -> Result<Json<Journal>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(scoring::save_journal(state.db.write(), form).await?))
}

pub async fn delete_journal(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(scoring::delete_journal(state.db.write(), id).await?, "journal", id)
}

// ============================================================================
// Articles
// ============================================================================

pub async fn list_articles(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Article>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<ArticleEntity>().await?))
}

pub async fn create_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<ArticleForm>,
) -> Result<(StatusCode, Json<Article>)> {
    auth.require_staff()?;
    form.id = None;
    let article = scoring::save_article(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<ArticleForm>,
) -> Result<Json<Article>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(scoring::save_article(state.db.write(), form).await?))
}

pub async fn delete_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(scoring::delete_article(state.db.write(), id).await?, "article", id)
}

/// The article's authorship rows in author-list order
pub async fn article_authorships(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Authorship>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.article_authorships(id).await?))
}

// ============================================================================
// Authors
// ============================================================================

pub async fn list_authors(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<AuthorSummary>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.author_summaries().await?))
}

pub async fn create_author(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<AuthorForm>,
) -> Result<(StatusCode, Json<Author>)> {
    auth.require_staff()?;
    form.id = None;
    let author = authorship::save_author(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

pub async fn update_author(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<AuthorForm>,
) -> Result<Json<Author>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(authorship::save_author(state.db.write(), form).await?))
}

pub async fn delete_author(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(authorship::delete_author(state.db.write(), id).await?, "author", id)
}

// ============================================================================
// Contribution statuses
// ============================================================================

pub async fn list_contribution_statuses(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<ContributionStatus>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<ContributionStatusEntity>().await?))
}

pub async fn create_contribution_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<ContributionStatusForm>,
) -> Result<(StatusCode, Json<ContributionStatus>)> {
    auth.require_staff()?;
    form.id = None;
    let status = authorship::save_contribution_status(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(status)))
}

pub async fn update_contribution_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<ContributionStatusForm>,
) -> Result<Json<ContributionStatus>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(authorship::save_contribution_status(state.db.write(), form).await?))
}

pub async fn delete_contribution_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    let removed = authorship::delete_contribution_status(state.db.write(), id).await?;
    deleted(removed, "contribution status", id)
}

// ============================================================================
// Authorships
// ============================================================================

pub async fn list_authorships(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Authorship>>> {
    auth.require_staff()?;
    Ok(Json(state.repo.list::<AuthorshipEntity>().await?))
}

pub async fn create_authorship(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(mut form): Json<AuthorshipForm>,
) -> Result<(StatusCode, Json<Authorship>)> {
    auth.require_staff()?;
    form.id = None;
    let row = authorship::save_authorship(state.db.write(), form).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_authorship(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
    Json(mut form): Json<AuthorshipForm>,
) -> Result<Json<Authorship>> {
    auth.require_staff()?;
    form.id = Some(id);
    Ok(Json(authorship::save_authorship(state.db.write(), form).await?))
}

pub async fn delete_authorship(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    auth.require_staff()?;
    deleted(authorship::delete_authorship(state.db.write(), id).await?, "authorship", id)
}
