//! Login and self-service account handlers

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use attainments_common::{
    auth::AuthContext,
    db::models::User,
    errors::Result,
    services::accounts::{self, PasswordChange, ProfileForm},
};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    pub filename: String,
}

/// Exchange username and password for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    request.validate()?;

    let user = accounts::authenticate(state.db.read(), &request.username, &request.password).await?;
    let access_token = state.jwt.generate_token(&user)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_at: Utc::now() + Duration::seconds(state.jwt.expiration_secs()),
        user,
    }))
}

pub async fn me(State(state): State<AppState>, auth: AuthContext) -> Result<Json<User>> {
    Ok(Json(state.repo.find_user(auth.user_id).await?))
}

pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(form): Json<ProfileForm>,
) -> Result<Json<User>> {
    let user = accounts::update_profile(state.db.write(), auth.user_id, form).await?;
    Ok(Json(user))
}

pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(change): Json<PasswordChange>,
) -> Result<StatusCode> {
    accounts::change_password(state.db.write(), auth.user_id, change).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the caller's photo with the raw image in the request body
pub async fn upload_photo(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<PhotoQuery>,
    body: Bytes,
) -> Result<Json<User>> {
    let user = accounts::set_photo(
        state.db.write(),
        &state.media,
        auth.user_id,
        &query.filename,
        &body,
    )
    .await?;
    Ok(Json(user))
}

pub async fn remove_photo(State(state): State<AppState>, auth: AuthContext) -> Result<Json<User>> {
    let user = accounts::clear_photo(state.db.write(), &state.media, auth.user_id).await?;
    Ok(Json(user))
}
