//! User accounts: creation, authentication, profile, password and photo

use crate::auth::{hash_password, verify_password};
use crate::db::models::*;
use crate::errors::{AppError, Result};
use crate::media::MediaStore;
use crate::services::{delete_row, fetch};
use crate::validation;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use validator::Validate;

/// A new account; the password arrives in plain text and is hashed here
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewUser {
    /// Explicit primary key, used by the bulk import
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(length(max = 150))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub is_staff: bool,

    #[serde(default)]
    pub is_superuser: bool,

    #[serde(default)]
    pub sex: Option<Sex>,
}

impl NewUser {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }
}

/// Self-service profile fields
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub sex: Option<Sex>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordChange {
    pub old_password: String,

    #[validate(length(min = 8, message = "The password must be at least 8 characters long."))]
    pub new_password: String,
}

#[instrument(skip(db, user), fields(username = %user.username))]
pub async fn create_user<C>(db: &C, user: NewUser) -> Result<User>
where
    C: ConnectionTrait + TransactionTrait,
{
    user.validate()?;
    let username = validation::required("username", &user.username)?;
    let email = validation::email(user.email)?;
    let password = hash_password(&user.password)?;

    let mut model = UserActiveModel {
        username: Set(username),
        password: Set(password),
        email: Set(email),
        first_name: Set(user.first_name.trim().to_string()),
        last_name: Set(user.last_name.trim().to_string()),
        is_staff: Set(user.is_staff),
        is_superuser: Set(user.is_superuser),
        is_active: Set(true),
        sex: Set(user.sex),
        photo: Set(None),
        icon: Set(None),
        date_joined: Set(chrono::Utc::now().into()),
        ..Default::default()
    };
    if let Some(id) = user.id {
        model.id = Set(id);
    }

    let user = model.insert(db).await?;

    info!(user_id = user.id, "User created");
    Ok(user)
}

/// Look up an active account by username and check its password
#[instrument(skip(db, password))]
pub async fn authenticate<C>(db: &C, username: &str, password: &str) -> Result<User>
where
    C: ConnectionTrait,
{
    let user = UserEntity::find()
        .filter(UserColumn::Username.eq(username))
        .filter(UserColumn::IsActive.eq(true))
        .one(db)
        .await?;

    match user {
        Some(user) if verify_password(password, &user.password) => Ok(user),
        _ => {
            warn!("Failed login attempt");
            Err(AppError::InvalidCredentials)
        }
    }
}

pub async fn update_profile<C>(db: &C, user_id: i32, form: ProfileForm) -> Result<User>
where
    C: ConnectionTrait + TransactionTrait,
{
    form.validate()?;
    let email = validation::email(form.email)?;

    let mut model: UserActiveModel = fetch::<UserEntity, _>(db, user_id, "user").await?.into();
    model.first_name = Set(form.first_name.trim().to_string());
    model.last_name = Set(form.last_name.trim().to_string());
    model.email = Set(email);
    model.sex = Set(form.sex);

    Ok(model.update(db).await?)
}

#[instrument(skip(db, change))]
pub async fn change_password<C>(db: &C, user_id: i32, change: PasswordChange) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let user = fetch::<UserEntity, _>(db, user_id, "user").await?;
    if !verify_password(&change.old_password, &user.password) {
        return Err(AppError::invalid("old_password", "The old password is incorrect."));
    }
    change.validate()?;

    let mut model: UserActiveModel = user.into();
    model.password = Set(hash_password(&change.new_password)?);
    model.update(db).await?;

    info!(user_id, "Password changed");
    Ok(())
}

/// Replace the user's photo with an uploaded image
///
/// The stored file is cropped and resized. The old photo and icon are
/// removed, so a fresh icon is always generated for the new photo.
#[instrument(skip(db, media, bytes), fields(size = bytes.len()))]
pub async fn set_photo<C>(
    db: &C,
    media: &MediaStore,
    user_id: i32,
    filename: &str,
    bytes: &[u8],
) -> Result<User>
where
    C: ConnectionTrait + TransactionTrait,
{
    let user = fetch::<UserEntity, _>(db, user_id, "user").await?;

    let photo = media.store_photo(filename, bytes).await?;
    if let Err(e) = media.process_photo(&photo).await {
        media.remove(&photo).await?;
        return Err(e);
    }

    for old in [&user.photo, &user.icon].into_iter().flatten() {
        media.remove(old).await?;
    }

    let mut model: UserActiveModel = user.into();
    model.photo = Set(Some(photo));
    model.icon = Set(None);
    let user = model.update(db).await?;

    sync_icon(db, media, user).await
}

/// Bring the icon in line with the photo
///
/// A photo without an icon gets one; an icon without a photo is deleted.
/// An existing icon is left alone.
pub async fn sync_icon<C>(db: &C, media: &MediaStore, user: User) -> Result<User>
where
    C: ConnectionTrait,
{
    match (&user.photo, &user.icon) {
        (Some(photo), None) => {
            let icon = media.create_icon(photo).await?;
            let mut model: UserActiveModel = user.into();
            model.icon = Set(Some(icon));
            Ok(model.update(db).await?)
        }
        (None, Some(icon)) => {
            media.remove(icon).await?;
            let mut model: UserActiveModel = user.into();
            model.icon = Set(None);
            Ok(model.update(db).await?)
        }
        _ => Ok(user),
    }
}

/// Remove the user's photo together with its icon
pub async fn clear_photo<C>(db: &C, media: &MediaStore, user_id: i32) -> Result<User>
where
    C: ConnectionTrait + TransactionTrait,
{
    let user = fetch::<UserEntity, _>(db, user_id, "user").await?;
    if let Some(ref photo) = user.photo {
        media.remove(photo).await?;
    }

    let mut model: UserActiveModel = user.into();
    model.photo = Set(None);
    let user = model.update(db).await?;

    sync_icon(db, media, user).await
}

pub async fn delete_user<C>(db: &C, media: &MediaStore, id: i32) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    if let Some(user) = UserEntity::find_by_id(id).one(db).await? {
        for file in [&user.photo, &user.icon].into_iter().flatten() {
            media.remove(file).await?;
        }
    }
    delete_row::<UserEntity, _>(db, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MediaConfig;
    use crate::db::DbPool;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([200, 120, 40]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    fn media(root: &std::path::Path) -> MediaStore {
        MediaStore::new(&MediaConfig {
            root: root.to_path_buf(),
            photo_size: 24,
            icon_size: 6,
        })
    }

    #[tokio::test]
    async fn test_create_and_authenticate() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let user = create_user(
            db,
            NewUser {
                first_name: "Anna".to_string(),
                last_name: "Nowak".to_string(),
                ..NewUser::new("anowak", "correct horse")
            },
        )
        .await
        .unwrap();
        assert_ne!(user.password, "correct horse");
        assert_eq!(user.short_name(), "Nowak A.");

        let found = authenticate(db, "anowak", "correct horse").await.unwrap();
        assert_eq!(found.id, user.id);

        let err = authenticate(db, "anowak", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        let err = authenticate(db, "nobody", "correct horse").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = create_user(db, NewUser::new("anowak", "other")).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_change_password() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();

        let user = create_user(db, NewUser::new("anowak", "correct horse")).await.unwrap();

        let err = change_password(
            db,
            user.id,
            PasswordChange {
                old_password: "nope".to_string(),
                new_password: "battery staple".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field(), Some("old_password"));

        let err = change_password(
            db,
            user.id,
            PasswordChange {
                old_password: "correct horse".to_string(),
                new_password: "short".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.field(), Some("new_password"));

        change_password(
            db,
            user.id,
            PasswordChange {
                old_password: "correct horse".to_string(),
                new_password: "battery staple".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(authenticate(db, "anowak", "battery staple").await.is_ok());
    }

    #[tokio::test]
    async fn test_photo_lifecycle() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();
        let dir = tempfile::tempdir().unwrap();
        let media = media(dir.path());

        let user = create_user(db, NewUser::new("anowak", "correct horse")).await.unwrap();

        let user = set_photo(db, &media, user.id, "portrait.jpg", &jpeg_bytes(30, 50))
            .await
            .unwrap();
        let photo = user.photo.clone().unwrap();
        let icon = user.icon.clone().unwrap();
        assert_eq!(image::open(media.path(&photo)).unwrap().width(), 24);
        assert_eq!(image::open(media.path(&icon)).unwrap().height(), 6);

        let user = set_photo(db, &media, user.id, "landscape.jpg", &jpeg_bytes(50, 30))
            .await
            .unwrap();
        assert!(!media.path(&photo).exists());
        assert!(!media.path(&icon).exists());
        let icon = user.icon.clone().unwrap();

        let user = clear_photo(db, &media, user.id).await.unwrap();
        assert_eq!(user.photo, None);
        assert_eq!(user.icon, None);
        assert!(!media.path(&icon).exists());
    }

    #[tokio::test]
    async fn test_existing_icon_is_kept() {
        let pool = DbPool::in_memory().await.unwrap();
        let db = pool.write();
        let dir = tempfile::tempdir().unwrap();
        let media = media(dir.path());

        let user = create_user(db, NewUser::new("anowak", "correct horse")).await.unwrap();
        let user = set_photo(db, &media, user.id, "me.jpg", &jpeg_bytes(40, 40))
            .await
            .unwrap();

        let again = sync_icon(db, &media, user.clone()).await.unwrap();
        assert_eq!(again.icon, user.icon);
    }
}
