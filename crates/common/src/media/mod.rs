//! Profile photo storage and processing
//!
//! Photos are stored under `<root>/accounts/photos/<uuid>.<ext>`, cropped to
//! the largest centred square and resized to the configured edge. Icons are
//! smaller copies under `<root>/accounts/icons/` in the photo's decoded format.
//! Paths handed out are relative to the media root.

use crate::config::MediaConfig;
use crate::errors::{AppError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use uuid::Uuid;

pub const PHOTO_DIR: &str = "accounts/photos";
pub const ICON_DIR: &str = "accounts/icons";

/// Largest centred square of a `width` x `height` image, as (x, y, edge)
pub fn square_crop(width: u32, height: u32) -> (u32, u32, u32) {
    if height > width {
        (0, (height - width) / 2, width)
    } else {
        ((width - height) / 2, 0, height)
    }
}

/// Crop to the centred square, then scale to `edge` x `edge`
pub fn square_thumbnail(image: &DynamicImage, edge: u32) -> DynamicImage {
    let (x, y, side) = square_crop(image.width(), image.height());
    image
        .crop_imm(x, y, side, side)
        .resize_exact(edge, edge, FilterType::Lanczos3)
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    photo_size: u32,
    icon_size: u32,
}

impl MediaStore {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.root.clone(),
            photo_size: config.photo_size,
            icon_size: config.icon_size,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a media-relative path
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write an uploaded photo under a fresh name, keeping the extension
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn store_photo(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| ImageFormat::from_extension(e).is_some())
            .ok_or_else(|| AppError::invalid("photo", "Upload a supported image file."))?;

        let relative = format!("{}/{}.{}", PHOTO_DIR, Uuid::new_v4(), extension);
        let path = self.path(&relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        debug!(photo = %relative, "Photo stored");
        Ok(relative)
    }

    /// Crop and resize a stored photo in place, in its own format
    pub async fn process_photo(&self, relative: &str) -> Result<()> {
        let path = self.path(relative);
        let edge = self.photo_size;

        blocking(move || {
            let (image, format) = open(&path)?;
            square_thumbnail(&image, edge).save_with_format(&path, format)?;
            Ok(())
        })
        .await?;

        crate::metrics::record_photo();
        Ok(())
    }

    /// Write an icon for a processed photo and return its relative path
    ///
    /// The icon's extension follows the decoded format, not the photo's name.
    pub async fn create_icon(&self, photo: &str) -> Result<String> {
        let photo_path = self.path(photo);
        let root = self.root.clone();
        let edge = self.icon_size;

        let relative = blocking(move || {
            let (image, format) = open(&photo_path)?;
            let extension = format.extensions_str().first().copied().unwrap_or("png");
            let relative = format!("{}/{}.{}", ICON_DIR, Uuid::new_v4(), extension);
            let icon_path = root.join(&relative);
            if let Some(parent) = icon_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            image
                .resize_exact(edge, edge, FilterType::Lanczos3)
                .save_with_format(&icon_path, format)?;
            Ok(relative)
        })
        .await?;

        debug!(icon = %relative, "Icon created");
        Ok(relative)
    }

    /// Delete a stored file; a file that is already gone is fine
    pub async fn remove(&self, relative: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path(relative)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn open(path: &Path) -> Result<(DynamicImage, ImageFormat)> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format().ok_or_else(|| AppError::Image {
        message: "Unrecognised image format".to_string(),
    })?;
    Ok((reader.decode()?, format))
}

async fn blocking<F, T>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Image task failed: {}", e),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |x, _| Rgb([(x % 255) as u8, 80, 160]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn store(root: &Path) -> MediaStore {
        MediaStore::new(&MediaConfig {
            root: root.to_path_buf(),
            photo_size: 16,
            icon_size: 4,
        })
    }

    #[test]
    fn test_square_crop_geometry() {
        assert_eq!(square_crop(100, 160), (0, 30, 100));
        assert_eq!(square_crop(160, 100), (30, 0, 100));
        assert_eq!(square_crop(50, 50), (0, 0, 50));
    }

    #[tokio::test]
    async fn test_photo_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let media = store(dir.path());

        let photo = media.store_photo("me.PNG", &png_bytes(60, 40)).await.unwrap();
        assert!(photo.starts_with(PHOTO_DIR));
        assert!(photo.ends_with(".png"));

        media.process_photo(&photo).await.unwrap();
        let processed = image::open(media.path(&photo)).unwrap();
        assert_eq!((processed.width(), processed.height()), (16, 16));

        let icon = media.create_icon(&photo).await.unwrap();
        assert!(icon.starts_with(ICON_DIR));
        let icon_image = image::open(media.path(&icon)).unwrap();
        assert_eq!((icon_image.width(), icon_image.height()), (4, 4));

        media.remove(&icon).await.unwrap();
        assert!(!media.path(&icon).exists());
        media.remove(&icon).await.unwrap();
    }

    #[tokio::test]
    async fn test_icon_extension_follows_decoded_format() {
        let dir = tempfile::tempdir().unwrap();
        let media = store(dir.path());

        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(30, 20, Rgb([200, 40, 40])))
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();

        let photo = media.store_photo("renamed.png", &jpeg).await.unwrap();
        media.process_photo(&photo).await.unwrap();

        let icon = media.create_icon(&photo).await.unwrap();
        assert!(icon.ends_with(".jpg"));
        let format = ImageReader::open(media.path(&icon))
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format();
        assert_eq!(format, Some(ImageFormat::Jpeg));
    }

    #[tokio::test]
    async fn test_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let media = store(dir.path());

        let err = media.store_photo("notes.txt", b"hello").await.unwrap_err();
        assert_eq!(err.field(), Some("photo"));
    }

    #[tokio::test]
    async fn test_undecodable_photo_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let media = store(dir.path());

        let photo = media.store_photo("broken.png", b"not an image").await.unwrap();
        let err = media.process_photo(&photo).await.unwrap_err();
        assert!(matches!(err, AppError::Image { .. }));
    }
}
