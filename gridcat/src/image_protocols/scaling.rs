// ABOUTME: Thumbnail encoder that decodes image files, bounds their size, and re-encodes as PNG
// ABOUTME: Implements gridcat-core's ImageEncoder on top of the image crate

use gridcat_core::{EncodedImage, GridError, ImageEncoder};
use image::{DynamicImage, ImageFormat, ImageReader, imageops::FilterType};
use std::io::Cursor;
use std::path::Path;

pub struct ThumbnailEncoder {
    max_px: u32,
    filter: FilterType,
}

impl ThumbnailEncoder {
    pub fn new(max_px: u32) -> Self {
        Self {
            max_px: max_px.max(1),
            filter: FilterType::Lanczos3,
        }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn max_px(&self) -> u32 {
        self.max_px
    }

    fn load(&self, path: &Path) -> Result<DynamicImage, GridError> {
        let reader = ImageReader::open(path)
            .map_err(|e| GridError::encoding(path, e))?
            .with_guessed_format()
            .map_err(|e| GridError::encoding(path, e))?;

        if reader.format().is_none() {
            return Err(GridError::encoding(path, "unrecognized image format"));
        }

        reader.decode().map_err(|e| GridError::encoding(path, e))
    }
}

impl ImageEncoder for ThumbnailEncoder {
    fn encode(&self, path: &Path) -> Result<EncodedImage, GridError> {
        let img = self.load(path)?;
        let (width, height) = (img.width(), img.height());

        let thumbnail = match target_dimensions(width, height, self.max_px) {
            Some((w, h)) => {
                log::debug!(
                    "Scaling {} from {}x{} to {}x{}",
                    path.display(),
                    width,
                    height,
                    w,
                    h
                );
                img.resize_exact(w, h, self.filter)
            }
            None => img,
        };

        // The PNG encoder has no float color types
        let thumbnail = match thumbnail {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                DynamicImage::ImageRgba8(thumbnail.to_rgba8())
            }
            other => other,
        };

        let mut payload = Vec::new();
        thumbnail
            .write_to(&mut Cursor::new(&mut payload), ImageFormat::Png)
            .map_err(|e| GridError::encoding(path, e))?;

        Ok(EncodedImage {
            width,
            height,
            payload,
        })
    }
}

/// Dimensions that fit within `max_px` on both edges while preserving aspect
/// ratio, or `None` when the image already fits.
pub fn target_dimensions(width: u32, height: u32, max_px: u32) -> Option<(u32, u32)> {
    if width <= max_px && height <= max_px {
        return None;
    }

    let ratio = (max_px as f64 / width as f64).min(max_px as f64 / height as f64);
    let target_width = ((width as f64 * ratio).round() as u32).clamp(1, max_px);
    let target_height = ((height as f64 * ratio).round() as u32).clamp(1, max_px);

    Some((target_width, target_height))
}
