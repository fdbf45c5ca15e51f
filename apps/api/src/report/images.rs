//! Upload intake — validates that each uploaded file is a decodable image
//! before it is forwarded to the vision API.
//!
//! EXIF orientation is intentionally not touched here; the vision model sees
//! the bytes as uploaded.

use bytes::Bytes;
use image::ImageFormat;

use crate::errors::AppError;
use crate::llm_client::ImageAttachment;

/// A validated jewelry photo ready to attach to a vision request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub media_type: String,
    pub data: Bytes,
}

impl UploadedImage {
    /// Validates `data` as an image the vision API accepts. Fails with
    /// `UnsupportedImage` when the bytes are not decodable, the format is
    /// not one the API supports, or the file exceeds `max_bytes`.
    pub fn from_bytes(filename: &str, data: Bytes, max_bytes: usize) -> Result<Self, AppError> {
        if data.is_empty() {
            return Err(AppError::UnsupportedImage(format!(
                "'{filename}' is empty"
            )));
        }
        if data.len() > max_bytes {
            return Err(AppError::UnsupportedImage(format!(
                "'{filename}' is {} bytes, above the {max_bytes} byte limit",
                data.len()
            )));
        }

        let format = image::guess_format(&data).map_err(|_| {
            AppError::UnsupportedImage(format!("'{filename}' is not a recognized image format"))
        })?;
        let media_type = media_type_for(format).ok_or_else(|| {
            AppError::UnsupportedImage(format!(
                "'{filename}' is {format:?}, which the vision API does not accept"
            ))
        })?;

        // Full decode catches truncated or corrupt files that still carry a
        // valid magic number.
        image::load_from_memory(&data).map_err(|e| {
            AppError::UnsupportedImage(format!("'{filename}' could not be decoded: {e}"))
        })?;

        Ok(Self {
            filename: filename.to_string(),
            media_type: media_type.to_string(),
            data,
        })
    }

    pub fn to_attachment(&self) -> ImageAttachment {
        ImageAttachment {
            media_type: self.media_type.clone(),
            data: self.data.to_vec(),
        }
    }

    /// Filename without its extension, used for the download filename
    /// convention `<stem>_jewelry_report.txt`.
    pub fn stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or(&self.filename)
    }
}

/// Formats the Anthropic vision API accepts.
fn media_type_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::io::Cursor;

    const MAX_BYTES: usize = 5 * 1024 * 1024;

    fn png_bytes() -> Bytes {
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        Bytes::from(buffer.into_inner())
    }

    #[test]
    fn test_valid_png_is_accepted() {
        let upload = UploadedImage::from_bytes("ring.png", png_bytes(), MAX_BYTES).unwrap();
        assert_eq!(upload.media_type, "image/png");
        assert_eq!(upload.filename, "ring.png");
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let err = UploadedImage::from_bytes("ring.png", Bytes::new(), MAX_BYTES).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedImage(_)));
    }

    #[test]
    fn test_non_image_bytes_are_rejected() {
        let err = UploadedImage::from_bytes(
            "notes.txt",
            Bytes::from_static(b"just some text"),
            MAX_BYTES,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedImage(_)));
    }

    #[test]
    fn test_truncated_png_is_rejected() {
        let full = png_bytes();
        let truncated = full.slice(..16); // magic number survives, body does not
        let err = UploadedImage::from_bytes("ring.png", truncated, MAX_BYTES).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedImage(_)));
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let err = UploadedImage::from_bytes("ring.png", png_bytes(), 8).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedImage(_)));
    }

    #[test]
    fn test_stem_strips_extension() {
        let upload = UploadedImage::from_bytes("gold_brooch.png", png_bytes(), MAX_BYTES).unwrap();
        assert_eq!(upload.stem(), "gold_brooch");
    }

    #[test]
    fn test_stem_without_extension_is_full_name() {
        let mut upload = UploadedImage::from_bytes("ring.png", png_bytes(), MAX_BYTES).unwrap();
        upload.filename = "ring".to_string();
        assert_eq!(upload.stem(), "ring");
    }
}
