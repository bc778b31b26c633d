//! Photo and overlay loading: declared-type validation, byte decode, and the
//! async one-shot jobs the app spawns for each request.

use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Declared content types accepted for upload.
pub const ACCEPTED_MIME_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unsupported file type '{0}' — use JPG, PNG, GIF or WebP")]
    UnsupportedType(String),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels")]
    EmptyImage,
}

/// A decoded upload, ready for compositing. The bitmap is shared with export
/// jobs, so it lives behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LoadedPhoto {
    pub image: Arc<RgbaImage>,
    pub file_name: String,
}

impl LoadedPhoto {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

pub fn is_accepted_mime(mime: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime)
}

/// The content type a path declares through its extension.
pub fn declared_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Validate a declared content type before any decode is attempted.
pub fn validate_mime(mime: &str) -> Result<(), LoadError> {
    if is_accepted_mime(mime) {
        Ok(())
    } else {
        Err(LoadError::UnsupportedType(mime.to_string()))
    }
}

/// Decode raw upload bytes into an RGBA photo. Rejects degenerate bitmaps so
/// the compositor never divides by a zero height.
pub fn decode_photo(file_name: &str, bytes: &[u8]) -> Result<LoadedPhoto, LoadError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(LoadError::EmptyImage);
    }
    Ok(LoadedPhoto {
        image: Arc::new(decoded),
        file_name: file_name.to_string(),
    })
}

/// One-shot decode job for an uploaded photo. Validates the declared type,
/// reads the bytes off the UI thread, decodes, and returns exactly once.
pub async fn load_photo(path: std::path::PathBuf) -> Result<LoadedPhoto, LoadError> {
    let mime = declared_mime(&path).unwrap_or("application/octet-stream");
    validate_mime(mime)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo".to_string());

    let bytes = tokio::fs::read(&path).await?;
    log::info!("decoding {} ({} bytes)", file_name, bytes.len());
    decode_photo(&file_name, &bytes)
}

/// One-shot load of the decorative frame asset. Failure here is non-fatal:
/// the app keeps rendering without the overlay layer.
pub async fn load_overlay(path: std::path::PathBuf) -> Result<Arc<RgbaImage>, LoadError> {
    let bytes = tokio::fs::read(&path).await?;
    let decoded = image::load_from_memory(&bytes)?.to_rgba8();
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(LoadError::EmptyImage);
    }
    log::info!(
        "frame overlay loaded from {} ({}x{})",
        path.display(),
        decoded.width(),
        decoded.height()
    );
    Ok(Arc::new(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_declared_mime() {
        assert_eq!(declared_mime(Path::new("a.jpg")), Some("image/jpeg"));
        assert_eq!(declared_mime(Path::new("a.JPEG")), Some("image/jpeg"));
        assert_eq!(declared_mime(Path::new("a.png")), Some("image/png"));
        assert_eq!(declared_mime(Path::new("a.gif")), Some("image/gif"));
        assert_eq!(declared_mime(Path::new("a.webp")), Some("image/webp"));
        assert_eq!(declared_mime(Path::new("a.txt")), None);
        assert_eq!(declared_mime(Path::new("noext")), None);
    }

    #[test]
    fn test_plain_text_is_rejected_before_decode() {
        let err = validate_mime("text/plain").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedType(ref t) if t == "text/plain"));
    }

    #[test]
    fn test_accepted_mimes() {
        for mime in ACCEPTED_MIME_TYPES {
            assert!(is_accepted_mime(mime));
        }
        assert!(!is_accepted_mime("image/tiff"));
        assert!(!is_accepted_mime("application/pdf"));
    }

    #[test]
    fn test_decode_photo_roundtrip() {
        let photo = decode_photo("tiny.png", &png_bytes(5, 7)).unwrap();
        assert_eq!(photo.width(), 5);
        assert_eq!(photo.height(), 7);
        assert_eq!(photo.file_name, "tiny.png");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_photo("broken.png", b"definitely not an image").unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }
}
