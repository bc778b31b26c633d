//! One-shot export job: render the composite at export resolution, encode it
//! as PNG, and write the file.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::compositor;
use crate::transform::Transform;

/// Fixed descriptive file name offered for every export.
pub const EXPORT_FILE_NAME: &str = "framed-photo.png";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no photo loaded")]
    NoSource,

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything an export task needs, captured at click time so later edits to
/// the live state cannot bleed into an in-flight export.
pub struct ExportRequest {
    pub source: Arc<RgbaImage>,
    pub overlay: Option<Arc<RgbaImage>>,
    pub transform: Transform,
    pub preview_size: u32,
    pub export_size: u32,
    pub destination: PathBuf,
}

/// Render, encode, and write. Returns the path actually written, which may
/// carry a timestamp suffix if the destination already existed.
pub async fn run(request: ExportRequest) -> Result<PathBuf, ExportError> {
    let png = compositor::export_composite(
        &request.source,
        request.overlay.as_deref(),
        &request.transform,
        request.preview_size,
        request.export_size,
    )?;

    let destination = unique_destination(request.destination);
    tokio::fs::write(&destination, &png)
        .await
        .map_err(|source| ExportError::Write {
            path: destination.clone(),
            source,
        })?;

    log::info!("exported {} ({} bytes)", destination.display(), png.len());
    Ok(destination)
}

/// If the destination exists, append a timestamp so earlier exports are never
/// overwritten silently.
fn unique_destination(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    timestamped_sibling(&path, &timestamp.to_string())
}

fn timestamped_sibling(path: &Path, timestamp: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "framed-photo".to_string());
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, timestamp, ext),
        None => format!("{}_{}", stem, timestamp),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_sibling_keeps_extension() {
        let out = timestamped_sibling(Path::new("/tmp/framed-photo.png"), "20260806_120000");
        assert_eq!(
            out,
            PathBuf::from("/tmp/framed-photo_20260806_120000.png")
        );
    }

    #[test]
    fn test_timestamped_sibling_without_extension() {
        let out = timestamped_sibling(Path::new("/tmp/framed-photo"), "20260806_120000");
        assert_eq!(out, PathBuf::from("/tmp/framed-photo_20260806_120000"));
    }

    #[test]
    fn test_unique_destination_passes_through_fresh_paths() {
        let path = PathBuf::from("/definitely/not/a/real/dir/framed-photo.png");
        assert_eq!(unique_destination(path.clone()), path);
    }
}
