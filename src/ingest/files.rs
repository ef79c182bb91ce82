/// Local file ingestion
///
/// Paths arrive from the file dialog, a folder pick, or window drops.
/// Directories are expanded recursively. Files whose extension does not
/// map to an image media type are dropped with a log line and no error;
/// read failures are collected per file so one bad path never discards
/// the rest of the action.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures::future::join_all;
use walkdir::WalkDir;

use super::IngestReport;
use crate::state::data::ProcessedImage;

/// Load every image file reachable from `paths`.
/// All reads for the action are awaited together.
pub async fn load_paths(paths: Vec<PathBuf>) -> IngestReport {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(scan_folder(&path));
        } else {
            files.push(path);
        }
    }

    let candidates: Vec<(PathBuf, &'static str)> = files
        .into_iter()
        .filter_map(|path| match mime_for_extension(&path) {
            Some(mime) => Some((path, mime)),
            None => {
                log::info!("skipping non-image file {}", path.display());
                None
            }
        })
        .collect();

    let results = join_all(
        candidates
            .into_iter()
            .map(|(path, mime)| load_one(path, mime)),
    )
    .await;

    let mut report = IngestReport::default();
    for result in results {
        match result {
            Ok(image) => report.accepted.push(image),
            Err(name) => report.failed.push(name),
        }
    }
    report
}

/// Aggregate banner text for a pass with read failures
pub fn failure_banner(failed: &[String]) -> String {
    format!("Some files could not be read: {}.", failed.join(", "))
}

async fn load_one(path: PathBuf, extension_mime: &'static str) -> Result<ProcessedImage, String> {
    let name = display_name(&path);

    let bytes = tokio::fs::read(&path).await.map_err(|error| {
        log::warn!("failed to read {}: {}", path.display(), error);
        name.clone()
    })?;

    // The extension can lie; trust the file signature when it is
    // recognizable. Unknown signatures (e.g. SVG) keep the extension's type.
    let mime = match infer::get(&bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => kind.mime_type(),
        Some(kind) => {
            log::warn!(
                "{} has an image extension but a {} signature",
                path.display(),
                kind.mime_type()
            );
            return Err(name);
        }
        None => extension_mime,
    };

    Ok(ProcessedImage::new(
        BASE64.encode(&bytes),
        mime.to_string(),
        name,
    ))
}

fn scan_folder(folder: &Path) -> Vec<PathBuf> {
    WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Media type implied by the file extension, or None for non-images
fn mime_for_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_string_lossy().to_lowercase();
    let mime = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}
