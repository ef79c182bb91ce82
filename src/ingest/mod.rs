/// Image source adapter
///
/// Normalizes the two input origins (local files and remote URLs) into
/// queued ProcessedImage candidates. Sources inside one user action are
/// handled independently: failures are collected per source, successes are
/// never discarded because a sibling failed.

pub mod files;
pub mod urls;

use crate::state::data::ProcessedImage;

/// Result of one ingestion pass (one user action)
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Candidates ready to be appended to the batch, in source order
    pub accepted: Vec<ProcessedImage>,
    /// Display labels (filenames or URLs) of the sources that failed
    pub failed: Vec<String>,
}
