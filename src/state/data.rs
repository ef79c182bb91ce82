/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the ingestion layer, the store and the UI layer.

use std::fmt;

/// Represents a single image in the batch
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    /// Unique id, assigned at ingestion time
    pub id: String,
    /// Image bytes, base64-encoded for embedding in request payloads
    pub base64: String,
    /// Media type (e.g. "image/jpeg")
    pub mime_type: String,
    /// Display name: original filename, or derived from the source URL
    pub name: String,
    /// Lifecycle state of this image's naming request
    pub status: ImageStatus,
}

impl ProcessedImage {
    /// Create a freshly ingested image, ready to be queued
    pub fn new(base64: String, mime_type: String, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            base64,
            mime_type,
            name,
            status: ImageStatus::Queued,
        }
    }

    /// The generated name, if this item has completed
    pub fn suggested_name(&self) -> Option<&str> {
        match &self.status {
            ImageStatus::Completed { suggested_name } => Some(suggested_name),
            _ => None,
        }
    }
}

/// Lifecycle state of one image's naming request
///
/// Transitions only move forward: Queued → Generating → Completed | Error.
/// The terminal payloads live on the variants, so an item can never hold
/// both a suggested name and an error message.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageStatus {
    Queued,
    Generating,
    Completed { suggested_name: String },
    Error { message: String },
}

/// Naming style applied to the next generation pass
///
/// Global to the batch, not per-image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    Artistic,
    Descriptive,
    ModernEdgy,
}

impl NameStyle {
    /// All styles, in the order the selector shows them
    pub const ALL: [NameStyle; 3] = [
        NameStyle::Artistic,
        NameStyle::Descriptive,
        NameStyle::ModernEdgy,
    ];
}

impl fmt::Display for NameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NameStyle::Artistic => "Artistic",
            NameStyle::Descriptive => "Descriptive",
            NameStyle::ModernEdgy => "Modern & Edgy",
        };
        write!(f, "{}", label)
    }
}
