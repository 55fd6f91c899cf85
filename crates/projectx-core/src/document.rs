use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback shown when a document has no usable file name.
pub const UNTITLED: &str = "Untitled";

/// Suffix appended to a document name to title its extracted-text view.
pub const DEFAULT_TITLE_SUFFIX: &str = " - Parsed Text";

/// An imported PDF tracked by the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    pub created_at: DateTime<Utc>,
    pub pdf_path: Option<PathBuf>,
}

impl Document {
    pub fn new(pdf_path: Option<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            pdf_path,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// File name without its extension(s), e.g. `report` for `report.v2.pdf`.
    pub fn display_name(&self) -> Option<String> {
        self.pdf_path.as_deref().and_then(display_name_of)
    }

    /// Title for the extracted-text view of this document.
    pub fn text_title(&self, suffix: &str) -> String {
        format!(
            "{}{}",
            self.display_name().as_deref().unwrap_or(UNTITLED),
            suffix
        )
    }
}

/// File name of `path` up to its first `.`, ignoring leading dots.
pub fn display_name_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let stem = name
        .split('.')
        .find(|part| !part.is_empty())
        .unwrap_or(&*name);
    Some(stem.to_string())
}
