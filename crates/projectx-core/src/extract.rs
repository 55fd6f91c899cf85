use std::path::Path;

use thiserror::Error;

use crate::backend::PdfBackend;

/// Why text extraction failed.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file is missing, unreadable, or not a valid PDF.
    #[error("failed to load PDF document: {0}")]
    DocumentLoad(String),
    /// The PDF opened fine but no page yielded any text.
    #[error("no text found in PDF")]
    NoTextFound,
}

/// Fieldless mirror of [`ExtractionError`] for exhaustive matching at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DocumentLoad,
    NoTextFound,
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::DocumentLoad(_) => ErrorKind::DocumentLoad,
            ExtractionError::NoTextFound => ErrorKind::NoTextFound,
        }
    }
}

/// Extract the text of every page of the PDF at `path`.
///
/// Pages are visited in ascending order. Each page with text contributes that
/// text followed by a single `\n`. Pages that fail to load are skipped.
pub fn extract_text(path: &Path, backend: &dyn PdfBackend) -> Result<String, ExtractionError> {
    let document = backend
        .open(path)
        .map_err(|e| ExtractionError::DocumentLoad(e.to_string()))?;
    let page_count = document
        .page_count()
        .map_err(|e| ExtractionError::DocumentLoad(e.to_string()))?;

    let mut text = String::new();
    let mut skipped = 0usize;

    for index in 0..page_count {
        match document.page_text(index) {
            Ok(Some(page_text)) if !page_text.is_empty() => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Ok(_) => {}
            Err(e) => {
                skipped += 1;
                tracing::debug!(page = index, error = %e, "skipping page that failed to load");
            }
        }
    }

    tracing::debug!(
        path = %path.display(),
        pages = page_count,
        skipped,
        chars = text.len(),
        "extraction complete"
    );

    if text.is_empty() {
        return Err(ExtractionError::NoTextFound);
    }
    Ok(text)
}
