use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to load page {index}: {message}")]
    PageError { index: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An opened PDF document, reduced to the two questions text extraction asks.
pub trait PdfPages {
    /// Number of pages in the document.
    fn page_count(&self) -> Result<usize, BackendError>;

    /// Machine-readable text of the page at `index` (0-based).
    ///
    /// `Ok(None)` means the page loaded but carries no text (e.g. a scanned
    /// image). `Err` means the page itself could not be loaded.
    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError>;
}

/// Trait for PDF parsing backends.
///
/// Implementors only open documents; the page walk and the text accumulation
/// rules live in [`crate::extract::extract_text`].
pub trait PdfBackend: Send + Sync {
    /// Open the PDF at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfPages>, BackendError>;
}
