use std::path::Path;

use mupdf::pdf::PdfDocument;
use mupdf::{TextPage, TextPageFlags};

use projectx_core::{BackendError, PdfBackend, PdfPages};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the rest of the workspace does not
/// transitively depend on it.
///
/// Files are opened strictly as PDF documents; other formats MuPDF can read
/// (EPUB, XPS, images) are rejected as load failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfPages>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            PdfDocument::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;
        tracing::debug!(path = %path.display(), "opened PDF");

        Ok(Box::new(MupdfPages { document }))
    }
}

struct MupdfPages {
    document: PdfDocument,
}

impl PdfPages for MupdfPages {
    fn page_count(&self) -> Result<usize, BackendError> {
        let count = self
            .document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        checked_page_count(count)
    }

    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError> {
        let page_error = |message: String| BackendError::PageError { index, message };

        let page_no = i32::try_from(index).map_err(|e| page_error(e.to_string()))?;
        let page = self
            .document
            .load_page(page_no)
            .map_err(|e| page_error(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| page_error(e.to_string()))?;

        let text = text_page_lines(&text_page).join("\n");
        Ok(if text.is_empty() { None } else { Some(text) })
    }
}

/// MuPDF reports counts as `i32`; a negative one means the page tree is unusable.
fn checked_page_count(count: i32) -> Result<usize, BackendError> {
    usize::try_from(count)
        .map_err(|_| BackendError::OpenError(format!("invalid page count {count}")))
}

/// Text lines of a page in block order. Unmappable glyphs become U+FFFD.
fn text_page_lines(text_page: &TextPage) -> Vec<String> {
    let mut lines = Vec::new();
    for block in text_page.blocks() {
        for line in block.lines() {
            lines.push(
                line.chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect(),
            );
        }
    }
    lines
}
