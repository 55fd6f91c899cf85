use std::path::Path;

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod document;
pub mod extract;
pub mod library;
pub mod mock;
pub mod session;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, PdfPages};
pub use document::{DEFAULT_TITLE_SUFFIX, Document, UNTITLED, display_name_of};
pub use extract::{ErrorKind, ExtractionError, extract_text};
pub use library::{DocumentLibrary, LibraryError};
pub use session::{Presenter, Session, SessionError, SessionHandle, SessionManager, SessionState};

#[derive(Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Extract the text of the PDF at `path` and present it under `title`.
///
/// Nothing is presented when extraction fails.
pub fn read_pdf<P: Presenter>(
    path: &Path,
    title: &str,
    backend: &dyn PdfBackend,
    sessions: &mut SessionManager<P>,
) -> Result<SessionHandle, ReadError> {
    let text = extract_text(path, backend)?;
    Ok(sessions.open(text, title)?)
}
