//! End-to-end tests for the import -> extract -> present flow, using the
//! in-memory backend so no real PDF parser is involved.

use std::path::Path;

use projectx_core::mock::{MockBackend, MockPage};
use projectx_core::{
    DEFAULT_TITLE_SUFFIX, DocumentLibrary, ErrorKind, Presenter, ReadError, SessionHandle,
    SessionManager, SessionState, read_pdf,
};

#[derive(Default)]
struct Screen {
    windows: Vec<(SessionHandle, String, String)>,
}

impl Presenter for Screen {
    fn show(&mut self, handle: SessionHandle, title: &str, content: &str) -> std::io::Result<()> {
        self.windows
            .push((handle, title.to_string(), content.to_string()));
        Ok(())
    }
}

#[test]
fn imported_document_is_presented_under_its_name() {
    let src = tempfile::tempdir().unwrap();
    let lib = tempfile::tempdir().unwrap();
    let source = src.path().join("Quarterly Report.pdf");
    std::fs::write(&source, b"%PDF-1.4").unwrap();

    let mut library = DocumentLibrary::open(lib.path()).unwrap();
    let document = library.import(&source).unwrap().clone();

    let backend = MockBackend::with_pages(vec![
        MockPage::text("A"),
        MockPage::text(""),
        MockPage::text("B"),
    ]);
    let mut sessions = SessionManager::new(Screen::default());
    let handle = read_pdf(
        document.pdf_path.as_deref().unwrap(),
        &document.text_title(DEFAULT_TITLE_SUFFIX),
        &backend,
        &mut sessions,
    )
    .unwrap();

    assert_eq!(sessions.state(handle), Some(SessionState::Visible));
    let session = sessions.get(handle).unwrap();
    assert_eq!(session.title, "Quarterly Report - Parsed Text");
    assert_eq!(session.content, "A\nB\n");

    assert!(sessions.notify_closed(handle));
    assert!(sessions.is_empty());
}

#[test]
fn failed_extraction_presents_nothing() {
    let backend = MockBackend::with_pages(vec![MockPage::Image]);
    let mut sessions = SessionManager::new(Screen::default());

    let err = read_pdf(Path::new("scan.pdf"), "scan", &backend, &mut sessions).unwrap_err();
    match err {
        ReadError::Extraction(e) => assert_eq!(e.kind(), ErrorKind::NoTextFound),
        other => panic!("unexpected error: {other}"),
    }
    assert!(sessions.is_empty());
    assert!(sessions.presenter().windows.is_empty());
}

#[test]
fn repeated_reads_open_independent_sessions() {
    let backend = MockBackend::with_pages(vec![MockPage::text("same")]);
    let mut sessions = SessionManager::new(Screen::default());

    let first = read_pdf(Path::new("a.pdf"), "a", &backend, &mut sessions).unwrap();
    let second = read_pdf(Path::new("a.pdf"), "a", &backend, &mut sessions).unwrap();
    assert_ne!(first, second);
    assert_eq!(sessions.len(), 2);

    assert!(sessions.notify_closed(first));
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions.state(second), Some(SessionState::Visible));
}
