//! In-memory PDF backend for testing.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{BackendError, PdfBackend, PdfPages};

/// A configurable page for [`MockBackend`].
#[derive(Clone, Debug)]
pub enum MockPage {
    /// A page carrying the given text.
    Text(String),
    /// A page that loads but has no text layer.
    Image,
    /// A page that fails to load.
    Broken,
}

impl MockPage {
    pub fn text(text: impl Into<String>) -> Self {
        MockPage::Text(text.into())
    }
}

#[derive(Clone, Debug)]
enum Behavior {
    Pages(Vec<MockPage>),
    OpenFails(String),
    CountFails,
}

/// A hand-rolled mock implementing [`PdfBackend`] for tests.
///
/// Every path opens to the same configured document. Page loads are counted
/// via [`pages_requested()`](MockBackend::pages_requested).
pub struct MockBackend {
    behavior: Behavior,
    pages_requested: Arc<AtomicUsize>,
}

impl MockBackend {
    /// A backend whose documents consist of `pages`.
    pub fn with_pages(pages: Vec<MockPage>) -> Self {
        Self::from_behavior(Behavior::Pages(pages))
    }

    /// A backend that refuses to open anything.
    pub fn unopenable(message: impl Into<String>) -> Self {
        Self::from_behavior(Behavior::OpenFails(message.into()))
    }

    /// A backend whose documents open but cannot report a page count.
    pub fn without_page_count() -> Self {
        Self::from_behavior(Behavior::CountFails)
    }

    fn from_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            pages_requested: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many times `page_text()` has been called across all opened documents.
    pub fn pages_requested(&self) -> usize {
        self.pages_requested.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockBackend {
    fn open(&self, _path: &Path) -> Result<Box<dyn PdfPages>, BackendError> {
        match &self.behavior {
            Behavior::OpenFails(message) => Err(BackendError::OpenError(message.clone())),
            Behavior::CountFails => Ok(Box::new(MockDocument {
                pages: None,
                pages_requested: Arc::clone(&self.pages_requested),
            })),
            Behavior::Pages(pages) => Ok(Box::new(MockDocument {
                pages: Some(pages.clone()),
                pages_requested: Arc::clone(&self.pages_requested),
            })),
        }
    }
}

struct MockDocument {
    pages: Option<Vec<MockPage>>,
    pages_requested: Arc<AtomicUsize>,
}

impl PdfPages for MockDocument {
    fn page_count(&self) -> Result<usize, BackendError> {
        self.pages
            .as_ref()
            .map(Vec::len)
            .ok_or_else(|| BackendError::OpenError("page tree is unreadable".into()))
    }

    fn page_text(&self, index: usize) -> Result<Option<String>, BackendError> {
        self.pages_requested.fetch_add(1, Ordering::SeqCst);
        let page = self
            .pages
            .as_ref()
            .and_then(|pages| pages.get(index))
            .ok_or_else(|| BackendError::PageError {
                index,
                message: "page out of range".into(),
            })?;
        match page {
            MockPage::Text(text) => Ok(Some(text.clone())),
            MockPage::Image => Ok(None),
            MockPage::Broken => Err(BackendError::PageError {
                index,
                message: "corrupt page object".into(),
            }),
        }
    }
}
