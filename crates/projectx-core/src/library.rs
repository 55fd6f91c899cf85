//! Managed storage for imported PDFs.
//!
//! Imported files are copied into the library directory and tracked in a
//! JSON index (`library.json`) next to them.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::document::Document;

const INDEX_FILE: &str = "library.json";

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("selected file is not a PDF: {}", .0.display())]
    NotAPdf(PathBuf),
    #[error("no document matches {0:?}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt library index: {0}")]
    Index(#[from] serde_json::Error),
    #[error("failed to move file into library: {0}")]
    Persist(#[from] tempfile::PersistError),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LibraryIndex {
    documents: Vec<Document>,
}

/// The set of imported documents and the directory holding their PDFs.
#[derive(Debug)]
pub struct DocumentLibrary {
    dir: PathBuf,
    documents: Vec<Document>,
}

impl DocumentLibrary {
    /// Open (creating if needed) the library rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let index_path = dir.join(INDEX_FILE);
        let index = match fs::read_to_string(&index_path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LibraryIndex::default(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(dir = %dir.display(), documents = index.documents.len(), "opened library");

        Ok(Self {
            dir,
            documents: index.documents,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Documents in import order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, id: Uuid) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    /// Look up a document by UUID or by 1-based position in [`documents()`](Self::documents).
    pub fn find(&self, selector: &str) -> Result<&Document, LibraryError> {
        let selector = selector.trim();
        let found = if let Ok(id) = Uuid::parse_str(selector) {
            self.get(id)
        } else if let Ok(position) = selector.parse::<usize>() {
            position
                .checked_sub(1)
                .and_then(|index| self.documents.get(index))
        } else {
            None
        };
        found.ok_or_else(|| LibraryError::NotFound(selector.to_string()))
    }

    /// Copy `source` into the library and record it.
    ///
    /// A file already stored under the same name is replaced, and records
    /// pointing at it are dropped.
    pub fn import(&mut self, source: &Path) -> Result<&Document, LibraryError> {
        if !has_pdf_extension(source) {
            return Err(LibraryError::NotAPdf(source.to_path_buf()));
        }
        let file_name = source
            .file_name()
            .ok_or_else(|| LibraryError::NotAPdf(source.to_path_buf()))?;
        let destination = self.dir.join(file_name);

        if is_same_file(source, &destination) {
            tracing::debug!(path = %destination.display(), "source already in library");
        } else {
            // Stage the copy so a failed read leaves any stored file untouched.
            let mut staged = tempfile::NamedTempFile::new_in(&self.dir)?;
            io::copy(&mut fs::File::open(source)?, &mut staged)?;
            let replacing = destination.exists();
            staged.persist(&destination)?;
            if replacing {
                tracing::info!(path = %destination.display(), "replaced existing PDF");
            }
        }

        let mut documents = self.documents.clone();
        documents.retain(|d| d.pdf_path.as_deref() != Some(destination.as_path()));
        documents.push(Document::new(Some(destination)));
        self.write_index(&documents)?;
        self.documents = documents;

        let document = &self.documents[self.documents.len() - 1];
        tracing::info!(id = %document.id(), path = ?document.pdf_path, "imported document");
        Ok(document)
    }

    /// Delete the document record and, best-effort, its stored PDF.
    pub fn remove(&mut self, id: Uuid) -> Result<Document, LibraryError> {
        let position = self
            .documents
            .iter()
            .position(|d| d.id() == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;
        let document = self.documents.remove(position);

        if let Some(path) = &document.pdf_path {
            match fs::remove_file(path) {
                Ok(()) => tracing::info!(path = %path.display(), "deleted PDF file"),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to delete PDF file")
                }
            }
        }

        self.save()?;
        Ok(document)
    }

    /// Remove every document. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize, LibraryError> {
        let ids: Vec<Uuid> = self.documents.iter().map(Document::id).collect();
        for id in &ids {
            self.remove(*id)?;
        }
        Ok(ids.len())
    }

    fn save(&self) -> Result<(), LibraryError> {
        self.write_index(&self.documents)
    }

    fn write_index(&self, documents: &[Document]) -> Result<(), LibraryError> {
        let index = LibraryIndex {
            documents: documents.to_vec(),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, &index)?;
        tmp.write_all(b"\n")?;
        tmp.persist(self.dir.join(INDEX_FILE))?;
        Ok(())
    }
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
