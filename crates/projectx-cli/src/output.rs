use std::io::Write;

use owo_colors::OwoColorize;
use projectx_core::{Document, Presenter, SessionHandle, UNTITLED};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the library listing, one numbered line per document.
pub fn print_documents(
    w: &mut dyn Write,
    documents: &[Document],
    color: ColorMode,
) -> std::io::Result<()> {
    if documents.is_empty() {
        writeln!(w, "No documents. Add one with: projectx import <FILE>")?;
        return Ok(());
    }

    for (i, doc) in documents.iter().enumerate() {
        let name = doc.display_name().unwrap_or_else(|| UNTITLED.to_string());
        let created = doc
            .created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S");
        let missing = doc.pdf_path.as_ref().is_none_or(|p| !p.exists());

        if color.enabled() {
            write!(w, "{:>3}. {}  {}", i + 1, name.bold(), created.dimmed())?;
            if missing {
                write!(w, "  {}", "(no PDF available)".yellow())?;
            }
            writeln!(w, "  {}", doc.id().dimmed())?;
        } else {
            write!(w, "{:>3}. {}  {}", i + 1, name, created)?;
            if missing {
                write!(w, "  (no PDF available)")?;
            }
            writeln!(w, "  {}", doc.id())?;
        }
    }
    Ok(())
}

/// Writes each session as a titled block of text.
///
/// A terminal cannot keep a view open once it has been written, so callers
/// report the session closed as soon as `show` returns.
pub struct TerminalPresenter<W: Write> {
    writer: W,
    color: ColorMode,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(writer: W, color: ColorMode) -> Self {
        Self { writer, color }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show(&mut self, _handle: SessionHandle, title: &str, content: &str) -> std::io::Result<()> {
        let rule = "─".repeat(title.chars().count().clamp(16, 80));
        if self.color.enabled() {
            writeln!(self.writer, "{}", title.bold())?;
            writeln!(self.writer, "{}", rule.dimmed())?;
        } else {
            writeln!(self.writer, "{title}")?;
            writeln!(self.writer, "{rule}")?;
        }
        self.writer.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            writeln!(self.writer)?;
        }
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projectx_core::SessionManager;

    #[test]
    fn presenter_writes_title_rule_and_text() {
        let presenter = TerminalPresenter::new(Vec::new(), ColorMode(false));
        let mut sessions = SessionManager::new(presenter);
        let handle = sessions.open("A\nB\n", "doc - Parsed Text").unwrap();
        assert!(sessions.notify_closed(handle));

        let out = String::from_utf8(sessions.presenter().writer.clone()).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("doc - Parsed Text"));
        assert!(lines.next().unwrap().starts_with('─'));
        assert_eq!(lines.collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn empty_library_listing_has_hint() {
        let mut out = Vec::new();
        print_documents(&mut out, &[], ColorMode(false)).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("projectx import"));
    }

    #[test]
    fn listing_marks_missing_files() {
        let doc = Document::new(Some("/definitely/not/here/paper.pdf".into()));
        let mut out = Vec::new();
        print_documents(&mut out, std::slice::from_ref(&doc), ColorMode(false)).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("  1. paper  "), "{out}");
        assert!(out.contains("(no PDF available)"));
        assert!(out.contains(&doc.id().to_string()));
    }
}
