use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use projectx_core::config_file::{self, ConfigFile, DisplayConfig, StorageConfig};
use projectx_core::{DocumentLibrary, SessionManager, UNTITLED, display_name_of, read_pdf};
use projectx_pdf_mupdf::MupdfBackend;

mod output;

use output::{ColorMode, TerminalPresenter};

/// ProjectX - Keep a library of PDFs and read out their text
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding imported PDFs (overrides PROJECTX_LIBRARY_DIR and config)
    #[arg(long, global = true)]
    library_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy a PDF into the library
    Import {
        /// Path to the PDF to import
        file_path: PathBuf,
    },

    /// List imported documents
    List,

    /// Extract and show the text of an imported document
    Read {
        /// Document id, or its position in `list`
        document: String,
    },

    /// Extract and show the text of any PDF without importing it
    Extract {
        /// Path to the PDF
        file_path: PathBuf,
    },

    /// Delete documents and their stored PDFs
    Delete {
        /// Document ids or positions in `list`
        #[arg(required = true)]
        documents: Vec<String>,
    },

    /// Delete every document
    Clear,

    /// Save settings to the platform config file
    Config {
        /// Library directory to use by default
        #[arg(long)]
        set_library_dir: Option<PathBuf>,

        /// Disable colored output by default
        #[arg(long)]
        set_no_color: Option<bool>,

        /// Suffix appended to document names in view titles
        #[arg(long)]
        set_title_suffix: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let config = config_file::load_config();
    let library_dir = || {
        cli.library_dir
            .clone()
            .or_else(|| std::env::var("PROJECTX_LIBRARY_DIR").ok().map(PathBuf::from))
            .or_else(|| config.library_dir())
            .context("Could not determine a library directory; pass --library-dir")
    };
    let color =
        ColorMode(!cli.no_color && !config.no_color() && std::io::stdout().is_terminal());

    match cli.command {
        Command::Import { file_path } => import(&library_dir()?, &file_path),
        Command::List => list(&library_dir()?, color),
        Command::Read { document } => read(&library_dir()?, &document, &config, color),
        Command::Extract { file_path } => extract(&file_path, &config, color),
        Command::Delete { documents } => delete(&library_dir()?, &documents),
        Command::Clear => clear(&library_dir()?),
        Command::Config {
            set_library_dir,
            set_no_color,
            set_title_suffix,
        } => {
            let path =
                config_file::config_path().context("Could not determine config directory")?;
            configure(
                &path,
                config_update(set_library_dir, set_no_color, set_title_suffix),
            )
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_library(dir: &Path) -> anyhow::Result<DocumentLibrary> {
    DocumentLibrary::open(dir)
        .with_context(|| format!("Failed to open library at {}", dir.display()))
}

fn import(library_dir: &Path, file_path: &Path) -> anyhow::Result<()> {
    let mut library = open_library(library_dir)?;
    let document = library
        .import(file_path)
        .with_context(|| format!("Failed to import {}", file_path.display()))?;
    println!(
        "Imported {} ({})",
        document.display_name().as_deref().unwrap_or(UNTITLED),
        document.id()
    );
    Ok(())
}

fn list(library_dir: &Path, color: ColorMode) -> anyhow::Result<()> {
    let library = open_library(library_dir)?;
    let mut stdout = std::io::stdout().lock();
    output::print_documents(&mut stdout, library.documents(), color)?;
    Ok(())
}

fn read(
    library_dir: &Path,
    selector: &str,
    config: &ConfigFile,
    color: ColorMode,
) -> anyhow::Result<()> {
    let library = open_library(library_dir)?;
    let document = library.find(selector)?;
    let name = document
        .display_name()
        .unwrap_or_else(|| UNTITLED.to_string());

    let path = match &document.pdf_path {
        Some(path) if path.exists() => path,
        _ => anyhow::bail!("No PDF available for {name}"),
    };

    present(path, &document.text_title(config.title_suffix()), color)
        .with_context(|| format!("Failed to read PDF {name}"))
}

fn extract(file_path: &Path, config: &ConfigFile, color: ColorMode) -> anyhow::Result<()> {
    let name = display_name_of(file_path).unwrap_or_else(|| UNTITLED.to_string());
    let title = format!("{name}{}", config.title_suffix());
    present(file_path, &title, color)
        .with_context(|| format!("Failed to read PDF {}", file_path.display()))
}

/// Extract `path` and show it as a session that closes once written.
fn present(path: &Path, title: &str, color: ColorMode) -> anyhow::Result<()> {
    let backend = MupdfBackend::new();
    let mut sessions = SessionManager::new(TerminalPresenter::new(std::io::stdout(), color));

    let handle = read_pdf(path, title, &backend, &mut sessions)?;
    sessions.notify_closed(handle);
    Ok(())
}

fn delete(library_dir: &Path, selectors: &[String]) -> anyhow::Result<()> {
    let mut library = open_library(library_dir)?;

    // Resolve every selector before removing anything; positions shift on removal.
    let ids = selectors
        .iter()
        .map(|s| library.find(s).map(|d| d.id()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut stdout = std::io::stdout().lock();
    for id in ids {
        // The same document may have been named twice.
        if library.get(id).is_none() {
            continue;
        }
        let removed = library.remove(id)?;
        writeln!(
            stdout,
            "Deleted {}",
            removed.display_name().as_deref().unwrap_or(UNTITLED)
        )?;
    }
    Ok(())
}

fn clear(library_dir: &Path) -> anyhow::Result<()> {
    let mut library = open_library(library_dir)?;
    let removed = library.clear()?;
    println!("Deleted {removed} document(s)");
    Ok(())
}

fn config_update(
    library_dir: Option<PathBuf>,
    no_color: Option<bool>,
    title_suffix: Option<String>,
) -> ConfigFile {
    ConfigFile {
        storage: Some(StorageConfig {
            library_dir: library_dir.map(|p| p.display().to_string()),
        }),
        display: Some(DisplayConfig {
            no_color,
            title_suffix,
        }),
    }
}

fn configure(path: &Path, update: ConfigFile) -> anyhow::Result<()> {
    let saved = config_file::update_at_path(path, update)
        .with_context(|| format!("Failed to save config to {}", path.display()))?;
    println!("Saved {}", path.display());
    if let Some(dir) = saved.library_dir() {
        println!("  library_dir  = {}", dir.display());
    }
    println!("  no_color     = {}", saved.no_color());
    println!("  title_suffix = {:?}", saved.title_suffix());
    Ok(())
}
