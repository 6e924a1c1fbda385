//! Renderers and the fan-out orchestrator.
//!
//! Every output format implements [`Renderer`]: it is fed the canonical
//! [`Event`] stream one event at a time and produces its bytes at the end.
//! [`fan_out`] drives any number of renderers from a single pass over the
//! stream, and [`export_book`] persists each renderer's output to disk.
//!
//! # Architecture
//!
//! Renderers use a builder pattern:
//! - `new()` creates a renderer with default configuration
//! - `with_config()` allows customization
//! - `handle()` consumes one event and never fails
//! - `result()` returns the rendered bytes and may be called more than once
//!
//! # Example
//!
//! ```
//! use docstream::export::{MarkdownRenderer, Renderer, fan_out};
//! use docstream::model::{Book, Paragraph, Run, TextStyle};
//!
//! let mut book = Book::new("Notes");
//! book.push_paragraph(Paragraph::new(vec![
//!     Run::text("plain "),
//!     Run::styled("bold", TextStyle::bold()),
//! ]));
//!
//! let mut renderers: Vec<Box<dyn Renderer>> = vec![Box::new(MarkdownRenderer::new())];
//! fan_out(&book, &mut renderers);
//!
//! let markdown = renderers[0].result()?;
//! assert_eq!(String::from_utf8_lossy(&markdown), "# Notes\n\nplain **bold**\n");
//! # Ok::<(), docstream::Error>(())
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::events::{Event, EventStream};
use crate::model::Book;
use crate::{Error, Result};

mod epub;
mod escape;
mod html;
mod inline;
mod latex;
mod markdown;
mod text;

pub use epub::{EpubConfig, EpubRenderer};
pub use escape::{escape_latex, escape_latex_url, escape_markdown, escape_xml};
pub use html::{HtmlConfig, HtmlRenderer};
pub use inline::{Closing, InlineStack, Marker, MarkerSyntax};
pub use latex::{LatexConfig, LatexRenderer};
pub use markdown::{MarkdownConfig, MarkdownRenderer};
pub use text::{PlaintextConfig, PlaintextRenderer};

/// A consumer of the event stream that produces one output format.
pub trait Renderer {
    /// The format this renderer produces.
    fn format(&self) -> Format;

    /// Consume one event. Renderers tolerate any well-formed stream and never
    /// fail here; problems surface from [`Renderer::result`].
    fn handle(&mut self, event: &Event);

    /// The rendered document.
    fn result(&mut self) -> Result<Vec<u8>>;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Markdown,
    Html,
    Latex,
    Epub,
    Plaintext,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::Markdown,
        Format::Html,
        Format::Latex,
        Format::Epub,
        Format::Plaintext,
    ];

    /// File extension for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Markdown => "md",
            Format::Html => "html",
            Format::Latex => "tex",
            Format::Epub => "epub",
            Format::Plaintext => "txt",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Markdown => "markdown",
            Format::Html => "html",
            Format::Latex => "latex",
            Format::Epub => "epub",
            Format::Plaintext => "plaintext",
        }
    }

    /// Parse a comma-separated format list such as `"md,html"`.
    ///
    /// Duplicates are dropped; the first unsupported token fails the whole
    /// list.
    pub fn parse_list(list: &str) -> Result<Vec<Format>> {
        let mut formats = Vec::new();
        for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let format: Format = token.parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        if formats.is_empty() {
            return Err(Error::UnsupportedFormat(list.to_string()));
        }
        Ok(formats)
    }

    /// Build a renderer for this format from the export configuration.
    pub fn renderer(self, config: &ExportConfig) -> Box<dyn Renderer> {
        match self {
            Format::Markdown => Box::new(MarkdownRenderer::with_config(config.markdown.clone())),
            Format::Html => Box::new(HtmlRenderer::with_config(config.html.clone())),
            Format::Latex => Box::new(LatexRenderer::with_config(config.latex.clone())),
            Format::Epub => Box::new(EpubRenderer::with_config(config.epub.clone())),
            Format::Plaintext => Box::new(PlaintextRenderer::with_config(config.plaintext.clone())),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Format::Markdown),
            "html" => Ok(Format::Html),
            "latex" | "tex" => Ok(Format::Latex),
            "epub" => Ok(Format::Epub),
            "plaintext" | "txt" | "text" => Ok(Format::Plaintext),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for an export job.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Formats to render, in output order.
    pub formats: Vec<Format>,
    /// Directory the rendered files are written to. Created if missing.
    pub output_dir: PathBuf,
    pub markdown: MarkdownConfig,
    pub html: HtmlConfig,
    pub latex: LatexConfig,
    pub epub: EpubConfig,
    pub plaintext: PlaintextConfig,
}

impl ExportConfig {
    pub fn new(output_dir: impl Into<PathBuf>, formats: Vec<Format>) -> Self {
        Self {
            formats,
            output_dir: output_dir.into(),
            markdown: MarkdownConfig::default(),
            html: HtmlConfig::default(),
            latex: LatexConfig::default(),
            epub: EpubConfig::default(),
            plaintext: PlaintextConfig::default(),
        }
    }

    /// Path of the output file for `stem` in `format`.
    pub fn output_path(&self, stem: &str, format: Format) -> PathBuf {
        self.output_dir
            .join(format!("{stem}.{}", format.extension()))
    }
}

/// Outcome of writing one format.
#[derive(Debug)]
pub struct FormatOutput {
    pub format: Format,
    pub result: Result<PathBuf>,
}

/// Per-format outcome of an export job.
#[derive(Debug)]
pub struct ExportReport {
    /// Stem of the exported book.
    pub book: String,
    pub outputs: Vec<FormatOutput>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.outputs.iter().all(|o| o.result.is_ok())
    }

    /// Formats that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (Format, &Error)> {
        self.outputs
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.format, e)))
    }
}

/// Drive every renderer from a single pass over the book's event stream.
///
/// Each event is handed to all renderers, in order, before the stream
/// advances. Returns the number of events produced.
pub fn fan_out(book: &Book, renderers: &mut [Box<dyn Renderer>]) -> usize {
    let mut count = 0;
    for event in EventStream::new(book) {
        for renderer in renderers.iter_mut() {
            renderer.handle(&event);
        }
        count += 1;
    }
    log::debug!(
        "streamed {count} events to {} renderer(s) for {:?}",
        renderers.len(),
        book.title
    );
    count
}

/// Render `book` in every configured format and write the results to
/// `<output_dir>/<stem>.<ext>`.
///
/// A failure in one format is recorded in the report and does not stop the
/// other formats from being written.
pub fn export_book(book: &Book, stem: &str, config: &ExportConfig) -> ExportReport {
    let mut renderers: Vec<Box<dyn Renderer>> = config
        .formats
        .iter()
        .map(|format| format.renderer(config))
        .collect();

    fan_out(book, &mut renderers);

    let outputs = renderers
        .iter_mut()
        .map(|renderer| {
            let format = renderer.format();
            let path = config.output_path(stem, format);
            let result = renderer
                .result()
                .and_then(|bytes| write_output(&path, &bytes))
                .map(|()| path);
            if let Err(e) = &result {
                log::warn!("failed to write {format} output for {stem}: {e}");
            }
            FormatOutput { format, result }
        })
        .collect();

    ExportReport {
        book: stem.to_string(),
        outputs,
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
