//! # docstream
//!
//! Convert Google-Docs-shaped documents into Markdown, HTML, LaTeX, EPUB and
//! plain text from a single pass over a canonical event stream.
//!
//! ## Pipeline
//!
//! 1. Load a [`Book`] (from JSON with the `serde` feature, or build one in code)
//! 2. [`optimize`] it: adjacent runs that render identically are merged
//! 3. Walk it with [`EventStream`], a lazy iterator of [`Event`]s
//! 4. Feed the events to one or more [`Renderer`]s via [`fan_out`]
//!
//! ## Quick Start
//!
//! ```
//! use docstream::{Book, Format, export::ExportConfig};
//! use docstream::model::{Paragraph, Run, TextStyle};
//!
//! let mut book = Book::new("Release notes");
//! book.push_paragraph(Paragraph::new(vec![
//!     Run::styled("T", TextStyle::bold()),
//!     Run::styled("HE ", TextStyle::bold()),
//!     Run::text("end"),
//! ]));
//! docstream::optimize(&mut book);
//!
//! let dir = std::env::temp_dir().join("docstream-doc");
//! let config = ExportConfig::new(&dir, vec![Format::Markdown, Format::Html]);
//! let report = docstream::export_book(&book, "notes", &config);
//! assert!(report.is_success());
//! # std::fs::remove_dir_all(&dir).ok();
//! ```
//!
//! ## Working with Events
//!
//! Formatting is carried as one [`Style`] flag per event. Flags nest in a
//! fixed precedence (link, bold, italic, underline, strikethrough, highlight,
//! subscript, superscript), so closes always arrive innermost-first:
//!
//! ```
//! use docstream::{Book, Event, EventStream, Style};
//! use docstream::model::{Paragraph, Run, TextStyle};
//!
//! let mut book = Book::new("");
//! book.push_paragraph(Paragraph::new(vec![Run::styled("x", TextStyle::italic())]));
//!
//! let opened: Vec<Style> = EventStream::new(&book)
//!     .filter_map(|e| match e {
//!         Event::StartFormatting { style, .. } => Some(style),
//!         _ => None,
//!     })
//!     .collect();
//! assert_eq!(opened, vec![Style::ITALIC]);
//! ```

pub mod error;
pub mod events;
pub mod export;
pub mod model;
pub mod optimize;
pub mod style;
pub mod util;

pub use error::{Error, Result};
pub use events::{Event, EventStream};
pub use export::{ExportConfig, ExportReport, Format, Renderer, export_book, fan_out};
pub use model::Book;
pub use optimize::optimize;
pub use style::Style;
