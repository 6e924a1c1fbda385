//! The canonical event stream.
//!
//! A document is flattened into an ordered sequence of [`Event`]s that every
//! renderer consumes. The sequence is the contract between the document model
//! and the output formats:
//!
//! - Structural events come in `Start*`/`End*` pairs and nest properly
//! - Formatting events carry a single [`Style`] flag each; closes arrive
//!   innermost-first, opens outermost-first
//! - Text and images only appear inside a paragraph, list or table cell
//!
//! ## Example
//!
//! ```
//! use docstream::events::{Event, EventStream};
//! use docstream::model::{Book, Paragraph, Run, TextStyle};
//!
//! let mut book = Book::new("Notes");
//! book.push_paragraph(Paragraph::new(vec![
//!     Run::text("plain "),
//!     Run::styled("bold", TextStyle::bold()),
//! ]));
//!
//! let events: Vec<Event> = EventStream::new(&book).collect();
//! assert_eq!(events.len(), 8);
//! assert_eq!(events[0], Event::StartDoc { title: "Notes".into() });
//! ```

mod slugify;
mod stream;

use std::fmt;

use crate::style::Style;

pub use slugify::slugify;
pub use stream::{EventStream, IMAGE_ALT_TEXT, events};

/// One unit of the canonical document stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartDoc {
        title: String,
    },
    EndDoc {
        title: String,
    },
    StartParagraph,
    EndParagraph,
    StartHeading {
        level: u8,
        text: String,
        anchor: String,
    },
    EndHeading {
        level: u8,
        text: String,
        anchor: String,
    },
    StartList {
        level: u32,
        ordered: bool,
    },
    EndList {
        level: u32,
        ordered: bool,
    },
    StartTable {
        columns: usize,
        rows: usize,
    },
    EndTable {
        columns: usize,
        rows: usize,
    },
    StartTableRow,
    EndTableRow,
    StartTableCell,
    EndTableCell,
    /// Opens a single formatting flag. `link` is the URL of the link context
    /// the flag is opened in.
    StartFormatting {
        style: Style,
        link: Option<String>,
    },
    /// Closes a single formatting flag. `link` is the URL of the link context
    /// being left.
    EndFormatting {
        style: Style,
        link: Option<String>,
    },
    Text(String),
    Image {
        url: String,
        alt: String,
    },
}

impl Event {
    /// Short kind name, used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Event::StartDoc { .. } => "StartDoc",
            Event::EndDoc { .. } => "EndDoc",
            Event::StartParagraph => "StartParagraph",
            Event::EndParagraph => "EndParagraph",
            Event::StartHeading { .. } => "StartHeading",
            Event::EndHeading { .. } => "EndHeading",
            Event::StartList { .. } => "StartList",
            Event::EndList { .. } => "EndList",
            Event::StartTable { .. } => "StartTable",
            Event::EndTable { .. } => "EndTable",
            Event::StartTableRow => "StartTableRow",
            Event::EndTableRow => "EndTableRow",
            Event::StartTableCell => "StartTableCell",
            Event::EndTableCell => "EndTableCell",
            Event::StartFormatting { .. } => "StartFormatting",
            Event::EndFormatting { .. } => "EndFormatting",
            Event::Text(_) => "Text",
            Event::Image { .. } => "Image",
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(
            self,
            Event::StartDoc { .. }
                | Event::StartParagraph
                | Event::StartHeading { .. }
                | Event::StartList { .. }
                | Event::StartTable { .. }
                | Event::StartTableRow
                | Event::StartTableCell
                | Event::StartFormatting { .. }
        )
    }

    pub fn is_end(&self) -> bool {
        matches!(
            self,
            Event::EndDoc { .. }
                | Event::EndParagraph
                | Event::EndHeading { .. }
                | Event::EndList { .. }
                | Event::EndTable { .. }
                | Event::EndTableRow
                | Event::EndTableCell
                | Event::EndFormatting { .. }
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::StartFormatting { style, .. } | Event::EndFormatting { style, .. } => {
                write!(f, "{}({style})", self.name())
            }
            Event::Text(text) => write!(f, "Text({text:?})"),
            Event::StartHeading { level, text, .. } | Event::EndHeading { level, text, .. } => {
                write!(f, "{}({level}, {text:?})", self.name())
            }
            _ => f.write_str(self.name()),
        }
    }
}
