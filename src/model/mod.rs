//! Document model consumed by the pipeline.
//!
//! This module contains:
//! - The [`Book`]: title, chapter list, body and inline-object map
//! - Block elements ([`BodyElement`]): paragraphs and tables
//! - Paragraph runs ([`Run`]) and their character formatting ([`TextStyle`])
//!
//! The shape follows the Google Docs document resource closely enough that a
//! `documents.get` response can be mapped onto it field by field. With the
//! `serde` feature enabled, [`Book::from_json`] reads the camelCase JSON form
//! directly:
//!
//! ```json
//! {
//!   "title": "Handbook",
//!   "chapters": [{ "title": "Intro", "headingId": "h.abc" }],
//!   "inlineObjects": { "kix.1": "https://example.com/a.png" },
//!   "body": [
//!     { "paragraph": {
//!         "namedStyleType": "HEADING_1",
//!         "headingId": "h.abc",
//!         "elements": [{ "textRun": { "content": "Intro\n" } }]
//!     } }
//!   ]
//! }
//! ```

mod paragraph;
mod text_style;

use std::collections::HashMap;

pub use paragraph::{Bullet, InlineObjectRef, NamedStyle, Paragraph, Run, TextRun};
pub use text_style::{Dimension, Link, TextStyle, WeightedFontFamily};

/// A chapter entry: a titled heading anchored in the body by its heading id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Chapter {
    pub title: String,
    pub heading_id: String,
    pub children: Vec<Chapter>,
}

impl Chapter {
    pub fn new(title: impl Into<String>, heading_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            heading_id: heading_id.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Chapter) -> Self {
        self.children.push(child);
        self
    }
}

/// A table cell holding block content.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct TableCell {
    pub content: Vec<BodyElement>,
}

impl TableCell {
    pub fn new(content: Vec<BodyElement>) -> Self {
        Self { content }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct TableRow {
    pub table_cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(table_cells: Vec<TableCell>) -> Self {
        Self { table_cells }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Table {
    pub table_rows: Vec<TableRow>,
}

impl Table {
    pub fn new(table_rows: Vec<TableRow>) -> Self {
        Self { table_rows }
    }

    pub fn rows(&self) -> usize {
        self.table_rows.len()
    }

    /// Column count of the widest row (rows may be ragged upstream).
    pub fn columns(&self) -> usize {
        self.table_rows
            .iter()
            .map(|row| row.table_cells.len())
            .max()
            .unwrap_or(0)
    }
}

/// A block-level element of the body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum BodyElement {
    Paragraph(Paragraph),
    Table(Table),
}

/// A document ready for export.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Book {
    pub title: String,
    pub chapters: Vec<Chapter>,
    pub body: Vec<BodyElement>,
    /// Inline object id to image URL.
    pub inline_objects: HashMap<String, String>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.chapters.push(chapter);
        self
    }

    pub fn with_inline_object(mut self, id: impl Into<String>, url: impl Into<String>) -> Self {
        self.inline_objects.insert(id.into(), url.into());
        self
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.body.push(BodyElement::Paragraph(paragraph));
    }

    pub fn push_table(&mut self, table: Table) {
        self.body.push(BodyElement::Table(table));
    }

    /// Index of every chapter (nested ones included) by heading id.
    pub fn chapter_index(&self) -> HashMap<&str, &Chapter> {
        fn visit<'a>(chapters: &'a [Chapter], index: &mut HashMap<&'a str, &'a Chapter>) {
            for chapter in chapters {
                index.insert(chapter.heading_id.as_str(), chapter);
                visit(&chapter.children, index);
            }
        }

        let mut index = HashMap::new();
        visit(&self.chapters, &mut index);
        index
    }

    /// Parse a book from its JSON form.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a book from a JSON file, tolerating a BOM or a legacy
    /// single-byte encoding.
    #[cfg(feature = "serde")]
    pub fn open(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let text = crate::util::decode_text(&bytes, None);
        Self::from_json(&text).map_err(|e| {
            crate::Error::InvalidDocument(format!("{}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_index_includes_nested() {
        let book = Book::new("Book")
            .with_chapter(Chapter::new("One", "h.1").with_child(Chapter::new("One.A", "h.1a")))
            .with_chapter(Chapter::new("Two", "h.2"));

        let index = book.chapter_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index["h.1a"].title, "One.A");
        assert_eq!(index["h.2"].title, "Two");
    }

    #[test]
    fn test_table_dimensions_use_widest_row() {
        let table = Table::new(vec![
            TableRow::new(vec![TableCell::default(); 2]),
            TableRow::new(vec![TableCell::default(); 3]),
        ]);
        assert_eq!(table.rows(), 2);
        assert_eq!(table.columns(), 3);
        assert_eq!(Table::default().columns(), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let json = r#"{
            "title": "Handbook",
            "chapters": [{ "title": "Intro", "headingId": "h.abc" }],
            "inlineObjects": { "kix.1": "https://example.com/a.png" },
            "body": [
                { "paragraph": {
                    "namedStyleType": "HEADING_1",
                    "headingId": "h.abc",
                    "elements": [{ "textRun": { "content": "Intro\n" } }]
                } },
                { "paragraph": {
                    "elements": [
                        { "textRun": { "content": "Bold", "textStyle": { "bold": true } } },
                        { "inlineObjectElement": { "inlineObjectId": "kix.1" } },
                        "pageBreak"
                    ]
                } },
                { "table": { "tableRows": [ { "tableCells": [ { "content": [] } ] } ] } }
            ]
        }"#;

        let book = Book::from_json(json).unwrap();
        assert_eq!(book.title, "Handbook");
        assert_eq!(book.chapters[0].heading_id, "h.abc");
        assert_eq!(book.body.len(), 3);

        let BodyElement::Paragraph(heading) = &book.body[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(heading.named_style(), NamedStyle::Heading1);

        let BodyElement::Paragraph(para) = &book.body[1] else {
            panic!("expected paragraph");
        };
        assert_eq!(para.elements.len(), 3);
        assert_eq!(para.elements[0].as_text().unwrap().text_style.bold, Some(true));
        assert_eq!(para.elements[2], Run::PageBreak);

        assert!(matches!(book.body[2], BodyElement::Table(_)));
    }
}
