//! Plain text renderer.

use std::mem;

use crate::events::Event;
use crate::style::Style;
use crate::Result;

use super::{Format, Renderer};

/// Configuration for plain text export.
#[derive(Debug, Clone)]
pub struct PlaintextConfig {
    /// Append ` <url>` after link text.
    pub show_link_urls: bool,
}

impl Default for PlaintextConfig {
    fn default() -> Self {
        Self {
            show_link_urls: true,
        }
    }
}

/// Renderer for plain text output.
///
/// Headings are underlined (`=` for the title, `-` below), list items are
/// prefixed with `* ` and table cells are separated by ` | `.
#[derive(Debug, Default)]
pub struct PlaintextRenderer {
    config: PlaintextConfig,
    blocks: Vec<String>,
    line: String,
    list: Option<Vec<String>>,
    row: Option<Vec<String>>,
    rows: Vec<String>,
    table_depth: usize,
}

fn underlined(text: &str, ch: char) -> String {
    let width = text.chars().count();
    format!("{text}\n{}", ch.to_string().repeat(width))
}

impl PlaintextRenderer {
    /// Create a new PlaintextRenderer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a PlaintextRenderer with the specified configuration.
    pub fn with_config(config: PlaintextConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn append_to_cell(&mut self, text: &str) {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return;
        }
        if let Some(cell) = self.row.as_mut().and_then(|row| row.last_mut()) {
            if !cell.is_empty() {
                cell.push(' ');
            }
            cell.push_str(&text);
        }
    }

    fn end_paragraph(&mut self) {
        let line = mem::take(&mut self.line);
        let line = line.trim();

        if self.table_depth > 0 {
            self.append_to_cell(line);
        } else if let Some(items) = &mut self.list {
            items.push(format!("* {line}"));
        } else if !line.is_empty() {
            self.blocks.push(line.to_string());
        }
    }
}

impl Renderer for PlaintextRenderer {
    fn format(&self) -> Format {
        Format::Plaintext
    }

    fn handle(&mut self, event: &Event) {
        match event {
            Event::StartDoc { title } => {
                if !title.trim().is_empty() {
                    self.blocks.push(underlined(title.trim(), '='));
                }
            }
            Event::StartHeading { text, .. } => {
                if self.table_depth > 0 {
                    self.append_to_cell(text);
                } else {
                    self.blocks.push(underlined(text, '-'));
                }
            }
            Event::StartList { .. } => {
                if self.table_depth == 0 {
                    self.list = Some(Vec::new());
                }
            }
            Event::EndList { .. } => {
                if self.table_depth == 0
                    && let Some(items) = self.list.take()
                    && !items.is_empty()
                {
                    self.blocks.push(items.join("\n"));
                }
            }
            Event::StartParagraph => self.line.clear(),
            Event::EndParagraph => self.end_paragraph(),
            Event::StartTable { .. } => self.table_depth += 1,
            Event::EndTable { .. } => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 && !self.rows.is_empty() {
                    self.blocks.push(mem::take(&mut self.rows).join("\n"));
                }
            }
            Event::StartTableRow => {
                if self.table_depth == 1 {
                    self.row = Some(Vec::new());
                }
            }
            Event::EndTableRow => {
                if self.table_depth == 1
                    && let Some(row) = self.row.take()
                {
                    self.rows.push(row.join(" | "));
                }
            }
            Event::StartTableCell => {
                if self.table_depth == 1
                    && let Some(row) = &mut self.row
                {
                    row.push(String::new());
                }
            }
            Event::EndFormatting { style, link } => {
                if *style == Style::LINK
                    && self.config.show_link_urls
                    && let Some(url) = link
                {
                    self.line.push_str(&format!(" <{url}>"));
                }
            }
            Event::Text(text) => self.line.push_str(&text.replace('\u{000b}', "\n")),
            Event::Image { url, alt } => self.line.push_str(&format!("[{alt}: {url}]")),
            Event::EndDoc { .. }
            | Event::EndHeading { .. }
            | Event::EndTableCell
            | Event::StartFormatting { .. } => {}
        }
    }

    fn result(&mut self) -> Result<Vec<u8>> {
        let mut blocks = self.blocks.clone();
        if let Some(items) = &self.list
            && !items.is_empty()
        {
            blocks.push(items.join("\n"));
        }
        let mut out = blocks.join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventStream;
    use crate::model::{
        Book, BodyElement, Bullet, NamedStyle, Paragraph, Run, Table, TableCell, TableRow,
        TextStyle,
    };

    fn render(renderer: &mut PlaintextRenderer, book: &Book) -> String {
        for event in EventStream::new(book) {
            renderer.handle(&event);
        }
        String::from_utf8(renderer.result().unwrap()).unwrap()
    }

    #[test]
    fn test_title_and_heading_underlines() {
        let mut book = Book::new("Title");
        book.push_paragraph(
            Paragraph::new(vec![Run::text("Über")]).with_named_style(NamedStyle::Heading1),
        );
        book.push_paragraph(Paragraph::new(vec![Run::styled("body", TextStyle::bold())]));

        assert_eq!(
            render(&mut PlaintextRenderer::new(), &book),
            "Title\n=====\n\nÜber\n----\n\nbody\n"
        );
    }

    #[test]
    fn test_link_urls() {
        let mut book = Book::new("");
        book.push_paragraph(Paragraph::new(vec![
            Run::styled("site", TextStyle::linked("https://x.org")),
            Run::text(" end"),
        ]));

        assert_eq!(
            render(&mut PlaintextRenderer::new(), &book),
            "site <https://x.org> end\n"
        );

        let mut quiet = PlaintextRenderer::with_config(PlaintextConfig {
            show_link_urls: false,
        });
        assert_eq!(render(&mut quiet, &book), "site end\n");
    }

    #[test]
    fn test_lists_and_tables() {
        let cell = |text: &str| {
            TableCell::new(vec![BodyElement::Paragraph(Paragraph::new(vec![Run::text(text)]))])
        };
        let mut book = Book::new("");
        let bullet = Bullet::new("l", 0, false);
        book.push_paragraph(Paragraph::new(vec![Run::text("one")]).with_bullet(bullet.clone()));
        book.push_paragraph(Paragraph::new(vec![Run::text("two")]).with_bullet(bullet));
        book.push_table(Table::new(vec![
            TableRow::new(vec![cell("a"), cell("b")]),
            TableRow::new(vec![cell("c"), cell("d")]),
        ]));

        assert_eq!(
            render(&mut PlaintextRenderer::new(), &book),
            "* one\n* two\n\na | b\nc | d\n"
        );
    }
}
