//! Markdown renderer.
//!
//! Produces CommonMark with a few widely supported extensions:
//! - `~~strike~~` and `==highlight==`
//! - raw `<u>`, `<sub>` and `<sup>` tags for the flags Markdown has no syntax for
//! - GFM pipe tables, with the first row used as the header
//!
//! Tables nested inside table cells are flattened into the enclosing cell.

use std::mem;

use crate::events::Event;
use crate::style::Style;
use crate::Result;

use super::escape::escape_markdown;
use super::inline::{InlineStack, Marker, MarkerSyntax};
use super::{Format, Renderer};

/// Configuration for Markdown export.
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Emit the document title as a level-1 heading.
    pub title_heading: bool,
    /// Bullet character for unordered list items.
    pub bullet: char,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            title_heading: true,
            bullet: '-',
        }
    }
}

/// Renderer for Markdown output.
#[derive(Debug, Default)]
pub struct MarkdownRenderer {
    config: MarkdownConfig,
    blocks: Vec<String>,
    inline: String,
    markers: InlineStack,
    list: Option<ListState>,
    table: Option<TableState>,
    table_depth: usize,
}

#[derive(Debug)]
struct ListState {
    ordered: bool,
    items: Vec<String>,
}

#[derive(Debug)]
struct TableState {
    columns: usize,
    rows: Vec<Vec<String>>,
}

struct Syntax;

impl MarkerSyntax for Syntax {
    fn open(&self, marker: &Marker, out: &mut String) {
        out.push_str(match marker.style {
            Style::BOLD => "**",
            Style::ITALIC => "*",
            Style::UNDERLINE => "<u>",
            Style::STRIKETHROUGH => "~~",
            Style::HIGHLIGHT => "==",
            Style::SUBSCRIPT => "<sub>",
            Style::SUPERSCRIPT => "<sup>",
            Style::LINK => "[",
            _ => "",
        });
    }

    fn close(&self, marker: &Marker, out: &mut String) {
        // Emphasis cannot close after whitespace, so trailing whitespace is
        // moved outside the marker.
        let content_end = out.trim_end().len();
        let trailing = out.split_off(content_end);

        match marker.style {
            Style::BOLD => out.push_str("**"),
            Style::ITALIC => out.push('*'),
            Style::UNDERLINE => out.push_str("</u>"),
            Style::STRIKETHROUGH => out.push_str("~~"),
            Style::HIGHLIGHT => out.push_str("=="),
            Style::SUBSCRIPT => out.push_str("</sub>"),
            Style::SUPERSCRIPT => out.push_str("</sup>"),
            Style::LINK => {
                out.push_str("](");
                out.push_str(&link_destination(marker.link.as_deref().unwrap_or("")));
                out.push(')');
            }
            _ => {}
        }

        out.push_str(&trailing);
    }
}

/// Wrap destinations Markdown would otherwise cut short in angle brackets.
fn link_destination(url: &str) -> String {
    if url.contains([' ', '(', ')', '<', '>']) {
        format!("<{}>", url.replace('<', "%3C").replace('>', "%3E"))
    } else {
        url.to_string()
    }
}

impl MarkdownRenderer {
    /// Create a new MarkdownRenderer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MarkdownRenderer with the specified configuration.
    pub fn with_config(config: MarkdownConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn push_text(&mut self, text: &str) {
        let text = text.replace('\u{000b}', "\n");
        self.inline.push_str(&escape_markdown(&text));
    }

    fn current_cell(&mut self) -> Option<&mut String> {
        self.table.as_mut()?.rows.last_mut()?.last_mut()
    }

    /// Append a finished block of text to the enclosing table cell.
    fn append_to_cell(&mut self, text: &str) {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return;
        }
        let separator = if self.table_depth > 1 { " " } else { "<br>" };
        if let Some(cell) = self.current_cell() {
            if !cell.is_empty() {
                cell.push_str(separator);
            }
            cell.push_str(&text);
        }
    }

    fn end_paragraph(&mut self) {
        self.markers.finish(&Syntax, &mut self.inline);
        let text = mem::take(&mut self.inline);
        let text = text.trim();

        if self.table_depth > 0 {
            self.append_to_cell(text);
        } else if let Some(list) = &mut self.list {
            let marker = if list.ordered {
                format!("{}.", list.items.len() + 1)
            } else {
                self.config.bullet.to_string()
            };
            list.items.push(format!("{marker} {text}"));
        } else if !text.is_empty() {
            self.blocks.push(text.to_string());
        }
    }

    fn end_table(&mut self) {
        self.table_depth = self.table_depth.saturating_sub(1);
        if self.table_depth > 0 {
            return;
        }
        if let Some(table) = self.table.take() {
            let rendered = render_table(&table);
            if !rendered.is_empty() {
                self.blocks.push(rendered);
            }
        }
    }
}

fn render_table(table: &TableState) -> String {
    let Some((header, body)) = table.rows.split_first() else {
        return String::new();
    };
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(table.columns)
        .max(1);

    let row_line = |cells: &[String]| {
        let mut line = String::from("|");
        for i in 0..columns {
            line.push(' ');
            line.push_str(cells.get(i).map(String::as_str).unwrap_or(""));
            line.push_str(" |");
        }
        line
    };

    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(row_line(header));
    lines.push(format!("|{}", " --- |".repeat(columns)));
    lines.extend(body.iter().map(|row| row_line(row)));
    lines.join("\n")
}

impl Renderer for MarkdownRenderer {
    fn format(&self) -> Format {
        Format::Markdown
    }

    fn handle(&mut self, event: &Event) {
        match event {
            Event::StartDoc { title } => {
                if self.config.title_heading && !title.trim().is_empty() {
                    self.blocks.push(format!("# {}", escape_markdown(title.trim())));
                }
            }
            Event::EndDoc { .. } => {}
            Event::StartHeading { level, text, .. } => {
                if self.table_depth > 0 {
                    self.append_to_cell(&escape_markdown(text));
                } else {
                    let hashes = "#".repeat(usize::from((*level).clamp(1, 6)));
                    self.blocks.push(format!("{hashes} {}", escape_markdown(text)));
                }
            }
            Event::EndHeading { .. } => {}
            Event::StartList { ordered, .. } => {
                if self.table_depth == 0 {
                    self.list = Some(ListState {
                        ordered: *ordered,
                        items: Vec::new(),
                    });
                }
            }
            Event::EndList { .. } => {
                if self.table_depth == 0
                    && let Some(list) = self.list.take()
                    && !list.items.is_empty()
                {
                    self.blocks.push(list.items.join("\n"));
                }
            }
            Event::StartParagraph => self.inline.clear(),
            Event::EndParagraph => self.end_paragraph(),
            Event::StartTable { columns, .. } => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = Some(TableState {
                        columns: *columns,
                        rows: Vec::new(),
                    });
                }
            }
            Event::EndTable { .. } => self.end_table(),
            Event::StartTableRow => {
                if self.table_depth == 1
                    && let Some(table) = &mut self.table
                {
                    table.rows.push(Vec::new());
                }
            }
            Event::StartTableCell => {
                if self.table_depth == 1
                    && let Some(row) = self.table.as_mut().and_then(|t| t.rows.last_mut())
                {
                    row.push(String::new());
                }
            }
            Event::EndTableRow | Event::EndTableCell => {}
            Event::StartFormatting { style, link } => {
                self.markers
                    .start(*style, link.clone(), &Syntax, &mut self.inline);
            }
            Event::EndFormatting { style, .. } => {
                self.markers.end(*style, &Syntax, &mut self.inline);
            }
            Event::Text(text) => self.push_text(text),
            Event::Image { url, alt } => {
                self.inline.push_str(&format!(
                    "![{}]({})",
                    escape_markdown(alt),
                    link_destination(url)
                ));
            }
        }
    }

    fn result(&mut self) -> Result<Vec<u8>> {
        let mut out = self.blocks.join("\n\n");
        if let Some(list) = &self.list
            && !list.items.is_empty()
        {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(&list.items.join("\n"));
        }
        if !out.is_empty() {
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}
