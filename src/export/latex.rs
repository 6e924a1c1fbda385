//! LaTeX renderer.
//!
//! Emits a self-contained document using only widely installed packages:
//! `ulem` for underline and strikethrough, `soul` for highlighting and
//! `hyperref` for links.

use std::mem;

use crate::events::Event;
use crate::style::Style;
use crate::Result;

use super::escape::{escape_latex, escape_latex_url};
use super::inline::{InlineStack, Marker, MarkerSyntax};
use super::{Format, Renderer};

/// Configuration for LaTeX export.
#[derive(Debug, Clone)]
pub struct LatexConfig {
    /// Argument of `\documentclass`.
    pub document_class: String,
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            document_class: "article".to_string(),
        }
    }
}

struct Commands;

impl MarkerSyntax for Commands {
    fn open(&self, marker: &Marker, out: &mut String) {
        match marker.style {
            Style::LINK => {
                out.push_str("\\href{");
                out.push_str(&escape_latex_url(marker.link.as_deref().unwrap_or("")));
                out.push_str("}{");
            }
            style => {
                if let Some(command) = command(style) {
                    out.push('\\');
                    out.push_str(command);
                    out.push('{');
                }
            }
        }
    }

    fn close(&self, marker: &Marker, out: &mut String) {
        if marker.style == Style::LINK || command(marker.style).is_some() {
            out.push('}');
        }
    }
}

fn command(style: Style) -> Option<&'static str> {
    Some(match style {
        Style::BOLD => "textbf",
        Style::ITALIC => "textit",
        Style::UNDERLINE => "uline",
        Style::STRIKETHROUGH => "sout",
        Style::HIGHLIGHT => "hl",
        Style::SUBSCRIPT => "textsubscript",
        Style::SUPERSCRIPT => "textsuperscript",
        _ => return None,
    })
}

fn sectioning(level: u8) -> &'static str {
    match level {
        0..=2 => "section",
        3 => "subsection",
        4 => "subsubsection",
        5 => "paragraph",
        _ => "subparagraph",
    }
}

/// Renderer for LaTeX output.
#[derive(Debug, Default)]
pub struct LatexRenderer {
    config: LatexConfig,
    title: String,
    body: String,
    inline: String,
    markers: InlineStack,
    in_list: bool,
    table: Option<TableState>,
    table_depth: usize,
}

#[derive(Debug)]
struct TableState {
    columns: usize,
    rows: Vec<Vec<String>>,
}

impl LatexRenderer {
    /// Create a new LatexRenderer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a LatexRenderer with the specified configuration.
    pub fn with_config(config: LatexConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn append_to_cell(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if let Some(cell) = self
            .table
            .as_mut()
            .and_then(|t| t.rows.last_mut())
            .and_then(|row| row.last_mut())
        {
            if !cell.is_empty() {
                cell.push(' ');
            }
            cell.push_str(text);
        }
    }

    fn end_paragraph(&mut self) {
        self.markers.finish(&Commands, &mut self.inline);
        let text = mem::take(&mut self.inline);
        let text = text.trim();

        if self.table_depth > 0 {
            self.append_to_cell(text);
        } else if self.in_list {
            self.body.push_str(&format!("  \\item {text}\n"));
        } else if !text.is_empty() {
            self.body.push_str(text);
            self.body.push_str("\n\n");
        }
    }

    fn end_table(&mut self) {
        self.table_depth = self.table_depth.saturating_sub(1);
        if self.table_depth > 0 {
            return;
        }
        let Some(table) = self.table.take() else {
            return;
        };
        let columns = table
            .rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(table.columns)
            .max(1);

        self.body.push_str(&format!(
            "\\begin{{tabular}}{{|{}}}\n\\hline\n",
            "l|".repeat(columns)
        ));
        for row in &table.rows {
            let mut cells: Vec<&str> = row.iter().map(String::as_str).collect();
            cells.resize(columns, "");
            self.body.push_str(&cells.join(" & "));
            self.body.push_str(" \\\\\n\\hline\n");
        }
        self.body.push_str("\\end{tabular}\n\n");
    }
}

impl Renderer for LatexRenderer {
    fn format(&self) -> Format {
        Format::Latex
    }

    fn handle(&mut self, event: &Event) {
        match event {
            Event::StartDoc { title } => self.title = title.clone(),
            Event::EndDoc { .. } => {}
            Event::StartHeading {
                level,
                text,
                anchor,
            } => {
                if self.table_depth > 0 {
                    self.append_to_cell(&format!("\\textbf{{{}}}", escape_latex(text)));
                } else {
                    self.body.push_str(&format!(
                        "\\{}{{{}}}",
                        sectioning(*level),
                        escape_latex(text)
                    ));
                    if !anchor.is_empty() {
                        self.body.push_str(&format!("\\label{{{anchor}}}"));
                    }
                    self.body.push_str("\n\n");
                }
            }
            Event::EndHeading { .. } => {}
            Event::StartList { ordered, .. } => {
                self.in_list = true;
                if self.table_depth == 0 {
                    let env = if *ordered { "enumerate" } else { "itemize" };
                    self.body.push_str(&format!("\\begin{{{env}}}\n"));
                }
            }
            Event::EndList { ordered, .. } => {
                self.in_list = false;
                if self.table_depth == 0 {
                    let env = if *ordered { "enumerate" } else { "itemize" };
                    self.body.push_str(&format!("\\end{{{env}}}\n\n"));
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
                self.in_list = false;
                if self.table_depth == 1
                    && let Some(row) = self.table.as_mut().and_then(|t| t.rows.last_mut())
                {
                    row.push(String::new());
                }
            }
            Event::EndTableCell => self.in_list = false,
            Event::EndTableRow => {}
            Event::StartFormatting { style, link } => {
                self.markers
                    .start(*style, link.clone(), &Commands, &mut self.inline);
            }
            Event::EndFormatting { style, .. } => {
                self.markers.end(*style, &Commands, &mut self.inline);
            }
            Event::Text(text) => {
                let escaped = escape_latex(text);
                self.inline.push_str(&escaped.replace('\u{000b}', "\\\\\n"));
            }
            Event::Image { url, alt } => {
                self.inline.push_str(&format!(
                    "\\href{{{}}}{{[{}]}}",
                    escape_latex_url(url),
                    escape_latex(alt)
                ));
            }
        }
    }

    fn result(&mut self) -> Result<Vec<u8>> {
        let mut out = String::with_capacity(self.body.len() + 512);
        out.push_str(&format!("\\documentclass{{{}}}\n", self.config.document_class));
        out.push_str("\\usepackage[utf8]{inputenc}\n");
        out.push_str("\\usepackage[T1]{fontenc}\n");
        out.push_str("\\usepackage[normalem]{ulem}\n");
        out.push_str("\\usepackage{soul}\n");
        out.push_str("\\usepackage{hyperref}\n");

        let has_title = !self.title.trim().is_empty();
        if has_title {
            out.push_str(&format!("\\title{{{}}}\n\\date{{}}\n", escape_latex(&self.title)));
        }
        out.push_str("\n\\begin{document}\n");
        if has_title {
            out.push_str("\\maketitle\n");
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push_str("\\end{document}\n");

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

    fn render(book: &Book) -> String {
        let mut renderer = LatexRenderer::new();
        for event in EventStream::new(book) {
            renderer.handle(&event);
        }
        String::from_utf8(renderer.result().unwrap()).unwrap()
    }

    fn body(book: &Book) -> String {
        let tex = render(book);
        let start = tex.find("\\begin{document}\n").unwrap() + "\\begin{document}\n".len();
        let end = tex.find("\\end{document}").unwrap();
        tex[start..end].trim().to_string()
    }

    #[test]
    fn test_preamble() {
        let tex = render(&Book::new("R&D"));
        assert!(tex.starts_with("\\documentclass{article}\n"));
        assert!(tex.contains("\\usepackage[normalem]{ulem}"));
        assert!(tex.contains("\\usepackage{soul}"));
        assert!(tex.contains("\\usepackage{hyperref}"));
        assert!(tex.contains("\\title{R\\&D}"));
        assert!(tex.contains("\\maketitle"));
        assert!(tex.ends_with("\\end{document}\n"));
    }

    #[test]
    fn test_sectioning_levels() {
        let mut book = Book::new("");
        for (style, text) in [
            (NamedStyle::Heading1, "One"),
            (NamedStyle::Heading2, "Two"),
            (NamedStyle::Heading4, "Four"),
            (NamedStyle::Heading6, "Six"),
        ] {
            book.push_paragraph(Paragraph::new(vec![Run::text(text)]).with_named_style(style));
        }

        assert_eq!(
            body(&book),
            "\\section{One}\\label{one}\n\n\\subsection{Two}\\label{two}\n\n\\paragraph{Four}\\label{four}\n\n\\subparagraph{Six}\\label{six}"
        );
    }

    #[test]
    fn test_formatting_and_links() {
        let mut book = Book::new("");
        book.push_paragraph(Paragraph::new(vec![
            Run::styled("100%", TextStyle::bold()),
            Run::text(" see "),
            Run::styled("here", TextStyle::linked("https://x.org/a b#c")),
        ]));

        assert_eq!(
            body(&book),
            "\\textbf{100\\%} see \\href{https://x.org/a\\%20b\\#c}{here}"
        );
    }

    #[test]
    fn test_lists() {
        let mut book = Book::new("");
        let bullet = Bullet::new("l", 0, false);
        book.push_paragraph(Paragraph::new(vec![Run::text("a")]).with_bullet(bullet.clone()));
        book.push_paragraph(Paragraph::new(vec![Run::text("b")]).with_bullet(bullet));

        assert_eq!(
            body(&book),
            "\\begin{itemize}\n  \\item a\n  \\item b\n\\end{itemize}"
        );
    }

    #[test]
    fn test_tabular() {
        let cell = |text: &str| {
            TableCell::new(vec![BodyElement::Paragraph(Paragraph::new(vec![Run::text(text)]))])
        };
        let mut book = Book::new("");
        book.push_table(Table::new(vec![
            TableRow::new(vec![cell("a"), cell("b")]),
            TableRow::new(vec![cell("c")]),
        ]));

        assert_eq!(
            body(&book),
            "\\begin{tabular}{|l|l|}\n\\hline\na & b \\\\\n\\hline\nc &  \\\\\n\\hline\n\\end{tabular}"
        );
    }

    #[test]
    fn test_image_link() {
        let mut book = Book::new("").with_inline_object("i", "https://x.org/i.png");
        book.push_paragraph(Paragraph::new(vec![Run::inline_object("i")]));

        assert_eq!(body(&book), "\\href{https://x.org/i.png}{[image]}");
    }
}
