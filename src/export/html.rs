//! HTML renderer.
//!
//! The body markup is produced by [`HtmlBody`], which the EPUB renderer
//! reuses for its XHTML content document. All markup is written in the
//! XML-compatible subset of HTML5 (`<img .../>`, `<br/>`) so the same body
//! is valid in both.

use crate::events::Event;
use crate::style::Style;
use crate::Result;

use super::escape::escape_xml;
use super::inline::{InlineStack, Marker, MarkerSyntax};
use super::{Format, Renderer};

/// Configuration for HTML export.
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Wrap the body in a complete HTML5 document.
    pub standalone: bool,
    /// Value of the `lang` attribute on `<html>`.
    pub lang: String,
    /// Emit the document title as an `<h1>`.
    pub title_heading: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            lang: "en".to_string(),
            title_heading: true,
        }
    }
}

/// A heading seen while rendering, used for navigation documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeadingEntry {
    pub level: u8,
    pub text: String,
    pub anchor: String,
}

struct Tags;

impl MarkerSyntax for Tags {
    fn open(&self, marker: &Marker, out: &mut String) {
        match marker.style {
            Style::LINK => {
                out.push_str("<a href=\"");
                out.push_str(&escape_xml(marker.link.as_deref().unwrap_or("")));
                out.push_str("\">");
            }
            style => {
                if let Some(tag) = tag_name(style) {
                    out.push('<');
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
    }

    fn close(&self, marker: &Marker, out: &mut String) {
        if let Some(tag) = tag_name(marker.style) {
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn tag_name(style: Style) -> Option<&'static str> {
    Some(match style {
        Style::BOLD => "strong",
        Style::ITALIC => "em",
        Style::UNDERLINE => "u",
        Style::STRIKETHROUGH => "s",
        Style::HIGHLIGHT => "mark",
        Style::SUBSCRIPT => "sub",
        Style::SUPERSCRIPT => "sup",
        Style::LINK => "a",
        _ => return None,
    })
}

/// Body markup writer shared by the HTML and EPUB renderers.
#[derive(Debug, Default)]
pub(crate) struct HtmlBody {
    pub title: String,
    pub headings: Vec<HeadingEntry>,
    out: String,
    markers: InlineStack,
    in_list: bool,
}

impl HtmlBody {
    pub fn markup(&self) -> &str {
        &self.out
    }

    pub fn handle(&mut self, event: &Event) {
        let out = &mut self.out;
        match event {
            Event::StartDoc { title } => self.title = title.clone(),
            Event::EndDoc { .. } => {}
            Event::StartHeading {
                level,
                text,
                anchor,
            } => {
                let level = (*level).clamp(1, 6);
                if anchor.is_empty() {
                    out.push_str(&format!("<h{level}>"));
                } else {
                    out.push_str(&format!("<h{level} id=\"{}\">", escape_xml(anchor)));
                }
                out.push_str(&escape_xml(text));
                out.push_str(&format!("</h{level}>\n"));
                self.headings.push(HeadingEntry {
                    level,
                    text: text.clone(),
                    anchor: anchor.clone(),
                });
            }
            Event::EndHeading { .. } => {}
            Event::StartList { ordered, .. } => {
                out.push_str(if *ordered { "<ol>\n" } else { "<ul>\n" });
                self.in_list = true;
            }
            Event::EndList { ordered, .. } => {
                out.push_str(if *ordered { "</ol>\n" } else { "</ul>\n" });
                self.in_list = false;
            }
            Event::StartParagraph => {
                out.push_str(if self.in_list { "<li>" } else { "<p>" });
            }
            Event::EndParagraph => {
                self.markers.finish(&Tags, out);
                out.push_str(if self.in_list { "</li>\n" } else { "</p>\n" });
            }
            Event::StartTable { .. } => out.push_str("<table>\n"),
            Event::EndTable { .. } => out.push_str("</table>\n"),
            Event::StartTableRow => out.push_str("<tr>\n"),
            Event::EndTableRow => out.push_str("</tr>\n"),
            Event::StartTableCell => {
                out.push_str("<td>\n");
                self.in_list = false;
            }
            Event::EndTableCell => {
                out.push_str("</td>\n");
                self.in_list = false;
            }
            Event::StartFormatting { style, link } => {
                self.markers.start(*style, link.clone(), &Tags, out);
            }
            Event::EndFormatting { style, .. } => self.markers.end(*style, &Tags, out),
            Event::Text(text) => {
                for (i, line) in text.split('\u{000b}').enumerate() {
                    if i > 0 {
                        out.push_str("<br/>");
                    }
                    out.push_str(&escape_xml(line));
                }
            }
            Event::Image { url, alt } => {
                out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\"/>",
                    escape_xml(url),
                    escape_xml(alt)
                ));
            }
        }
    }
}

/// Renderer for HTML output.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    config: HtmlConfig,
    body: HtmlBody,
}

impl HtmlRenderer {
    /// Create a new HtmlRenderer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an HtmlRenderer with the specified configuration.
    pub fn with_config(config: HtmlConfig) -> Self {
        Self {
            config,
            body: HtmlBody::default(),
        }
    }
}

impl Renderer for HtmlRenderer {
    fn format(&self) -> Format {
        Format::Html
    }

    fn handle(&mut self, event: &Event) {
        self.body.handle(event);
    }

    fn result(&mut self) -> Result<Vec<u8>> {
        let title = escape_xml(&self.body.title);
        let mut out = String::with_capacity(self.body.markup().len() + 256);

        if self.config.standalone {
            out.push_str("<!DOCTYPE html>\n");
            out.push_str(&format!(
                "<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\"/>\n<title>{title}</title>\n</head>\n<body>\n",
                escape_xml(&self.config.lang)
            ));
        }
        if self.config.title_heading && !title.trim().is_empty() {
            out.push_str(&format!("<h1>{title}</h1>\n"));
        }
        out.push_str(self.body.markup());
        if self.config.standalone {
            out.push_str("</body>\n</html>\n");
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

    fn fragment(book: &Book) -> String {
        let mut renderer = HtmlRenderer::with_config(HtmlConfig {
            standalone: false,
            title_heading: false,
            ..HtmlConfig::default()
        });
        for event in EventStream::new(book) {
            renderer.handle(&event);
        }
        String::from_utf8(renderer.result().unwrap()).unwrap()
    }

    #[test]
    fn test_standalone_document() {
        let mut book = Book::new("A & B");
        book.push_paragraph(Paragraph::new(vec![Run::text("x < y")]));

        let mut renderer = HtmlRenderer::new();
        for event in EventStream::new(&book) {
            renderer.handle(&event);
        }
        let html = String::from_utf8(renderer.result().unwrap()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("<h1>A &amp; B</h1>\n<p>x &lt; y</p>\n"));
        assert!(html.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn test_heading_with_anchor() {
        let mut book = Book::new("");
        book.push_paragraph(
            Paragraph::new(vec![Run::text("Getting Started")])
                .with_named_style(NamedStyle::Heading2),
        );

        assert_eq!(
            fragment(&book),
            "<h3 id=\"getting-started\">Getting Started</h3>\n"
        );
    }

    #[test]
    fn test_inline_formatting() {
        let mut book = Book::new("");
        book.push_paragraph(Paragraph::new(vec![
            Run::text("a "),
            Run::styled("b", TextStyle::bold()),
            Run::styled("c", TextStyle::linked("https://x.org/?a=1&b=2")),
        ]));

        assert_eq!(
            fragment(&book),
            "<p>a <strong>b</strong><a href=\"https://x.org/?a=1&amp;b=2\">c</a></p>\n"
        );
    }

    #[test]
    fn test_list_items() {
        let mut book = Book::new("");
        let bullet = Bullet::new("l", 0, true);
        book.push_paragraph(Paragraph::new(vec![Run::text("one")]).with_bullet(bullet.clone()));
        book.push_paragraph(Paragraph::new(vec![Run::text("two")]).with_bullet(bullet));

        assert_eq!(fragment(&book), "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n");
    }

    #[test]
    fn test_table_and_image() {
        let book = {
            let mut book = Book::new("").with_inline_object("i", "https://x.org/a.png");
            book.push_table(Table::new(vec![TableRow::new(vec![TableCell::new(vec![
                BodyElement::Paragraph(Paragraph::new(vec![Run::inline_object("i")])),
            ])])]));
            book
        };

        assert_eq!(
            fragment(&book),
            "<table>\n<tr>\n<td>\n<p><img src=\"https://x.org/a.png\" alt=\"image\"/></p>\n</td>\n</tr>\n</table>\n"
        );
    }

    #[test]
    fn test_vertical_tab_is_line_break() {
        let mut book = Book::new("");
        book.push_paragraph(Paragraph::new(vec![Run::text("a\u{000b}b")]));

        assert_eq!(fragment(&book), "<p>a<br/>b</p>\n");
    }
}
