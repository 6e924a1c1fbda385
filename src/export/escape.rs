//! Pure text escaping for each output syntax.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Escape special Markdown characters in text.
///
/// Escapes characters that have special meaning in Markdown:
/// - Backslash: `\\`
/// - Emphasis and strikethrough: `*`, `_`, `~`
/// - Links: `[`, `]`
/// - Code: `` ` ``
/// - Headings: `#` (only at line start)
/// - Tables: `|`
/// - HTML: `<`, `>`
/// - Images: `!` (when followed by `[`)
///
/// # Examples
///
/// ```
/// use docstream::export::escape_markdown;
///
/// assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
/// assert_eq!(escape_markdown("[link]"), "\\[link\\]");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    let mut chars = text.chars().peekable();
    let mut at_line_start = true;

    while let Some(c) = chars.next() {
        match c {
            '\\' => result.push_str("\\\\"),
            '*' | '_' | '~' | '[' | ']' | '`' | '|' | '<' | '>' => {
                result.push('\\');
                result.push(c);
            }
            '#' if at_line_start => {
                result.push('\\');
                result.push(c);
            }
            '!' if chars.peek() == Some(&'[') => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
        at_line_start = c == '\n';
    }

    result
}

/// Escape text for XML and HTML content and attribute values.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Escape LaTeX special characters in running text.
///
/// # Examples
///
/// ```
/// use docstream::export::escape_latex;
///
/// assert_eq!(escape_latex("50% & more"), "50\\% \\& more");
/// ```
pub fn escape_latex(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\textbackslash{}"),
            '~' => result.push_str("\\textasciitilde{}"),
            '^' => result.push_str("\\textasciicircum{}"),
            '{' | '}' | '$' | '&' | '#' | '%' | '_' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

/// Characters that must not appear raw inside `\href{...}`.
const LATEX_URL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\\')
    .add(b'{')
    .add(b'}')
    .add(b'^')
    .add(b'`')
    .add(b'<')
    .add(b'>');

/// Prepare a URL for `\href`: percent-encode what LaTeX cannot carry and
/// backslash-escape the characters hyperref reads specially.
pub fn escape_latex_url(url: &str) -> String {
    let encoded = utf8_percent_encode(url, LATEX_URL).to_string();
    let mut result = String::with_capacity(encoded.len());
    for c in encoded.chars() {
        if matches!(c, '#' | '%') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
