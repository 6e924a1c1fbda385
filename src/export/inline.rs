//! Open-marker bookkeeping shared by the markup renderers.

use crate::style::Style;

/// An open formatting marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub style: Style,
    pub link: Option<String>,
}

/// Result of closing a marker: what to close (innermost first, target last)
/// and what to reopen afterwards (outermost first).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Closing {
    pub close: Vec<Marker>,
    pub reopen: Vec<Marker>,
}

/// Target syntax for formatting markers.
pub trait MarkerSyntax {
    fn open(&self, marker: &Marker, out: &mut String);
    fn close(&self, marker: &Marker, out: &mut String);
}

/// Stack of open formatting markers.
///
/// The event stream closes flags in precedence order, which is not always
/// the order they were opened in (`bold, +italic, -bold` leaves italic open
/// after bold closes). Markup syntaxes need strict nesting, so closing a
/// marker that is not on top closes everything above it first and reopens
/// those markers afterwards.
#[derive(Debug, Default)]
pub struct InlineStack {
    open: Vec<Marker>,
}

impl InlineStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, style: Style, link: Option<String>) {
        self.open.push(Marker { style, link });
    }

    /// Close the most recently opened marker for `style`.
    ///
    /// Closing a flag that is not open yields nothing.
    pub fn close(&mut self, style: Style) -> Closing {
        let Some(position) = self.open.iter().rposition(|m| m.style == style) else {
            return Closing::default();
        };

        let above = self.open.split_off(position);
        let reopen: Vec<Marker> = above[1..].to_vec();
        let close: Vec<Marker> = above.into_iter().rev().collect();
        self.open.extend(reopen.iter().cloned());

        Closing { close, reopen }
    }

    /// Open `style` and write its opening marker.
    pub fn start(
        &mut self,
        style: Style,
        link: Option<String>,
        syntax: &impl MarkerSyntax,
        out: &mut String,
    ) {
        let marker = Marker { style, link };
        syntax.open(&marker, out);
        self.open.push(marker);
    }

    /// Close `style`, repairing any markers opened inside it.
    pub fn end(&mut self, style: Style, syntax: &impl MarkerSyntax, out: &mut String) {
        let closing = self.close(style);
        for marker in &closing.close {
            syntax.close(marker, out);
        }
        for marker in &closing.reopen {
            syntax.open(marker, out);
        }
    }

    /// Close whatever is still open at a block boundary.
    pub fn finish(&mut self, syntax: &impl MarkerSyntax, out: &mut String) {
        for marker in self.drain() {
            syntax.close(&marker, out);
        }
    }

    /// Close everything, innermost first.
    pub fn drain(&mut self) -> Vec<Marker> {
        let mut open = std::mem::take(&mut self.open);
        open.reverse();
        open
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(style: Style) -> Marker {
        Marker { style, link: None }
    }

    #[test]
    fn test_close_top() {
        let mut stack = InlineStack::new();
        stack.push(Style::BOLD, None);
        stack.push(Style::ITALIC, None);

        let closing = stack.close(Style::ITALIC);
        assert_eq!(closing.close, vec![marker(Style::ITALIC)]);
        assert!(closing.reopen.is_empty());
    }

    #[test]
    fn test_close_buried_marker_reopens_inner() {
        let mut stack = InlineStack::new();
        stack.push(Style::BOLD, None);
        stack.push(Style::ITALIC, None);
        stack.push(Style::UNDERLINE, None);

        let closing = stack.close(Style::BOLD);
        assert_eq!(
            closing.close,
            vec![marker(Style::UNDERLINE), marker(Style::ITALIC), marker(Style::BOLD)]
        );
        assert_eq!(closing.reopen, vec![marker(Style::ITALIC), marker(Style::UNDERLINE)]);
        assert_eq!(stack.drain(), vec![marker(Style::UNDERLINE), marker(Style::ITALIC)]);
    }

    struct Tags;

    impl MarkerSyntax for Tags {
        fn open(&self, marker: &Marker, out: &mut String) {
            out.push_str(&format!("<{}>", marker.style));
        }

        fn close(&self, marker: &Marker, out: &mut String) {
            out.push_str(&format!("</{}>", marker.style));
        }
    }

    #[test]
    fn test_crossing_close_nests_properly() {
        let mut stack = InlineStack::new();
        let mut out = String::new();
        stack.start(Style::BOLD, None, &Tags, &mut out);
        out.push('a');
        stack.start(Style::ITALIC, None, &Tags, &mut out);
        out.push('b');
        stack.end(Style::BOLD, &Tags, &mut out);
        out.push('c');
        stack.finish(&Tags, &mut out);

        assert_eq!(out, "<bold>a<italic>b</italic></bold><italic>c</italic>");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_close_unknown_is_noop() {
        let mut stack = InlineStack::new();
        stack.push(Style::BOLD, None);
        assert_eq!(stack.close(Style::ITALIC), Closing::default());
        assert!(!stack.is_empty());
    }
}
