//! Bit-set of active inline formatting.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor};

use crate::model::TextStyle;

/// Active inline formatting as a set of single-bit flags.
///
/// The numeric bit positions carry no meaning beyond identity; nesting order
/// comes exclusively from [`PRECEDENCE`]. Subscript and superscript never
/// coexist: every constructor clears subscript when superscript is present.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style(u8);

impl Style {
    pub const EMPTY: Style = Style(0);
    pub const BOLD: Style = Style(1 << 0);
    pub const ITALIC: Style = Style(1 << 1);
    pub const UNDERLINE: Style = Style(1 << 2);
    pub const STRIKETHROUGH: Style = Style(1 << 3);
    pub const HIGHLIGHT: Style = Style(1 << 4);
    pub const SUBSCRIPT: Style = Style(1 << 5);
    pub const SUPERSCRIPT: Style = Style(1 << 6);
    pub const LINK: Style = Style(1 << 7);

    /// Build a style from raw bits, enforcing sub/superscript exclusivity.
    pub const fn from_bits(bits: u8) -> Style {
        if bits & Self::SUPERSCRIPT.0 != 0 {
            Style(bits & !Self::SUBSCRIPT.0)
        } else {
            Style(bits)
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every flag of `other` is set in `self`.
    pub const fn contains(self, other: Style) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Style) -> bool {
        self.0 & other.0 != 0
    }

    /// Number of flags set.
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn insert(&mut self, other: Style) {
        *self = Style::from_bits(self.0 | other.0);
    }

    pub fn remove(&mut self, other: Style) {
        self.0 &= !other.0;
    }

    /// Flags in precedence order, outermost first.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = Style> {
        PRECEDENCE.into_iter().filter(move |flag| self.contains(*flag))
    }

    /// Flags in reverse precedence order, innermost first.
    pub fn iter_rev(self) -> impl Iterator<Item = Style> {
        self.iter().rev()
    }

    /// Lowercase name of a single flag, `None` for empty or composite sets.
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Style::BOLD => "bold",
            Style::ITALIC => "italic",
            Style::UNDERLINE => "underline",
            Style::STRIKETHROUGH => "strikethrough",
            Style::HIGHLIGHT => "highlight",
            Style::SUBSCRIPT => "subscript",
            Style::SUPERSCRIPT => "superscript",
            Style::LINK => "link",
            _ => return None,
        })
    }

    /// Derive the active flags of a text run.
    pub fn of(text_style: &TextStyle) -> Style {
        let mut style = Style::EMPTY;
        if text_style.bold == Some(true) {
            style.insert(Style::BOLD);
        }
        if text_style.italic == Some(true) {
            style.insert(Style::ITALIC);
        }
        if text_style.underline == Some(true) {
            style.insert(Style::UNDERLINE);
        }
        if text_style.strikethrough == Some(true) {
            style.insert(Style::STRIKETHROUGH);
        }
        if text_style.highlight().is_some() {
            style.insert(Style::HIGHLIGHT);
        }
        if text_style.link_url().is_some() {
            style.insert(Style::LINK);
        }
        style.insert(baseline_shift(text_style.baseline_offset.as_deref()));
        style
    }
}

/// Canonical nesting order, outermost to innermost.
///
/// Every open/close sequence in the crate is derived from this table.
pub const PRECEDENCE: [Style; 8] = [
    Style::LINK,
    Style::BOLD,
    Style::ITALIC,
    Style::UNDERLINE,
    Style::STRIKETHROUGH,
    Style::HIGHLIGHT,
    Style::SUBSCRIPT,
    Style::SUPERSCRIPT,
];

/// Classify a free-text baseline offset as superscript or subscript.
///
/// Best-effort heuristic: any non-empty value other than `"0"` that does not
/// start with `-` is superscript; a leading `-` is subscript. The enumerated
/// tokens of the Docs API are mapped onto that numeric form first.
fn baseline_shift(offset: Option<&str>) -> Style {
    let Some(raw) = offset.map(str::trim) else {
        return Style::EMPTY;
    };
    let value = match raw {
        "SUPERSCRIPT" => "+",
        "SUBSCRIPT" => "-",
        "NONE" | "BASELINE_OFFSET_UNSPECIFIED" => "",
        other => other,
    };

    let superscript = !value.is_empty() && value != "0" && !value.starts_with('-');
    let subscript = value.starts_with('-');

    if superscript {
        Style::SUPERSCRIPT
    } else if subscript {
        Style::SUBSCRIPT
    } else {
        Style::EMPTY
    }
}

impl BitOr for Style {
    type Output = Style;

    fn bitor(self, rhs: Style) -> Style {
        Style::from_bits(self.0 | rhs.0)
    }
}

impl BitAnd for Style {
    type Output = Style;

    fn bitand(self, rhs: Style) -> Style {
        Style(self.0 & rhs.0)
    }
}

impl BitXor for Style {
    type Output = Style;

    fn bitxor(self, rhs: Style) -> Style {
        Style(self.0 ^ rhs.0)
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Style({self})")
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("plain");
        }
        let mut first = true;
        for flag in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            first = false;
            f.write_str(flag.name().unwrap_or("?"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Link, TextStyle};

    #[test]
    fn test_precedence_covers_every_flag_once() {
        let all = PRECEDENCE.iter().fold(0u8, |acc, flag| {
            assert_eq!(flag.len(), 1);
            assert_eq!(acc & flag.bits(), 0, "duplicate flag {flag}");
            acc | flag.bits()
        });
        assert_eq!(all, u8::MAX);
    }

    #[test]
    fn test_iter_follows_precedence_not_bits() {
        let style = Style::BOLD | Style::LINK | Style::HIGHLIGHT;
        let order: Vec<_> = style.iter().collect();
        assert_eq!(order, vec![Style::LINK, Style::BOLD, Style::HIGHLIGHT]);

        let reversed: Vec<_> = style.iter_rev().collect();
        assert_eq!(reversed, vec![Style::HIGHLIGHT, Style::BOLD, Style::LINK]);
    }

    #[test]
    fn test_superscript_wins_over_subscript() {
        let style = Style::SUBSCRIPT | Style::SUPERSCRIPT;
        assert!(style.contains(Style::SUPERSCRIPT));
        assert!(!style.contains(Style::SUBSCRIPT));

        let mut style = Style::SUPERSCRIPT;
        style.insert(Style::SUBSCRIPT);
        assert_eq!(style, Style::SUPERSCRIPT);

        assert_eq!(Style::from_bits(u8::MAX).len(), 7);
    }

    #[test]
    fn test_of_text_style() {
        let text_style = TextStyle {
            bold: Some(true),
            italic: Some(false),
            underline: None,
            background_color: Some("#ffff00".to_string()),
            link: Some(Link::new("https://example.com")),
            ..Default::default()
        };
        assert_eq!(
            Style::of(&text_style),
            Style::BOLD | Style::HIGHLIGHT | Style::LINK
        );
    }

    #[test]
    fn test_empty_link_and_color_are_absent() {
        let text_style = TextStyle {
            background_color: Some(String::new()),
            link: Some(Link::new("")),
            ..Default::default()
        };
        assert!(Style::of(&text_style).is_empty());
    }

    #[test]
    fn test_baseline_heuristic() {
        assert_eq!(baseline_shift(None), Style::EMPTY);
        assert_eq!(baseline_shift(Some("")), Style::EMPTY);
        assert_eq!(baseline_shift(Some("0")), Style::EMPTY);
        assert_eq!(baseline_shift(Some("NONE")), Style::EMPTY);
        assert_eq!(baseline_shift(Some("3")), Style::SUPERSCRIPT);
        assert_eq!(baseline_shift(Some("SUPERSCRIPT")), Style::SUPERSCRIPT);
        assert_eq!(baseline_shift(Some("-3")), Style::SUBSCRIPT);
        assert_eq!(baseline_shift(Some("SUBSCRIPT")), Style::SUBSCRIPT);
        // Free text falls into the superscript bucket
        assert_eq!(baseline_shift(Some("raised")), Style::SUPERSCRIPT);
    }

    #[test]
    fn test_display() {
        assert_eq!(Style::EMPTY.to_string(), "plain");
        assert_eq!((Style::ITALIC | Style::LINK).to_string(), "link|italic");
        assert_eq!(Style::BOLD.name(), Some("bold"));
        assert_eq!((Style::BOLD | Style::ITALIC).name(), None);
    }
}
