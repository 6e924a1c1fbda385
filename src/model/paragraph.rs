//! Paragraphs and the runs they are made of.

use super::TextStyle;

/// Named paragraph style, as assigned by the authoring tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamedStyle {
    #[default]
    NormalText,
    Title,
    Subtitle,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
}

impl NamedStyle {
    /// Parse the upstream style token (`HEADING_1`, `NORMAL_TEXT`, ...).
    ///
    /// Unknown tokens fall back to normal text.
    pub fn parse(token: &str) -> Self {
        match token {
            "TITLE" => NamedStyle::Title,
            "SUBTITLE" => NamedStyle::Subtitle,
            "HEADING_1" => NamedStyle::Heading1,
            "HEADING_2" => NamedStyle::Heading2,
            "HEADING_3" => NamedStyle::Heading3,
            "HEADING_4" => NamedStyle::Heading4,
            "HEADING_5" => NamedStyle::Heading5,
            "HEADING_6" => NamedStyle::Heading6,
            _ => NamedStyle::NormalText,
        }
    }

    /// The upstream token for this style.
    pub fn as_str(self) -> &'static str {
        match self {
            NamedStyle::NormalText => "NORMAL_TEXT",
            NamedStyle::Title => "TITLE",
            NamedStyle::Subtitle => "SUBTITLE",
            NamedStyle::Heading1 => "HEADING_1",
            NamedStyle::Heading2 => "HEADING_2",
            NamedStyle::Heading3 => "HEADING_3",
            NamedStyle::Heading4 => "HEADING_4",
            NamedStyle::Heading5 => "HEADING_5",
            NamedStyle::Heading6 => "HEADING_6",
        }
    }

    /// Whether paragraphs with this style are emitted as headings.
    pub fn is_heading(self) -> bool {
        !matches!(self, NamedStyle::NormalText)
    }

    /// Output heading level for this style.
    ///
    /// Level 1 is reserved for the document title, so `HEADING_1` maps to 2
    /// and everything deeper is shifted down by one, saturating at 6. Styles
    /// without a natural depth (title, subtitle) use 2.
    pub fn heading_level(self) -> u8 {
        match self {
            NamedStyle::Heading1 => 2,
            NamedStyle::Heading2 => 3,
            NamedStyle::Heading3 => 4,
            NamedStyle::Heading4 => 5,
            NamedStyle::Heading5 | NamedStyle::Heading6 => 6,
            _ => 2,
        }
    }
}

/// List membership of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Bullet {
    pub list_id: String,
    pub nesting_level: u32,
    /// Numbered (`1.`) rather than glyph (`•`) list.
    pub ordered: bool,
}

impl Bullet {
    pub fn new(list_id: impl Into<String>, nesting_level: u32, ordered: bool) -> Self {
        Self {
            list_id: list_id.into(),
            nesting_level,
            ordered,
        }
    }
}

/// Reference to an embedded object (image) stored outside the body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct InlineObjectRef {
    pub inline_object_id: String,
}

/// A span of text sharing one style.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct TextRun {
    pub content: String,
    pub text_style: TextStyle,
}

/// One element of a paragraph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum Run {
    TextRun(TextRun),
    InlineObjectElement(InlineObjectRef),
    PageBreak,
    HorizontalRule,
}

impl Run {
    /// An unstyled text run.
    pub fn text(content: impl Into<String>) -> Self {
        Run::TextRun(TextRun {
            content: content.into(),
            text_style: TextStyle::default(),
        })
    }

    /// A text run with the given style.
    pub fn styled(content: impl Into<String>, text_style: TextStyle) -> Self {
        Run::TextRun(TextRun {
            content: content.into(),
            text_style,
        })
    }

    /// A reference to an inline object.
    pub fn inline_object(id: impl Into<String>) -> Self {
        Run::InlineObjectElement(InlineObjectRef {
            inline_object_id: id.into(),
        })
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Run::TextRun(run) => Some(run),
            _ => None,
        }
    }
}

/// A paragraph: a named style, optional heading/list attachment, and runs.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Paragraph {
    /// Upstream named style token (`NORMAL_TEXT`, `HEADING_2`, ...).
    pub named_style_type: String,
    /// Stable heading id, present on heading paragraphs.
    pub heading_id: Option<String>,
    pub bullet: Option<Bullet>,
    pub elements: Vec<Run>,
}

impl Paragraph {
    pub fn new(elements: Vec<Run>) -> Self {
        Self {
            elements,
            ..Default::default()
        }
    }

    pub fn with_named_style(mut self, style: NamedStyle) -> Self {
        self.named_style_type = style.as_str().to_string();
        self
    }

    pub fn with_heading_id(mut self, id: impl Into<String>) -> Self {
        self.heading_id = Some(id.into());
        self
    }

    pub fn with_bullet(mut self, bullet: Bullet) -> Self {
        self.bullet = Some(bullet);
        self
    }

    pub fn named_style(&self) -> NamedStyle {
        NamedStyle::parse(&self.named_style_type)
    }

    /// Concatenated text of all text runs, trimmed of surrounding whitespace
    /// (including the trailing newline every upstream paragraph carries).
    pub fn plain_text(&self) -> String {
        let text: String = self
            .elements
            .iter()
            .filter_map(Run::as_text)
            .map(|run| run.content.as_str())
            .collect();
        text.trim().to_string()
    }

    /// Whether any text run has non-whitespace content.
    pub fn has_text(&self) -> bool {
        self.elements
            .iter()
            .filter_map(Run::as_text)
            .any(|run| !run.content.trim().is_empty())
    }

    pub fn has_inline_objects(&self) -> bool {
        self.elements
            .iter()
            .any(|run| matches!(run, Run::InlineObjectElement(_)))
    }
}
