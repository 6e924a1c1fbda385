//! Character-level formatting attached to text runs.

/// A length with a unit, as found on font sizes (`{ "magnitude": 10, "unit": "PT" }`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: String,
}

impl Dimension {
    /// A size in points.
    pub fn pt(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: "PT".to_string(),
        }
    }
}

/// A font family together with its weight (400 normal, 700 bold).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct WeightedFontFamily {
    pub font_family: String,
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: u16,
}

#[cfg(feature = "serde")]
fn default_weight() -> u16 {
    400
}

impl WeightedFontFamily {
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
            weight: 400,
        }
    }
}

/// Hyperlink target of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Link {
    pub url: String,
}

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Formatting of a text run.
///
/// Boolean properties are tri-state: `None` means "not set on this run" and
/// is treated the same as `Some(false)` everywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct TextStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    /// Background color as written upstream (any non-empty value highlights).
    pub background_color: Option<String>,
    /// Free-text baseline offset (`SUPERSCRIPT`, `SUBSCRIPT`, `NONE`, or a
    /// numeric shift such as `"3"` / `"-3"`).
    pub baseline_offset: Option<String>,
    pub font_size: Option<Dimension>,
    pub weighted_font_family: Option<WeightedFontFamily>,
    pub link: Option<Link>,
}

impl TextStyle {
    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: Some(true),
            ..Default::default()
        }
    }

    pub fn linked(url: impl Into<String>) -> Self {
        Self {
            link: Some(Link::new(url)),
            ..Default::default()
        }
    }

    pub fn with_font_size(mut self, size: Dimension) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.weighted_font_family = Some(WeightedFontFamily::new(family));
        self
    }

    /// The link URL, if the run carries a non-empty one.
    pub fn link_url(&self) -> Option<&str> {
        self.link
            .as_ref()
            .map(|link| link.url.as_str())
            .filter(|url| !url.is_empty())
    }

    /// Background color, ignoring empty strings.
    pub fn highlight(&self) -> Option<&str> {
        self.background_color
            .as_deref()
            .filter(|color| !color.is_empty())
    }
}
