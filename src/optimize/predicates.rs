//! Shared predicates for optimization passes.

use crate::model::TextStyle;
use crate::style::Style;

/// Check whether a run carries any inline formatting at all.
///
/// Bare runs never take part in merging: they produce no formatting events,
/// so joining them gains nothing and would blur boundaries the author chose.
pub fn has_formatting(style: &TextStyle) -> bool {
    !Style::of(style).is_empty()
}

/// Check if the boolean toggles match, treating unset as false.
pub fn same_toggles(left: &TextStyle, right: &TextStyle) -> bool {
    let flag = |value: Option<bool>| value.unwrap_or(false);
    flag(left.bold) == flag(right.bold)
        && flag(left.italic) == flag(right.italic)
        && flag(left.underline) == flag(right.underline)
        && flag(left.strikethrough) == flag(right.strikethrough)
}

/// Two optional values are compatible when either side is absent or both
/// are equal; an absent side inherits the other.
pub fn inheritable<T: PartialEq>(left: Option<&T>, right: Option<&T>) -> bool {
    match (left, right) {
        (Some(l), Some(r)) => l == r,
        _ => true,
    }
}

/// Font size and family must agree, or be absent on one side.
pub fn fonts_compatible(left: &TextStyle, right: &TextStyle) -> bool {
    inheritable(left.font_size.as_ref(), right.font_size.as_ref())
        && inheritable(
            left.weighted_font_family.as_ref(),
            right.weighted_font_family.as_ref(),
        )
}

/// Link presence is part of the key: both unlinked, or both to the same URL.
pub fn links_compatible(left: &TextStyle, right: &TextStyle) -> bool {
    left.link_url() == right.link_url()
}

/// Formatting rendered from non-toggle fields must match exactly.
pub fn decorations_match(left: &TextStyle, right: &TextStyle) -> bool {
    left.highlight() == right.highlight() && Style::of(left) == Style::of(right)
}
