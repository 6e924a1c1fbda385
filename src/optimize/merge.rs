//! Run consolidation (adjacent text-run coalescing).

use crate::model::{Paragraph, Run, TextRun, TextStyle};

use super::predicates::{
    decorations_match, fonts_compatible, has_formatting, links_compatible, same_toggles,
};

/// Merge adjacent, style-compatible text runs of a paragraph in place.
///
/// Google Docs regularly splits one logically uniform span into several
/// runs: a bold term typed with a dead key, a Greek letter followed by a
/// digit, a word corrected mid-way. Rendered naively this produces
///
/// ```text
/// **β****1****-receptoren **
/// ```
///
/// After consolidation the span is a single run and renders as
///
/// ```text
/// **β1-receptoren **
/// ```
///
/// Single forward pass with an accumulator. Runs are never reordered and the
/// concatenated text is unchanged; only run boundaries move. Non-text runs
/// (inline objects, page breaks) pass through and close the accumulator on
/// both sides.
///
/// Returns the number of runs removed.
pub fn consolidate_runs(paragraph: &mut Paragraph) -> usize {
    let runs = std::mem::take(&mut paragraph.elements);
    let before = runs.len();
    let mut merged: Vec<Run> = Vec::with_capacity(before);
    let mut pending: Option<TextRun> = None;

    for run in runs {
        match run {
            Run::TextRun(next) => {
                let mergeable = pending
                    .as_ref()
                    .is_some_and(|current| can_merge(&current.text_style, &next.text_style));

                if mergeable {
                    if let Some(current) = pending.as_mut() {
                        absorb(current, next);
                    }
                } else if let Some(done) = pending.replace(next) {
                    merged.push(Run::TextRun(done));
                }
            }
            other => {
                if let Some(done) = pending.take() {
                    merged.push(Run::TextRun(done));
                }
                merged.push(other);
            }
        }
    }

    if let Some(done) = pending {
        merged.push(Run::TextRun(done));
    }

    let removed = before - merged.len();
    paragraph.elements = merged;
    removed
}

/// Check if two adjacent text runs render identically and may be joined.
fn can_merge(left: &TextStyle, right: &TextStyle) -> bool {
    has_formatting(left)
        && has_formatting(right)
        && same_toggles(left, right)
        && fonts_compatible(left, right)
        && links_compatible(left, right)
        && decorations_match(left, right)
}

/// Append `next` to `current`, keeping whichever font metadata is present.
fn absorb(current: &mut TextRun, next: TextRun) {
    current.content.push_str(&next.content);

    let style = &mut current.text_style;
    if style.font_size.is_none() {
        style.font_size = next.text_style.font_size;
    }
    if style.weighted_font_family.is_none() {
        style.weighted_font_family = next.text_style.weighted_font_family;
    }
}
