//! Style transitions between adjacent runs.

use super::Style;

/// Ordered formatting transitions: flags to close, then flags to open.
///
/// `close` is innermost-first, `open` is outermost-first, so applying both
/// keeps markers properly stacked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleDiff {
    pub close: Vec<Style>,
    pub open: Vec<Style>,
}

impl StyleDiff {
    pub fn is_empty(&self) -> bool {
        self.close.is_empty() && self.open.is_empty()
    }

    fn rebuild(current: Style, next: Style) -> Self {
        Self {
            close: current.iter_rev().collect(),
            open: next.iter().collect(),
        }
    }
}

/// Compute the transitions needed to go from `current` to `next`.
///
/// Link is the outermost marker, so a change of the link flag invalidates
/// everything nested inside it: in that case every open flag is closed and
/// every flag of `next` is reopened, whether or not its own bit changed.
pub fn diff(current: Style, next: Style) -> StyleDiff {
    if current.contains(Style::LINK) != next.contains(Style::LINK) {
        return StyleDiff::rebuild(current, next);
    }

    let changed = current ^ next;
    StyleDiff {
        close: (current & changed).iter_rev().collect(),
        open: (next & changed).iter().collect(),
    }
}

/// Transitions for two linked runs pointing at different targets.
///
/// The link bit is set on both sides, so [`diff`] would see no change to it;
/// the old link still has to be closed and the new one opened around the
/// whole stack.
pub fn relink(current: Style, next: Style) -> StyleDiff {
    StyleDiff::rebuild(current, next)
}

/// Flags to close at the end of a block, innermost first.
pub fn close_all(current: Style) -> Vec<Style> {
    current.iter_rev().collect()
}
