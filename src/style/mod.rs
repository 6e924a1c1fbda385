//! Inline formatting model and the style-diff engine.
//!
//! - [`Style`]: bit-set of the eight inline formatting flags
//! - [`PRECEDENCE`]: the fixed outermost-to-innermost nesting order
//! - [`diff`]: the ordered close/open transitions between two styles
//!
//! ## Nesting
//!
//! Markers nest in precedence order: a link wraps bold, bold wraps italic, and
//! so on down to sub/superscript. Closing always happens innermost-first and
//! opening outermost-first, which is what lets renderers map the event stream
//! onto properly nested markup.

mod diff;
mod flags;

pub use diff::{StyleDiff, close_all, diff, relink};
pub use flags::{PRECEDENCE, Style};
