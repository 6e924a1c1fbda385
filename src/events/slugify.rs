//! Anchor id generation for headings.

/// Generate an anchor id from heading text.
///
/// Lowercases the text, turns spaces and path separators (`/`, `\`) into
/// hyphens, spells `&` as `and`, and drops `:?!()`. Everything else,
/// including non-ASCII letters, is kept so anchors stay readable for
/// non-English titles. Runs of hyphens are not collapsed: anchors are
/// stable identifiers and must not shift when the title's spacing does.
///
/// # Examples
///
/// ```
/// use docstream::events::slugify;
///
/// assert_eq!(slugify("Chapter One"), "chapter-one");
/// assert_eq!(slugify("Q&A: Why?"), "qanda-why");
/// assert_eq!(slugify("In/Out"), "in-out");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' | '/' | '\\' => slug.push('-'),
            ':' | '?' | '!' | '(' | ')' => {}
            '&' => slug.push_str("and"),
            _ => slug.extend(c.to_lowercase()),
        }
    }
    slug
}
