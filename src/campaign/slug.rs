//! Derives URL-safe slugs for campaigns.

use crate::UserID;

/// The slug for a campaign named `name` owned by `user_id`.
///
/// The owner's ID is appended to the name before slugifying, e.g. "Build a Well" owned by user 7
/// becomes "build-a-well-7". Slugs are recomputed on every write and are not guaranteed to be
/// unique.
pub fn campaign_slug(name: &str, user_id: UserID) -> String {
    slugify(&format!("{name} {user_id}"))
}

/// Convert `text` into a lowercase, ASCII, hyphen separated string.
///
/// Quote marks are dropped, `&` and `@` are spelled out, and other characters are transliterated
/// to ASCII before every run of non-alphanumeric characters is replaced with a single hyphen.
/// Leading and trailing hyphens are removed, so text without any letters or digits produces an
/// empty string.
pub fn slugify(text: &str) -> String {
    let mut substituted = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\'' | '"' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' => {}
            '&' => substituted.push_str(" and "),
            '@' => substituted.push_str(" at "),
            c => substituted.push(c),
        }
    }

    let ascii = deunicode::deunicode(&substituted).to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}
