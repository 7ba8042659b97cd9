//! URL slug rules.
//!
//! Slugs are lowercase ASCII words separated by single hyphens, e.g.
//! `my-first-project`. They are used for category ids and for the public
//! lookup paths of projects and blog posts.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum slug length accepted by the API.
pub const MAX_SLUG_LENGTH: usize = 120;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

/// Whether `value` is a well-formed slug.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty() && value.len() <= MAX_SLUG_LENGTH && SLUG_PATTERN.is_match(value)
}

/// Derive a slug from free text (typically a title).
///
/// Non-alphanumeric runs collapse into a single hyphen; the result is
/// truncated to [`MAX_SLUG_LENGTH`] without leaving a trailing hyphen.
/// Returns an empty string when the input has no ASCII alphanumerics.
///
/// ```
/// use folio_core::slug::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Rust & Go  "), "rust-go");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}
