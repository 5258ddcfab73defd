//! Small pure text helpers.

use unicode_normalization::UnicodeNormalization;

fn is_separator(c: char) -> bool {
    matches!(c, '/' | '_' | '|' | '+' | ' ' | '-')
}

/// Turn arbitrary text into a URL-safe ASCII slug.
///
/// - Every string in `replace` is first turned into a space.
/// - Accents are stripped by NFKD decomposition; other non-ASCII is dropped.
/// - Runs of `/ _ | + space -` collapse into one `delimiter`, never at either end.
#[must_use]
pub fn slugify(text: &str, replace: &[&str], delimiter: &str) -> String {
    let mut source = text.to_string();
    for pattern in replace.iter().filter(|p| !p.is_empty()) {
        source = source.replace(pattern, " ");
    }

    let mut slug = String::with_capacity(source.len());
    let mut pending_delimiter = false;

    for c in source.as_str().nfkd().filter(char::is_ascii) {
        if is_separator(c) {
            pending_delimiter = true;
        } else if c.is_ascii_alphanumeric() {
            if pending_delimiter && !slug.is_empty() {
                slug.push_str(delimiter);
            }
            pending_delimiter = false;
            slug.push(c.to_ascii_lowercase());
        }
    }

    slug
}
