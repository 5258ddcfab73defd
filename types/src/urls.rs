//! URL location in free text.
//!
//! The pattern is the classic cassis web-address matcher, minus the `@name`
//! handling: it recognises `http`, `https` and `irc` schemes, bare domains with
//! a known top-level domain, and dotted-quad IPv4 addresses, each optionally
//! followed by a port and a path.
//!
//! `regex` has no look-around, so the trailing `(?=\b|\s|$)` assertion of the
//! cassis pattern is applied after matching: a candidate that does not end on
//! a settle point is shortened to the longest prefix that still matches the
//! whole pattern and does.

use std::sync::OnceLock;

use regex::Regex;

const TLD: &str = concat!(
    "(?:(?:aero|arpa|asia|a[cdefgilmnoqrstuwxz])|(?:biz|b[abdefghijmnorstvwyz])",
    "|(?:cat|com|coop|c[acdfghiklmnoruvxyz])|d[ejkmoz]|(?:edu|e[cegrstu])|f[ijkmor]",
    "|(?:gov|g[abdefghilmnpqrstuwy])|h[kmnrtu]|(?:info|int|i[delmnoqrst])|j[emop]",
    "|k[eghimnrwyz]|l[abcikrstuvy]|(?:mil|museum|m[acdeghklmnopqrstuvwxyz])",
    "|(?:name|net|n[acefgilopruz])|(?:org|om)|(?:pro|p[aefghklmnrstwy])|qa|r[eouw]",
    "|s[abcdeghijklmnortuvyz]|(?:tel|travel|t[cdfghjklmnoprtvwz])|u[agkmsyz]",
    "|v[aceginu]|w[fs]|y[etu]|z[amw])",
);

const FIRST_OCTET: &str = "(?:25[0-5]|2[0-4][0-9]|[0-1][0-9]{2}|[1-9][0-9]|[1-9])";
const OCTET: &str = "(?:25[0-5]|2[0-4][0-9]|[0-1][0-9]{2}|[1-9][0-9]|[0-9])";
const USER_CHAR: &str = "(?:[!$&-.0-9;=?A-Z_a-z]|%[a-fA-F0-9]{2})";
const PATH_CHAR: &str = "(?:[!#&-;=?-Z_a-z~]|%[a-fA-F0-9]{2})";

fn url_pattern() -> String {
    format!(
        "(?:(?:(?:http|https|irc)?://(?:{USER_CHAR}+(?::{USER_CHAR}+)?@)?)?\
         (?:(?:(?:[a-zA-Z0-9][-a-zA-Z0-9]*\\.)+{TLD})\
         |(?:{FIRST_OCTET}\\.{OCTET}\\.{OCTET}\\.{OCTET}))\
         (?::[0-9]{{1,5}})?)\
         (?:/{PATH_CHAR}*)?"
    )
}

struct UrlMatchers {
    /// Unanchored, used to find candidate starts.
    search: Regex,
    /// Anchored at both ends, used to validate shortened candidates.
    exact: Regex,
}

fn matchers() -> &'static UrlMatchers {
    static MATCHERS: OnceLock<UrlMatchers> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        let pattern = url_pattern();
        UrlMatchers {
            search: Regex::new(&pattern).expect("valid URL search regex"),
            exact: Regex::new(&format!("^(?:{pattern})$")).expect("valid anchored URL regex"),
        }
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether a URL may end at byte offset `end` of `text`: at end of text,
/// before whitespace, or on a word boundary.
fn is_settle_point(text: &str, end: usize) -> bool {
    let Some(next) = text[end..].chars().next() else {
        return true;
    };
    if next.is_whitespace() {
        return true;
    }
    let prev_is_word = text[..end].chars().next_back().is_some_and(is_word_char);
    prev_is_word != is_word_char(next)
}

/// Longest end offset in `(start, max_end]` that is a settle point and whose
/// slice is a complete URL.
fn settle_end(text: &str, start: usize, max_end: usize, exact: &Regex) -> Option<usize> {
    text[start..max_end]
        .char_indices()
        .map(|(offset, c)| start + offset + c.len_utf8())
        .rev()
        .find(|&end| is_settle_point(text, end) && exact.is_match(&text[start..end]))
}

/// Find URLs exactly as they appear in `text`.
///
/// Results are distinct and in order of first appearance.
#[must_use]
pub fn find_urls_raw(text: &str) -> Vec<String> {
    let UrlMatchers { search, exact } = matchers();
    let mut found: Vec<String> = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let Some(candidate) = search.find_at(text, pos) else {
            break;
        };
        let start = candidate.start();
        match settle_end(text, start, candidate.end(), exact) {
            Some(end) => {
                let url = &text[start..end];
                if !found.iter().any(|existing| existing == url) {
                    found.push(url.to_string());
                }
                pos = end;
            }
            None => {
                // No valid URL starts here; retry from the next character.
                pos = start + text[start..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    found
}

/// Find URLs in `text`, synthesising an `http://` scheme where none is given.
#[must_use]
pub fn find_urls(text: &str) -> Vec<String> {
    find_urls_raw(text).into_iter().map(tidy_url).collect()
}

fn tidy_url(raw: String) -> String {
    if raw.contains("://") {
        if raw.starts_with("://") {
            return format!("http{raw}");
        }
        return raw;
    }
    format!("http://{raw}")
}

/// Character length of `text` with every located URL counted as `uri_len`
/// characters. Without `uri_len` this is the plain character count.
#[must_use]
pub fn normalized_len(text: &str, uri_len: Option<usize>) -> usize {
    let total = text.chars().count();
    let Some(uri_len) = uri_len else {
        return total;
    };

    // Replacement is sequential so overlapping URLs behave like repeated
    // substring substitution.
    let mut working = text.to_string();
    let filler = "X".repeat(uri_len);
    for url in find_urls_raw(text) {
        working = working.replace(&url, &filler);
    }
    working.chars().count()
}

#[cfg(test)]
mod tests {
    use super::{find_urls, find_urls_raw, normalized_len};

    #[test]
    fn finds_scheme_and_bare_domains() {
        let text = "Here is some text with a URI in: http://example.com and one without a protocol: example.org long";
        assert_eq!(find_urls_raw(text), vec!["http://example.com", "example.org"]);
    }

    #[test]
    fn tidy_adds_http_scheme() {
        assert_eq!(
            find_urls("see waterpigs.co.uk/notes/254 now"),
            vec!["http://waterpigs.co.uk/notes/254"]
        );
    }

    #[test]
    fn tidy_keeps_existing_scheme() {
        assert_eq!(
            find_urls("https://twitter.com/BarnabyWalters/status/254199790307524610"),
            vec!["https://twitter.com/BarnabyWalters/status/254199790307524610"]
        );
    }

    #[test]
    fn finds_irc_and_ipv4() {
        assert_eq!(
            find_urls_raw("join irc://irc.freenode.net/indieweb or ip 192.168.0.1:8080/x today"),
            vec!["irc://irc.freenode.net/indieweb", "192.168.0.1:8080/x"]
        );
    }

    #[test]
    fn unknown_tld_is_not_a_url() {
        assert!(find_urls_raw("see example.community now").is_empty());
        assert!(find_urls_raw("no urls here at all").is_empty());
    }

    #[test]
    fn shortens_to_settle_point() {
        // A trailing slash followed by a quote is not a boundary, so the
        // match backs off to the last word character.
        assert_eq!(find_urls_raw("a \"http://x.com/a/\" b"), vec!["http://x.com/a"]);
    }

    #[test]
    fn keeps_trailing_path_punctuation() {
        assert_eq!(
            find_urls_raw("go to waterpigs.co.uk/notes/254."),
            vec!["waterpigs.co.uk/notes/254."]
        );
    }

    #[test]
    fn results_are_distinct() {
        assert_eq!(find_urls_raw("x.com and x.com"), vec!["x.com"]);
    }

    #[test]
    fn non_ascii_text_is_skipped_safely() {
        assert_eq!(
            find_urls_raw("café… ünïcödé example.org ✓"),
            vec!["example.org"]
        );
    }

    #[test]
    fn normalized_len_counts_urls_as_fixed_width() {
        let text = "read http://example.org/notes/14 now";
        assert_eq!(normalized_len(text, None), 36);
        assert_eq!(normalized_len(text, Some(20)), 5 + 20 + 4);
    }

    #[test]
    fn normalized_len_counts_characters_not_bytes() {
        assert_eq!(normalized_len("…é", None), 2);
        assert_eq!(normalized_len("… http://example.org/notes/14", Some(22)), 24);
    }
}
