//! THE TRUNCENATOR.
//!
//! Fits a note plus an optional canonical URI into a character budget,
//! cutting only at word boundaries. Embedded URLs can be budgeted at a fixed
//! width (the way Twitter's link shortener counts them) while keeping their
//! real text in the output.
//!
//! All offsets and lengths are in `char`s, never bytes.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::urls::{find_urls_raw, normalized_len};

/// Default output budget.
pub const DEFAULT_LENGTH: usize = 140;
/// Default string inserted at the cut.
pub const DEFAULT_ELLIPSIS: &str = "…";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TruncateError {
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: String,
    },
}

/// Parameters for [`truncate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncateOptions {
    /// Maximum output length in characters. Must be positive.
    pub length: usize,
    /// Canonical URI appended after the text.
    pub uri: Option<String>,
    /// Budget every URL (including `uri`) as this many characters.
    ///
    /// Embedded URLs are swapped for `URL<n>` markers padded with `X` to this
    /// width. A marker never shrinks below `3 + digits(n)` characters, so a
    /// narrower `uri_len` budgets embedded URLs at the marker width and the
    /// text is cut a little earlier than the setting alone would require.
    pub uri_len: Option<usize>,
    /// Wrap `uri` in parentheses when no truncation happens.
    pub parens: bool,
    /// Inserted at the cut.
    pub ellipsis: String,
    /// Trailing hashtags to keep when truncating. Accepted but not enforced.
    pub hashtags_to_preserve: usize,
}

impl Default for TruncateOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            uri: None,
            uri_len: None,
            parens: true,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            hashtags_to_preserve: 1,
        }
    }
}

impl TruncateOptions {
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn with_uri_len(mut self, uri_len: usize) -> Self {
        self.uri_len = Some(uri_len);
        self
    }

    #[must_use]
    pub fn with_parens(mut self, parens: bool) -> Self {
        self.parens = parens;
        self
    }

    #[must_use]
    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    #[must_use]
    pub fn with_hashtags_to_preserve(mut self, count: usize) -> Self {
        self.hashtags_to_preserve = count;
        self
    }

    fn validate(&self) -> Result<(), TruncateError> {
        if self.length == 0 {
            return Err(TruncateError::InvalidArgument {
                field: "length",
                reason: "must be a positive number of characters".to_string(),
            });
        }
        Ok(())
    }

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref().filter(|uri| !uri.is_empty())
    }
}

/// A word in the working text, in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Word {
    start: usize,
    len: usize,
}

impl Word {
    fn end(self) -> usize {
        self.start + self.len
    }
}

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("valid word regex"))
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"URL([0-9]+)X*").expect("valid placeholder regex"))
}

/// Maximal `\w+` runs with character offsets.
fn words(text: &str) -> Vec<Word> {
    let mut words = Vec::new();
    // Running (byte, char) cursor so offsets convert in one pass.
    let mut byte_cursor = 0;
    let mut char_cursor = 0;

    for m in word_regex().find_iter(text) {
        char_cursor += text[byte_cursor..m.start()].chars().count();
        let len = m.as_str().chars().count();
        words.push(Word {
            start: char_cursor,
            len,
        });
        char_cursor += len;
        byte_cursor = m.end();
    }

    words
}

/// URLs swapped out for fixed-width placeholders, restorable afterwards.
#[derive(Debug, Default)]
struct Placeholders {
    entries: Vec<(String, String)>,
}

impl Placeholders {
    /// Replace every URL in `text` with a placeholder `uri_len` characters
    /// wide (or as wide as its marker, if that is longer).
    fn substitute(text: &str, uri_len: usize) -> (String, Self) {
        let mut working = text.to_string();
        let mut entries = Vec::new();

        for (index, url) in find_urls_raw(text).into_iter().enumerate() {
            let mut placeholder = format!("URL{index}");
            let pad = uri_len.saturating_sub(placeholder.chars().count());
            placeholder.push_str(&"X".repeat(pad));
            working = working.replace(&url, &placeholder);
            entries.push((placeholder, url));
        }

        (working, Self { entries })
    }

    /// Swap placeholders back in one pass, so `URL1` never matches inside
    /// `URL10`.
    fn restore(&self, output: String) -> String {
        if self.entries.is_empty() {
            return output;
        }
        placeholder_regex()
            .replace_all(&output, |caps: &Captures<'_>| {
                let matched = &caps[0];
                let entry = caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.entries.get(index));
                match entry {
                    Some((placeholder, url)) => match matched.strip_prefix(placeholder.as_str()) {
                        Some(rest) => format!("{url}{rest}"),
                        None => matched.to_string(),
                    },
                    None => matched.to_string(),
                }
            })
            .into_owned()
    }
}

/// Offset to cut `text` at so that no word crosses `max_plain_len`.
fn cut_point(words: &[Word], max_plain_len: usize) -> usize {
    words
        .iter()
        .position(|word| word.start > max_plain_len || word.end() > max_plain_len)
        .map_or(max_plain_len, |first_overflow| {
            first_overflow
                .checked_sub(1)
                .map_or(0, |previous| words[previous].end())
        })
}

/// Truncate `text` to fit `options.length`, appending the ellipsis and URI.
///
/// When the text fits, the URI is appended in parentheses instead (or with a
/// plain space when `parens` is off) and the text is left whole. That branch
/// does not re-check the budget, so the parenthesised URI may overflow it.
///
/// With `uri_len` set, URLs are budgeted at that width but restored in full,
/// so the real output length can exceed `length`.
///
/// # Examples
///
/// ```
/// use posse_types::{TruncateOptions, truncate};
///
/// let options = TruncateOptions::new(140).with_uri("http://example.org/notes/16");
/// assert_eq!(
///     truncate("Here is some really short text", &options).unwrap(),
///     "Here is some really short text (http://example.org/notes/16)"
/// );
/// ```
pub fn truncate(text: &str, options: &TruncateOptions) -> Result<String, TruncateError> {
    options.validate()?;

    let uri = options.uri();
    let append = match uri {
        Some(uri) => format!("{} {uri}", options.ellipsis),
        None => options.ellipsis.clone(),
    };

    let (working, placeholders) = match options.uri_len {
        Some(uri_len) => Placeholders::substitute(text, uri_len),
        None => (text.to_string(), Placeholders::default()),
    };

    let max_plain_len = options
        .length
        .saturating_sub(normalized_len(&append, options.uri_len));

    let output = if normalized_len(&working, options.uri_len) > max_plain_len {
        let cut = cut_point(&words(&working), max_plain_len);
        let mut truncated: String = working.chars().take(cut).collect();
        truncated.push_str(&append);
        truncated
    } else {
        match uri {
            Some(uri) if options.parens => format!("{working} ({uri})"),
            Some(uri) => format!("{working} {uri}"),
            None => working,
        }
    };

    Ok(placeholders.restore(output))
}
