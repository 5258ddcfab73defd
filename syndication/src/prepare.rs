//! Turning a post into a `statuses/update` request.

use std::sync::OnceLock;

use posse_markup::html_to_text;
use posse_types::{TruncateError, TruncateOptions, truncate};
use regex::Regex;
use serde::Serialize;

/// Maximum status length.
pub const TWEET_LENGTH: usize = 140;
/// Width every link counts as once shortened.
pub const TWEET_URI_LENGTH: usize = 22;

/// Form fields for `statuses/update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_status_id: Option<String>,
}

impl StatusUpdate {
    #[must_use]
    pub fn form_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![("status", self.status.as_str())];
        if let Some(id) = &self.in_reply_to_status_id {
            params.push(("in_reply_to_status_id", id.as_str()));
        }
        params
    }
}

/// Convert HTML `text` to a status that fits in a tweet with `url` appended,
/// replying to `in_reply_to` when it is a tweet URL.
pub fn prepare_for_twitter(
    text: &str,
    url: Option<&str>,
    in_reply_to: Option<&str>,
) -> Result<StatusUpdate, TruncateError> {
    let mut options = TruncateOptions::new(TWEET_LENGTH).with_uri_len(TWEET_URI_LENGTH);
    if let Some(url) = url {
        options = options.with_uri(url);
    }

    let status = truncate(&html_to_text(text), &options)?;

    Ok(StatusUpdate {
        status,
        in_reply_to_status_id: in_reply_to.and_then(tweet_id_from_url),
    })
}

fn tweet_url() -> &'static Regex {
    static TWEET: OnceLock<Regex> = OnceLock::new();
    TWEET.get_or_init(|| {
        Regex::new(r"https?://(?:www\.)?twitter\.com/[A-Za-z0-9_]{1,20}/status(?:es)?/([0-9]+)")
            .expect("valid tweet url regex")
    })
}

/// The status ID in a tweet permalink, if `url` is one.
#[must_use]
pub fn tweet_id_from_url(url: &str) -> Option<String> {
    tweet_url()
        .captures(url)
        .map(|caps| caps[1].to_string())
}
