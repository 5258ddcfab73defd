//! Author names from profile URIs.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

fn twitter_profile() -> &'static Regex {
    static PROFILE: OnceLock<Regex> = OnceLock::new();
    PROFILE.get_or_init(|| {
        Regex::new(r"^https?://(?:www\.)?twitter\.com/([A-Za-z0-9_]{1,20})(?:[/?#]|$)")
            .expect("valid twitter profile regex")
    })
}

/// A plain-text author handle for `uri`.
///
/// Twitter URIs give `@name` (lowercased); anything else is assumed to be an
/// indieweb site and gives its host, e.g. `waterpigs.co.uk`. Returns `None`
/// when `uri` has no host.
#[must_use]
pub fn author_from_uri(uri: &str) -> Option<String> {
    let uri = uri.trim();
    if let Some(caps) = twitter_profile().captures(uri) {
        return Some(format!("@{}", caps[1].to_ascii_lowercase()));
    }

    let parsed = Url::parse(uri).ok()?;
    parsed.host_str().map(str::to_string)
}
