//! Objects that can be syndicated.

use serde::{Deserialize, Serialize};

/// Tracks copies of an object published elsewhere.
pub trait DownstreamDuplicates {
    fn add_downstream_duplicate(&mut self, url: &str);
    fn downstream_duplicates(&self) -> &[String];
}

/// A post as seen by a syndicator.
///
/// Objects opt in to duplicate tracking by overriding
/// [`Syndicatable::duplicates_mut`].
pub trait Syndicatable {
    /// `None` when the object does not carry tags at all.
    fn tags(&self) -> Option<&[String]>;
    fn set_tags(&mut self, tags: Vec<String>);
    /// Full HTML content.
    fn content(&self) -> Option<&str>;
    fn summary(&self) -> Option<&str>;
    /// Canonical URL of the original.
    fn url(&self) -> Option<&str>;
    fn in_reply_to(&self) -> Option<&str>;

    fn duplicates_mut(&mut self) -> Option<&mut dyn DownstreamDuplicates> {
        None
    }
}

/// A plain post record, e.g. read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, alias = "inReplyTo")]
    pub in_reply_to: Option<String>,
    /// URLs of downstream copies.
    #[serde(default)]
    pub syndication: Vec<String>,
}

impl Syndicatable for Post {
    fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = Some(tags);
    }

    fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn in_reply_to(&self) -> Option<&str> {
        self.in_reply_to.as_deref()
    }

    fn duplicates_mut(&mut self) -> Option<&mut dyn DownstreamDuplicates> {
        Some(self)
    }
}

impl DownstreamDuplicates for Post {
    fn add_downstream_duplicate(&mut self, url: &str) {
        if !self.syndication.iter().any(|existing| existing == url) {
            self.syndication.push(url.to_string());
        }
    }

    fn downstream_duplicates(&self) -> &[String] {
        &self.syndication
    }
}
