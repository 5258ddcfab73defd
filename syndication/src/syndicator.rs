//! Tag-driven syndication to Twitter.
//!
//! A post is a candidate when its tags match the configured [`Strategy`]:
//! with `SyndicateIfTagged` only posts carrying the trigger tag are sent;
//! with `SyndicateUnlessTagged` everything is sent except posts carrying it.
//! The trigger tag is transient and is removed from the post either way.

use std::str::FromStr;

use posse_config::{TwitterConfig, TwitterCredentials};
use thiserror::Error;

use crate::{
    object::Syndicatable,
    prepare::prepare_for_twitter,
    twitter::{StatusPoster, TwitterClient},
};

/// Trigger tag used when none is configured.
pub const DEFAULT_TAG: &str = "tweet";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    SyndicateIfTagged,
    SyndicateUnlessTagged,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown syndication strategy `{0}`")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    /// Accepts `"syndicate if tagged"`, `"SYNDICATE_UNLESS_TAGGED"` and the
    /// like.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "SYNDICATE_IF_TAGGED" => Ok(Self::SyndicateIfTagged),
            "SYNDICATE_UNLESS_TAGGED" => Ok(Self::SyndicateUnlessTagged),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// What [`TwitterSyndicator::syndicate`] did with an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyndicationOutcome {
    /// The object carries no tags, so candidacy cannot be decided.
    NoTags,
    NotCandidate,
    /// Neither content nor summary to post.
    NoContent,
    Syndicated { url: String },
    /// Posting failed; the error has been logged.
    Failed,
}

#[derive(Debug, Clone)]
pub struct TwitterSyndicator<P> {
    tag: String,
    strategy: Strategy,
    poster: P,
}

impl TwitterSyndicator<TwitterClient> {
    /// Build from the `[twitter]` config section. Credentials are resolved
    /// from the environment; missing credentials leave them empty.
    pub fn from_config(config: &TwitterConfig) -> Result<Self, UnknownStrategy> {
        let strategy = config
            .strategy
            .as_deref()
            .map(Strategy::from_str)
            .transpose()?
            .unwrap_or_default();

        let credentials = config
            .credentials
            .as_ref()
            .map(TwitterCredentials::resolved)
            .unwrap_or_default();
        let mut client = TwitterClient::new(credentials);
        if let Some(api_base) = &config.api_base {
            client = client.with_api_base(api_base.as_str());
        }

        let mut syndicator = Self::new(client).with_strategy(strategy);
        if let Some(tag) = &config.tag {
            syndicator = syndicator.with_tag(tag);
        }
        Ok(syndicator)
    }
}

impl<P: StatusPoster> TwitterSyndicator<P> {
    #[must_use]
    pub fn new(poster: P) -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            strategy: Strategy::default(),
            poster,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.trim().to_lowercase();
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[must_use]
    pub fn poster(&self) -> &P {
        &self.poster
    }

    fn is_trigger(&self, tag: &str) -> bool {
        tag.trim().to_lowercase() == self.tag
    }

    /// Whether an object with `tags` should be syndicated.
    #[must_use]
    pub fn is_candidate(&self, tags: &[String]) -> bool {
        let tagged = tags.iter().any(|tag| self.is_trigger(tag));
        match self.strategy {
            Strategy::SyndicateIfTagged => tagged,
            Strategy::SyndicateUnlessTagged => !tagged,
        }
    }

    /// Post `object` if it is a candidate and record the tweet as a
    /// downstream duplicate. Posting failures are logged, not returned.
    pub async fn syndicate(&self, object: &mut dyn Syndicatable) -> SyndicationOutcome {
        let Some(tags) = object.tags() else {
            tracing::debug!("Object has no tags; cannot decide whether to syndicate");
            return SyndicationOutcome::NoTags;
        };

        if !self.is_candidate(tags) {
            tracing::debug!(
                tag = %self.tag,
                strategy = ?self.strategy,
                "Object is not a syndication candidate"
            );
            return SyndicationOutcome::NotCandidate;
        }

        let remaining: Vec<String> = tags
            .iter()
            .filter(|tag| !self.is_trigger(tag))
            .cloned()
            .collect();
        object.set_tags(remaining);

        let Some(text) = object
            .content()
            .filter(|content| !content.trim().is_empty())
            .or_else(|| object.summary().filter(|summary| !summary.trim().is_empty()))
        else {
            tracing::warn!(
                url = ?object.url(),
                "Syndication candidate has no content or summary"
            );
            return SyndicationOutcome::NoContent;
        };

        let update = match prepare_for_twitter(text, object.url(), object.in_reply_to()) {
            Ok(update) => update,
            Err(err) => {
                tracing::error!(error = %err, "Failed to prepare tweet");
                return SyndicationOutcome::Failed;
            }
        };
        tracing::info!(
            status = %update.status,
            in_reply_to_status_id = ?update.in_reply_to_status_id,
            "Built Twitter query"
        );

        let posted = match self.poster.post_status(&update).await {
            Ok(posted) => posted,
            Err(err) => {
                tracing::error!(error = %err, "Twitter syndication attempt failed");
                return SyndicationOutcome::Failed;
            }
        };

        let url = posted.url();
        tracing::info!(
            id = %posted.id,
            screen_name = %posted.screen_name,
            %url,
            "Received response"
        );

        if let Some(duplicates) = object.duplicates_mut() {
            duplicates.add_downstream_duplicate(&url);
        }

        SyndicationOutcome::Syndicated { url }
    }
}
