//! Syndication of Posse content to Twitter.
//!
//! - [`prepare_for_twitter`]: HTML post to a `statuses/update` request
//! - [`TwitterClient`]: OAuth 1.0a signed REST client
//! - [`TwitterSyndicator`]: tag-driven syndication of [`Syndicatable`] objects

mod error;
mod object;
pub mod oauth;
mod prepare;
mod syndicator;
mod twitter;

pub use error::SyndicationError;
pub use object::{DownstreamDuplicates, Post, Syndicatable};
pub use prepare::{
    StatusUpdate, TWEET_LENGTH, TWEET_URI_LENGTH, prepare_for_twitter, tweet_id_from_url,
};
pub use syndicator::{
    DEFAULT_TAG, Strategy, SyndicationOutcome, TwitterSyndicator, UnknownStrategy,
};
pub use twitter::{DEFAULT_API_BASE, PostedStatus, StatusPoster, TwitterClient, http_client};
