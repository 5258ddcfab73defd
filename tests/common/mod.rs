//! Shared test utilities and fixtures
//!
//! A mock of the Twitter REST API plus post and credential builders.

#![allow(dead_code)]

use posse_config::{TwitterConfig, TwitterCredentials};
use posse_syndication::{Post, TwitterClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const STATUS_UPDATE_PATH: &str = "/1.1/statuses/update.json";

/// Body of a successful `statuses/update` call.
pub const CREATED_TWEET: &str = r#"{"id_str":"12345678","user":{"screen_name":"username"}}"#;

pub const CREATED_TWEET_URL: &str = "https://twitter.com/username/status/12345678";

/// Start a mock server that simulates the Twitter API
pub async fn start_twitter_mock() -> MockServer {
    MockServer::start().await
}

/// API root on the mock server, as it would appear in config.
pub fn api_base(server: &MockServer) -> String {
    format!("{}/1.1/", server.uri())
}

/// Mount a `201 Created` status response.
pub async fn mount_status_created(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(STATUS_UPDATE_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_raw(CREATED_TWEET, "application/json"))
        .mount(server)
        .await;
}

/// Mount an error response for every status update.
pub async fn mount_status_error(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(STATUS_UPDATE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub fn credentials() -> TwitterCredentials {
    TwitterCredentials {
        consumer_key: "consumer-key".to_string(),
        consumer_secret: "consumer-secret".to_string(),
        access_token: "access-token".to_string(),
        access_token_secret: "access-token-secret".to_string(),
    }
}

pub fn twitter_client(server: &MockServer) -> TwitterClient {
    TwitterClient::new(credentials()).with_api_base(api_base(server))
}

/// `[twitter]` config pointing at the mock server.
pub fn twitter_config(server: &MockServer, tag: Option<&str>, strategy: Option<&str>) -> TwitterConfig {
    TwitterConfig {
        tag: tag.map(str::to_string),
        strategy: strategy.map(str::to_string),
        api_base: Some(api_base(server)),
        credentials: Some(credentials()),
    }
}

/// A post with dummy content and the given tags.
pub fn dummy_post(tags: &[&str], url: &str) -> Post {
    Post {
        url: Some(url.to_string()),
        tags: Some(tags.iter().map(ToString::to_string).collect()),
        content: Some("Dummy content".to_string()),
        ..Post::default()
    }
}
