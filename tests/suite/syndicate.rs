//! TwitterSyndicator against a mock Twitter API.

use crate::common::{
    CREATED_TWEET, CREATED_TWEET_URL, dummy_post, mount_status_created, mount_status_error,
    start_twitter_mock, twitter_client, twitter_config,
};
use posse_syndication::{Post, Strategy, SyndicationOutcome, TwitterSyndicator};
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn object_without_tags_is_skipped() {
    let server = start_twitter_mock().await;
    let syndicator = TwitterSyndicator::new(twitter_client(&server));
    let mut post = Post {
        content: Some("Untagged".to_string()),
        ..Post::default()
    };

    assert_eq!(syndicator.syndicate(&mut post).await, SyndicationOutcome::NoTags);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn if_strategy_skips_untagged_objects() {
    let server = start_twitter_mock().await;
    let syndicator = TwitterSyndicator::new(twitter_client(&server));
    let mut post = dummy_post(&["random tag", "another tag"], "http://example.org/n/1");

    assert_eq!(
        syndicator.syndicate(&mut post).await,
        SyndicationOutcome::NotCandidate
    );
    assert_eq!(
        post.tags,
        Some(vec!["random tag".to_string(), "another tag".to_string()])
    );
}

#[tokio::test]
async fn unless_strategy_skips_tagged_objects() {
    let server = start_twitter_mock().await;
    let syndicator = TwitterSyndicator::new(twitter_client(&server))
        .with_strategy(Strategy::SyndicateUnlessTagged);
    let mut post = dummy_post(&["tweet"], "http://example.org/n/1");

    assert_eq!(
        syndicator.syndicate(&mut post).await,
        SyndicationOutcome::NotCandidate
    );
}

#[tokio::test]
async fn tag_and_strategy_config_decide_candidacy() {
    let cases = [
        ("syndicate if tagged", "tweetme", "tweetme", true),
        ("syndicate unless tagged", "notweet", "blah", true),
        ("syndicate unless tagged", "notweet", "notweet", false),
    ];

    for (strategy, tag, post_tag, expected) in cases {
        let server = start_twitter_mock().await;
        mount_status_created(&server).await;
        let syndicator =
            TwitterSyndicator::from_config(&twitter_config(&server, Some(tag), Some(strategy)))
                .unwrap();
        let mut post = dummy_post(&[post_tag], "http://example.org/dummy/url");

        let outcome = syndicator.syndicate(&mut post).await;

        let expected = if expected {
            SyndicationOutcome::Syndicated {
                url: CREATED_TWEET_URL.to_string(),
            }
        } else {
            SyndicationOutcome::NotCandidate
        };
        assert_eq!(outcome, expected, "{strategy} / {tag} / {post_tag}");
    }
}

#[tokio::test]
async fn downstream_duplicate_added_after_syndication() {
    let server = start_twitter_mock().await;
    mount_status_created(&server).await;
    let syndicator = TwitterSyndicator::new(twitter_client(&server));
    let mut post = dummy_post(&["tweet"], "http://example.org/dummy/url/again");

    syndicator.syndicate(&mut post).await;

    assert!(post.syndication.contains(&CREATED_TWEET_URL.to_string()));
    assert_eq!(post.tags, Some(Vec::new()));
}

#[tokio::test]
async fn request_is_signed_and_carries_reply_id() {
    let server = start_twitter_mock().await;
    Mock::given(method("POST"))
        .and(path("/1.1/statuses/update.json"))
        .and(header_regex(
            "authorization",
            r#"^OAuth oauth_consumer_key="consumer-key", oauth_nonce="[0-9a-f]{32}", oauth_signature="[^"]+", oauth_signature_method="HMAC-SHA1", oauth_timestamp="\d+", oauth_token="access-token", oauth_version="1.0"$"#,
        ))
        .and(body_string_contains("in_reply_to_status_id=254199790307524610"))
        .and(body_string_contains("status=%40BarnabyWalters%20indeed"))
        .respond_with(ResponseTemplate::new(201).set_body_raw(
            r#"{"id_str":"1","user":{"screen_name":"me"}}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let syndicator = TwitterSyndicator::new(twitter_client(&server));
    let mut post = Post {
        url: Some("http://example.org/replies/1".to_string()),
        tags: Some(vec!["tweet".to_string()]),
        content: Some("<p>@BarnabyWalters indeed</p>".to_string()),
        in_reply_to: Some(
            "https://twitter.com/BarnabyWalters/status/254199790307524610".to_string(),
        ),
        ..Post::default()
    };

    assert_eq!(
        syndicator.syndicate(&mut post).await,
        SyndicationOutcome::Syndicated {
            url: "https://twitter.com/me/status/1".to_string()
        }
    );
}

#[tokio::test]
async fn api_failure_is_suppressed() {
    let server = start_twitter_mock().await;
    mount_status_error(&server, 403, r#"{"errors":[{"code":187}]}"#).await;
    let syndicator = TwitterSyndicator::new(twitter_client(&server));
    let mut post = dummy_post(&["tweet"], "http://example.org/n/2");

    assert_eq!(syndicator.syndicate(&mut post).await, SyndicationOutcome::Failed);
    assert!(post.syndication.is_empty());
}

#[tokio::test]
async fn summary_is_posted_when_content_missing() {
    let server = start_twitter_mock().await;
    Mock::given(method("POST"))
        .and(path("/1.1/statuses/update.json"))
        .and(body_string_contains("status=Just%20a%20summary"))
        .respond_with(ResponseTemplate::new(201).set_body_raw(CREATED_TWEET, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let syndicator = TwitterSyndicator::new(twitter_client(&server));
    let mut post = Post {
        content: None,
        summary: Some("Just a summary".to_string()),
        ..dummy_post(&["tweet"], "http://example.org/n/3")
    };

    assert!(matches!(
        syndicator.syndicate(&mut post).await,
        SyndicationOutcome::Syndicated { .. }
    ));
}
