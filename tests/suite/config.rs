//! Config files driving truncation and syndication.

use std::{env, fs, path::PathBuf};

use crate::common::{CREATED_TWEET_URL, dummy_post, mount_status_created, start_twitter_mock};
use posse_config::{ConfigError, PosseConfig};
use posse_syndication::{Strategy, SyndicationOutcome, TwitterSyndicator};
use posse_types::truncate;

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn truncate_section_sets_defaults() {
    let (_dir, path) = write_config(
        r#"
[truncate]
length = 20
ellipsis = "..."
parens = false
"#,
    );
    let config = PosseConfig::load_from(&path).unwrap();
    let options = config.truncate_options().with_uri("http://x.co/1");

    assert_eq!(
        truncate("one two three four five six", &options).unwrap(),
        "one... http://x.co/1"
    );
    assert_eq!(truncate("hi", &options).unwrap(), "hi http://x.co/1");
}

#[test]
fn broken_config_reports_its_path() {
    let (_dir, path) = write_config("[twitter\ntag = 1");
    let err = PosseConfig::load_from(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.path(), path.as_path());
}

#[tokio::test]
async fn syndicator_built_from_config_file() {
    let server = start_twitter_mock().await;
    mount_status_created(&server).await;

    unsafe {
        env::set_var("POSSE_SUITE_ACCESS_TOKEN", "token-from-env");
    }
    let (_dir, path) = write_config(&format!(
        r#"
[twitter]
tag = "NoTweet"
strategy = "syndicate unless tagged"
api_base = "{}/1.1"

[twitter.credentials]
consumer_key = "ck"
consumer_secret = "cs"
access_token = "${{POSSE_SUITE_ACCESS_TOKEN}}"
access_token_secret = "ats"
"#,
        server.uri()
    ));

    let config = PosseConfig::load_from(&path).unwrap();
    let syndicator = TwitterSyndicator::from_config(config.twitter.as_ref().unwrap()).unwrap();
    assert_eq!(syndicator.tag(), "notweet");
    assert_eq!(syndicator.strategy(), Strategy::SyndicateUnlessTagged);

    let mut post = dummy_post(&["indieweb"], "http://example.org/n/7");
    assert_eq!(
        syndicator.syndicate(&mut post).await,
        SyndicationOutcome::Syndicated {
            url: CREATED_TWEET_URL.to_string()
        }
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(authorization.contains("oauth_token=\"token-from-env\""));

    unsafe {
        env::remove_var("POSSE_SUITE_ACCESS_TOKEN");
    }
}

#[test]
fn unknown_strategy_is_rejected() {
    let config = PosseConfig::from_toml_str(
        r#"
[twitter]
strategy = "syndicate on tuesdays"
"#,
    )
    .unwrap();

    let err = TwitterSyndicator::from_config(config.twitter.as_ref().unwrap()).unwrap_err();
    assert_eq!(err.to_string(), "unknown syndication strategy `syndicate on tuesdays`");
}
