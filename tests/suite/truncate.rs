//! Truncation across the markup and syndication layers.

use posse_markup::html_to_text;
use posse_syndication::{TWEET_LENGTH, TWEET_URI_LENGTH, prepare_for_twitter};
use posse_types::{TruncateOptions, find_urls, normalized_len, truncate};
use pretty_assertions::assert_eq;

const NOTE: &str = "Spent the afternoon wiring up syndication so that notes posted here \
                    show up on Twitter too, with a link back to the original copy on this \
                    site, which stays canonical forever";

const URI: &str = "http://example.org/n/1";

#[test]
fn output_never_exceeds_budget_without_parens() {
    for length in (30..=220).step_by(7) {
        let options = TruncateOptions::new(length)
            .with_uri(URI)
            .with_parens(false);
        let output = truncate(NOTE, &options).unwrap();

        assert!(
            output.chars().count() <= length,
            "{length}: {output:?} is {} chars",
            output.chars().count()
        );
        assert!(output.ends_with(URI), "{length}: {output:?}");
    }
}

#[test]
fn truncated_output_is_stable() {
    for length in [1, 2, 10, 50, 100, 139, 140, 500] {
        let options = TruncateOptions::new(length);
        let once = truncate(NOTE, &options).unwrap();
        let twice = truncate(&once, &options).unwrap();
        assert_eq!(once, twice, "length {length}");
    }
}

#[test]
fn cut_text_is_a_prefix_of_the_note() {
    let options = TruncateOptions::new(80).with_uri(URI);
    let output = truncate(NOTE, &options).unwrap();
    let kept = output
        .strip_suffix(&format!("… {URI}"))
        .expect("truncated output ends with the ellipsis and uri");
    assert!(NOTE.starts_with(kept));
    assert!(!kept.ends_with(' '));
}

#[test]
fn embedded_image_url_counts_as_short_link() {
    let image = "http://example.com/photos/cat-with-a-very-long-file-name.jpg";
    let html = format!("<p>{}<img src=\"{image}\"></p>", "word ".repeat(20));

    let update = prepare_for_twitter(&html, None, None).unwrap();

    assert_eq!(update.status, format!("{}{image}", "word ".repeat(20)));
    assert!(update.status.chars().count() > TWEET_LENGTH);
    assert!(normalized_len(&update.status, Some(TWEET_URI_LENGTH)) <= TWEET_LENGTH);
}

#[test]
fn long_html_post_fits_a_tweet() {
    let html = format!(
        "<p>{NOTE}</p><p>And a second paragraph with <strong>emphasis</strong> and more words \
         so that the whole thing is far too long to tweet.</p>"
    );

    let update = prepare_for_twitter(&html, Some("http://example.org/articles/2013/long"), None)
        .unwrap();

    assert!(update.status.ends_with("… http://example.org/articles/2013/long"));
    assert!(normalized_len(&update.status, Some(TWEET_URI_LENGTH)) <= TWEET_LENGTH);
}

#[test]
fn links_survive_html_conversion() {
    let html = r#"<p>Notes on <a href="http://indiewebcamp.com/POSSE">POSSE</a>, see indiewebcamp.com/POSSE and <img src="https://example.org/diagram.png"></p>"#;
    let text = html_to_text(html);

    assert_eq!(
        find_urls(&text),
        vec![
            "http://indiewebcamp.com/POSSE".to_string(),
            "https://example.org/diagram.png".to_string(),
        ]
    );
}
