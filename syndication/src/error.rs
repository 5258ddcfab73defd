use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyndicationError {
    /// The API answered with a non-success status.
    #[error("Twitter API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("request to Twitter failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected Twitter response: {0}")]
    Decode(#[from] serde_json::Error),
}
