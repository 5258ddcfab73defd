//! Twitter REST client.

use std::{future::Future, sync::OnceLock, time::Duration};

use posse_config::TwitterCredentials;
use reqwest::{
    Client, Response,
    header::{AUTHORIZATION, CONTENT_TYPE},
    redirect::Policy,
};
use serde::Deserialize;

use crate::{
    SyndicationError,
    oauth::{Nonce, authorization_header, encode_form},
    prepare::StatusUpdate,
};

/// Root of the v1.1 REST API.
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1/";

const STATUS_UPDATE_PATH: &str = "statuses/update.json";
const CONNECT_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

pub fn http_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .redirect(Policy::none())
            .user_agent(concat!("posse/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client: {e}. Falling back to defaults.");
                Client::new()
            })
    })
}

/// A status as created by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedStatus {
    pub id: String,
    pub screen_name: String,
}

impl PostedStatus {
    /// Permalink of the status.
    #[must_use]
    pub fn url(&self) -> String {
        format!("https://twitter.com/{}/status/{}", self.screen_name, self.id)
    }
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    id_str: String,
    user: TweetUser,
}

#[derive(Debug, Deserialize)]
struct TweetUser {
    screen_name: String,
}

/// Something that can publish a status update.
pub trait StatusPoster {
    fn post_status(
        &self,
        update: &StatusUpdate,
    ) -> impl Future<Output = Result<PostedStatus, SyndicationError>> + Send;
}

/// OAuth-signed client for `statuses/update`.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: Client,
    api_base: String,
    credentials: TwitterCredentials,
}

impl TwitterClient {
    #[must_use]
    pub fn new(credentials: TwitterCredentials) -> Self {
        Self {
            client: http_client().clone(),
            api_base: DEFAULT_API_BASE.to_string(),
            credentials,
        }
    }

    /// Point the client at another API root. A trailing `/` is added if
    /// missing.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        let mut api_base = api_base.into();
        if !api_base.ends_with('/') {
            api_base.push('/');
        }
        self.api_base = api_base;
        self
    }

    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint(&self) -> String {
        format!("{}{STATUS_UPDATE_PATH}", self.api_base)
    }
}

impl StatusPoster for TwitterClient {
    async fn post_status(&self, update: &StatusUpdate) -> Result<PostedStatus, SyndicationError> {
        let url = self.endpoint();
        let params = update.form_params();
        let authorization =
            authorization_header(&self.credentials, "POST", &url, &params, &Nonce::generate());

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(encode_form(&params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            return Err(SyndicationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let tweet: TweetResponse = serde_json::from_slice(&bytes)?;
        Ok(PostedStatus {
            id: tweet.id_str,
            screen_name: tweet.user.screen_name,
        })
    }
}

async fn read_capped_error_body(mut response: Response) -> String {
    let mut body = Vec::new();
    while let Ok(Some(chunk)) = response.chunk().await {
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
