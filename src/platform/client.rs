use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::error::FetchError;

/// Page-size query parameter to send with a page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizeHint {
    pub param: &'static str,
    pub size: u32,
}

/// Fetches one page of a platform collection as JSON
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, locator: &Url, hint: PageSizeHint) -> Result<Value, FetchError>;
}

/// Fetches the signed-in user's raw profile document
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_profile(&self) -> Result<Value, FetchError>;
}

/// HTTP client for the platform and identity APIs, acting with the user's token
#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    access_token: String,
    account_info_uri: Url,
}

impl PlatformClient {
    pub fn new(
        access_token: impl Into<String>,
        account_info_uri: Url,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(http, access_token, account_info_uri))
    }

    pub fn with_http(http: reqwest::Client, access_token: impl Into<String>, account_info_uri: Url) -> Self {
        Self {
            http,
            access_token: access_token.into(),
            account_info_uri,
        }
    }

    async fn get_json(&self, url: Url) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

/// Adds the page-size parameter unless the locator already carries one
pub fn with_page_size(locator: &Url, hint: PageSizeHint) -> Url {
    let mut url = locator.clone();
    if !url.query_pairs().any(|(key, _)| key == hint.param) {
        url.query_pairs_mut()
            .append_pair(hint.param, &hint.size.to_string());
    }
    url
}

#[async_trait]
impl PageFetcher for PlatformClient {
    async fn fetch_page(&self, locator: &Url, hint: PageSizeHint) -> Result<Value, FetchError> {
        let url = with_page_size(locator, hint);
        tracing::debug!(url = %url, "fetching platform page");
        self.get_json(url).await
    }
}

#[async_trait]
impl ProfileFetcher for PlatformClient {
    async fn fetch_profile(&self) -> Result<Value, FetchError> {
        self.get_json(self.account_info_uri.clone()).await
    }
}
