use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::error::ApiError;
use crate::platform::FetchError;

/// Request headers that describe the inbound connection, not the request
const STRIPPED_REQUEST_HEADERS: &[header::HeaderName] = &[
    header::HOST,
    header::USER_AGENT,
    header::ACCEPT_ENCODING,
    header::CONTENT_LENGTH,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
];

const STRIPPED_RESPONSE_HEADERS: &[header::HeaderName] = &[
    header::CONTENT_LENGTH,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
];

/// A buffered response from the dashboard application
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        for (name, value) in self.headers.iter() {
            if !STRIPPED_RESPONSE_HEADERS.contains(name) {
                headers.append(name.clone(), value.clone());
            }
        }
        response
    }
}

/// Client for the proxied dashboard application
#[derive(Debug, Clone)]
pub struct Upstream {
    http: reqwest::Client,
    base: Url,
}

impl Upstream {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute upstream URL for a path (and optional query) on the dashboard
    pub fn url_for(&self, path_and_query: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path_and_query.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::bad_request(format!("Invalid upstream path: {e}")))
    }

    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<UpstreamResponse, ApiError> {
        let url = self.url_for(path_and_query)?;

        let mut outbound = headers.clone();
        for name in STRIPPED_REQUEST_HEADERS {
            outbound.remove(name);
        }

        tracing::debug!(method = %method, url = %url, bytes = body.len(), "forwarding upstream");
        let response = self
            .http
            .request(method, url)
            .headers(outbound)
            .body(body)
            .send()
            .await
            .map_err(FetchError::from)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(FetchError::from)?;

        Ok(UpstreamResponse { status, headers, body })
    }
}
