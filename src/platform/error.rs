use thiserror::Error;

use crate::session::StoreError;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
}

#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("Fetching page {locator} failed: {source}")]
    Fetch {
        locator: String,
        #[source]
        source: FetchError,
    },

    #[error("Malformed page {locator}: {reason}")]
    MalformedPage { locator: String, reason: String },

    #[error("Invalid next-page locator '{next}' on {locator}: {source}")]
    InvalidLocator {
        locator: String,
        next: String,
        #[source]
        source: url::ParseError,
    },
}

/// Failure while assembling a session's authorization context, by stage
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Profile fetch failed: {0}")]
    Profile(#[source] FetchError),

    #[error("Organization listing failed: {0}")]
    Organizations(#[source] PaginationError),

    #[error("Space listing failed: {0}")]
    Spaces(#[source] PaginationError),

    #[error("Storing session failed: {0}")]
    Store(#[source] StoreError),

    #[error("Invalid platform URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ContextError {
    /// Log tag naming the failing stage
    pub fn stage(&self) -> &'static str {
        match self {
            ContextError::Profile(_) => "session:profile",
            ContextError::Organizations(_) => "session:orgs",
            ContextError::Spaces(_) => "session:spaces",
            ContextError::Store(_) => "session:set",
            ContextError::Url(_) => "session:config",
        }
    }
}
