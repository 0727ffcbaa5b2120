use thiserror::Error;

use crate::access::AccessError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Invalid URL for {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}
