use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),

    #[error("Session entry could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}
