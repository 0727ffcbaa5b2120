use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Invalid {list} rule '{pattern}': {source}")]
    InvalidRule {
        list: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
