use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoroError {
    #[error("not a test result line: {0}")]
    NotAResultLine(String),

    #[error("malformed test result: {0}")]
    MalformedResult(#[from] serde_json::Error),
}
