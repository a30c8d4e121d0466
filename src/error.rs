use thiserror::Error;

/// Failures reported by a lexical client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to lexical service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lexical service returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no word under the cursor; select a word first")]
    NoTarget,

    #[error(transparent)]
    Fetch(#[from] ClientError),
}
