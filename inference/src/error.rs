use thiserror::Error;

use crate::task::TaskKind;

#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with an `error` field. The message is the field
    /// verbatim.
    #[error("{0}")]
    Inference(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    /// The body was valid JSON but did not match the task's response type.
    #[error("unexpected response shape: {0}")]
    Decode(serde_json::Error),
    #[error("empty response for {0}")]
    EmptyResponse(TaskKind),
    #[error("model identifier is empty")]
    MissingModel,
    #[error("unknown task: {0}")]
    UnknownTask(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True when the call never produced a usable JSON body.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Json(_))
    }
}

/// Convenience result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
