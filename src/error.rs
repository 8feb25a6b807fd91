use thiserror::Error;

use crate::response::BTT_NOT_RUNNING_ERROR;

/// Everything that can go wrong between building a command and reading its answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BttError {
    /// The OS layer could not run the URL or script at all.
    #[error("{0}")]
    Dispatch(String),

    #[error("{}", BTT_NOT_RUNNING_ERROR)]
    NotRunning,

    /// BetterTouchTool answered with an `error: ` response. Holds the text after the prefix.
    #[error("{0}")]
    Reported(String),

    #[error("Unexpected response from BetterTouchTool: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type BttResult<T> = Result<T, BttError>;
