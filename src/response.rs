//! Classification of the plain-text answers our scripts hand back.
//!
//! BetterTouchTool has no separate error channel: a script reports failure by returning a
//! string that starts with [`ERROR_PREFIX`]. Anything else is a success payload. The helpers
//! here keep that convention at the boundary and turn it into a [`BttResult`] right away.

use crate::error::{BttError, BttResult};

pub const ERROR_PREFIX: &str = "error: ";

/// Separator between an error message and the nested detail captured at script runtime.
pub const ERROR_DETAIL_SEPARATOR: &str = ". Error: ";

pub const BTT_NOT_RUNNING_ERROR: &str = "BetterTouchTool is not running";

pub fn is_error_response(response: &str) -> bool {
    response.starts_with(ERROR_PREFIX)
}

pub fn is_btt_not_running_error(error: &str) -> bool {
    error.contains(BTT_NOT_RUNNING_ERROR)
}

/// Split a raw script answer into its success payload or a typed error.
pub fn classify(response: &str) -> BttResult<&str> {
    match response.strip_prefix(ERROR_PREFIX) {
        Some(message) if is_btt_not_running_error(message) => Err(BttError::NotRunning),
        Some(message) => Err(BttError::Reported(message.to_owned())),
        None => Ok(response),
    }
}
