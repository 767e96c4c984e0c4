//! Error taxonomy for the simulation core
//!
//! Every variant is returned as a value. None of them are fatal to the
//! animation loop: callers typically log and carry on with the next frame.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Non-finite or out-of-domain numeric input; the update was dropped
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Selection requested with no station inside the proximity threshold
    #[error("no station in range")]
    NoStationInRange,

    /// `start` called while a transition is already running
    #[error("transition already running")]
    AlreadyRunning,

    /// Configuration rejected at construction
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::InvalidConfig(err.to_string())
    }
}
