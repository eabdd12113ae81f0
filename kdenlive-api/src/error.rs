//! Error types for bus operations

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to Kdenlive.
#[derive(Debug, Error)]
pub enum BusError {
    /// A CLI bus tool could not be located on this machine
    #[error("bus tool '{0}' not found")]
    ToolMissing(String),

    /// A CLI bus tool ran but reported failure
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// A CLI bus tool did not finish before its deadline
    #[error("{tool} timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    /// Spawning or waiting on a child process failed
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The native binding reported an error for the call
    #[error("remote call {method} failed: {message}")]
    Remote { method: String, message: String },

    /// Every transport was tried and none produced a reply
    #[error("no bus transport could complete {method}: {last}")]
    Exhausted {
        method: String,
        #[source]
        last: Box<BusError>,
    },

    /// A caller-supplied argument was rejected before any call was made
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A reply could not be turned into the requested shape
    #[error("could not decode reply: {0}")]
    Decode(String),
}

impl BusError {
    /// Whether the error came from a tool that is simply not installed.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, BusError::ToolMissing(_))
    }
}

pub type Result<T> = std::result::Result<T, BusError>;
