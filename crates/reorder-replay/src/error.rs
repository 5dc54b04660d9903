#![forbid(unsafe_code)]

use reorder_runtime::ReplayError;
use reorder_runtime::logging::LoggingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayCliError {
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ReplayCliError {
    /// Process exit code, loosely following `sysexits.h`.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Replay(ReplayError::Parse { .. }) => 65,
            Self::Replay(ReplayError::Setup { .. }) => 78,
            Self::Replay(ReplayError::Io(_)) | Self::Io(_) => 74,
            Self::Logging(_) | Self::Encode(_) => 70,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReplayCliError>;
