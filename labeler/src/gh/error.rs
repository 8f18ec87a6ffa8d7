//! Failures of a `gh` invocation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhError {
    /// gh exited non-zero
    #[error("`gh {command}` failed (exit code {code}): {stderr}")]
    CommandFailed {
        /// Subcommand and arguments, space-joined
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("failed to spawn gh process: {0}")]
    SpawnError(#[from] std::io::Error),

    /// gh printed something that is not the expected JSON
    #[error("failed to parse gh JSON output: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("gh CLI not found - ensure gh is installed and in PATH")]
    NotFound,

    #[error("gh CLI not authenticated - run 'gh auth login' first")]
    NotAuthenticated,

    /// The run was cancelled while gh was executing; the child is killed
    #[error("gh command cancelled")]
    Cancelled,
}

pub type GhResult<T> = Result<T, GhError>;
