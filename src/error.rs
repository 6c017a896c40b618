use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a single file or change from being processed.
///
/// None of these are fatal for a whole run: the caller logs them and moves on
/// to the next change (or, for `MissingFileContent`, renders the file with
/// blank context lines).
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("content of {path} is unavailable: {source}")]
    MissingFileContent {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run {program}: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} {args} failed: {stderr}")]
    CommandFailed {
        program: String,
        args: String,
        stderr: String,
    },

    #[error("unexpected {program} output: {detail}")]
    UnexpectedOutput { program: String, detail: String },

    #[error("invalid scan result {path}: {reason}")]
    ScanResult { path: PathBuf, reason: String },
}

pub type ReviewResult<T> = Result<T, ReviewError>;
