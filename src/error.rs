//! Error types for gate construction and evaluation

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("include list can't be empty, at least one pattern or file must be given")]
    EmptyIncludeList,

    #[error("pattern '{pattern}' did not match any file, please check the pattern path")]
    UnmatchedPattern { pattern: String },

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot resolve repository root {}: {source}", path.display())]
    RepositoryRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error("invalid config file {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, GateError>;
