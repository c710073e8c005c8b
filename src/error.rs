use std::{io, path::PathBuf};

/// Result type used by the parsing and emitting stages.
pub type Result<T> = std::result::Result<T, GenError>;

/// Everything that can go wrong while turning one specification file into
/// a script. Each variant carries the path it concerns so the caller can
/// report it and move on to the next input.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("cannot access {}: {source}", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to resolve the absolute directory of {}: {source}", .path.display())]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is missing the {missing} line", .path.display())]
    Malformed { path: PathBuf, missing: &'static str },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

impl GenError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Path of the file the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            GenError::InputNotFound { path, .. }
            | GenError::Read { path, .. }
            | GenError::PathResolution { path, .. }
            | GenError::Malformed { path, .. }
            | GenError::Write { path, .. }
            | GenError::ConfigRead { path, .. }
            | GenError::ConfigParse { path, .. } => path,
        }
    }
}
