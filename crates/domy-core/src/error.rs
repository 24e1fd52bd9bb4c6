use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Coarse classification of every failure the sync engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    Transport,
    FileSystem,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Auth => "auth",
            Self::NotFound => "not-found",
            Self::Transport => "transport",
            Self::FileSystem => "filesystem",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(
        "invalid component name '{0}': component name must be at least 2 alphanumeric/dash/underscore characters"
    )]
    InvalidComponentName(String),

    #[error("{0}")]
    Validation(String),

    #[error("user is not authenticated: {0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),

    #[error("compiled files missing: {}", display_paths(.paths))]
    CompiledFilesMissing { paths: Vec<PathBuf> },

    #[error("registry request {method} /{path} failed: {message}")]
    Transport {
        method: String,
        path: String,
        message: String,
    },

    #[error("{action}: {}", .path.display())]
    FileSystem {
        action: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed parsing {}: {message}", .path.display())]
    InvalidDocument { path: PathBuf, message: String },
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidComponentName(_) | Self::Validation(_) => ErrorKind::Validation,
            Self::Auth(_) => ErrorKind::Auth,
            Self::NotFound(_) | Self::CompiledFilesMissing { .. } => ErrorKind::NotFound,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::FileSystem { .. } | Self::InvalidDocument { .. } => ErrorKind::FileSystem,
        }
    }

    pub fn fs(action: impl Into<String>, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::FileSystem {
            action: action.into(),
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn document(path: impl AsRef<Path>, message: impl fmt::Display) -> Self {
        Self::InvalidDocument {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn transport(
        method: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Transport {
            method: method.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, SyncError>;
