//! Error types for dosfs.

use std::io;

/// Errors produced by the volume engine and the command handlers.
#[derive(Debug, thiserror::Error)]
pub enum DosError {
    #[error("File not found")]
    NotFound,

    #[error("Path not found")]
    NoPath,

    #[error("Invalid file name")]
    InvalidName,

    #[error("Permission denied")]
    Denied,

    #[error("Write protected")]
    WriteProtected,

    #[error("File already exists")]
    Exists,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Formatting failed: {0}")]
    FormatFailed(String),

    #[error("Cannot find fat or exfat filesystem")]
    NoFilesystem,

    #[error("Too many open directories")]
    TooManyOpenDirs,

    #[error("Filesystem is full")]
    Full,

    #[error("I/O error: {0}")]
    Device(String),

    #[error("{0}")]
    InvalidUsage(String),

    #[error("Moving multiple files: Destination must be an existing directory")]
    DestinationRequiresDirectory,

    #[error("config error: {0}")]
    Config(String),

    #[error("{path}: {source}")]
    At {
        path: String,
        #[source]
        source: Box<DosError>,
    },

    #[error("error while processing '{arg}': {source}")]
    Argument {
        arg: String,
        #[source]
        source: Box<DosError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("image format error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DosError {
    /// Attach the path of the entry that failed. Errors that already carry a
    /// path are returned unchanged so the innermost path wins.
    pub fn at(self, path: impl Into<String>) -> Self {
        match self {
            Self::At { .. } | Self::Argument { .. } => self,
            other => Self::At {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Attach the top-level command argument that failed.
    pub fn for_argument(self, arg: impl Into<String>) -> Self {
        match self {
            Self::Argument { .. } => self,
            other => Self::Argument {
                arg: arg.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error with every path/argument tag peeled off.
    pub fn root(&self) -> &DosError {
        match self {
            Self::At { source, .. } | Self::Argument { source, .. } => source.root(),
            other => other,
        }
    }

    /// The entry path attached by [`DosError::at`], if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::At { path, .. } => Some(path),
            Self::Argument { source, .. } => source.path(),
            _ => None,
        }
    }

    /// `true` for the "nothing there" family: a missing file or a missing
    /// directory along the path.
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::NotFound | Self::NoPath)
    }

    /// `true` when the error is a command-line usage problem rather than a
    /// volume failure.
    pub fn is_usage(&self) -> bool {
        matches!(
            self.root(),
            Self::InvalidUsage(_) | Self::DestinationRequiresDirectory
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DosError>;
