//! Custom error types for xmldiff.

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML in {path}: {source}")]
    XmlError {
        path: String,
        #[source]
        source: roxmltree::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{role} directory not found: {path}")]
    MissingDirectory { role: &'static str, path: String },

    #[error("{role} path is not a directory: {path}")]
    NotADirectory { role: &'static str, path: String },

    #[error("Failed to read {role} directory {path}: {source}")]
    UnreadableDirectory {
        role: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    ConfigInvalid { path: String, message: String },

    #[error("Usage: {message}")]
    Usage { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write report {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to serialize summary to JSON: {source}")]
    JsonSerializationError {
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a single file pair. Never aborts a batch.
#[derive(Debug, thiserror::Error)]
pub enum PairError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Debug, thiserror::Error)]
pub enum XmlDiffError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl From<PairError> for XmlDiffError {
    fn from(err: PairError) -> Self {
        match err {
            PairError::Parse(e) => XmlDiffError::Parse(e),
            PairError::Report(e) => XmlDiffError::Report(e),
        }
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl ParseError {
    pub fn file_not_found(path: &Path) -> Self {
        Self::FileNotFound {
            path: display(path),
        }
    }

    pub fn read_error(path: &Path, source: std::io::Error) -> Self {
        Self::ReadError {
            path: display(path),
            source,
        }
    }

    pub fn xml_error(path: &Path, source: roxmltree::Error) -> Self {
        Self::XmlError {
            path: display(path),
            source,
        }
    }

    /// The file this error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::FileNotFound { path } => path,
            Self::ReadError { path, .. } => path,
            Self::XmlError { path, .. } => path,
        }
    }
}

impl ConfigError {
    pub fn missing_directory(role: &'static str, path: &Path) -> Self {
        Self::MissingDirectory {
            role,
            path: display(path),
        }
    }

    pub fn not_a_directory(role: &'static str, path: &Path) -> Self {
        Self::NotADirectory {
            role,
            path: display(path),
        }
    }

    pub fn unreadable_directory(role: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::UnreadableDirectory {
            role,
            path: display(path),
            source,
        }
    }

    pub fn config_invalid(path: &Path, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            path: display(path),
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

impl ReportError {
    pub fn write_error(path: &Path, source: std::io::Error) -> Self {
        Self::WriteError {
            path: display(path),
            source,
        }
    }
}
