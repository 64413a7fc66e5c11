use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LdmError {
    /// Device source unreachable or inconsistent at snapshot time
    #[error("Device backend error: {0}")]
    Backend(String),

    /// Malformed line in a modalias database
    #[error("Malformed modalias database '{}' at line {line}: {message}", path.display())]
    Database {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("IO error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No GPU devices found")]
    NoGpu,

    #[error("Plugin '{0}' is already registered")]
    PluginExists(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LdmError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LdmError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn database(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        LdmError::Database {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LdmError>;
