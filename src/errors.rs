//! Error types for the uptime pinger

use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PingerError>;

#[derive(Debug)]
pub enum PingerError {
    /// IO operation failed
    Io(std::io::Error),

    /// HTTP client could not be built
    Http(reqwest::Error),

    /// JSON serialization/deserialization failed
    Json(serde_json::Error),

    /// Configuration or service list error
    Config(String),

    /// The status document could not be written
    Persist {
        path: PathBuf,
        source: Box<PingerError>,
    },
}

impl fmt::Display for PingerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PingerError::Io(err) => write!(f, "IO error: {}", err),
            PingerError::Http(err) => write!(f, "HTTP error: {}", err),
            PingerError::Json(err) => write!(f, "JSON error: {}", err),
            PingerError::Config(msg) => write!(f, "Configuration error: {}", msg),
            PingerError::Persist { path, source } => {
                write!(f, "Failed to write status document {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for PingerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PingerError::Io(err) => Some(err),
            PingerError::Http(err) => Some(err),
            PingerError::Json(err) => Some(err),
            PingerError::Persist { source, .. } => Some(source.as_ref()),
            PingerError::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for PingerError {
    fn from(err: std::io::Error) -> Self {
        PingerError::Io(err)
    }
}

impl From<reqwest::Error> for PingerError {
    fn from(err: reqwest::Error) -> Self {
        PingerError::Http(err)
    }
}

impl From<serde_json::Error> for PingerError {
    fn from(err: serde_json::Error) -> Self {
        PingerError::Json(err)
    }
}
