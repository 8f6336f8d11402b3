use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error for the fallible edges of the notifier (startup config, logger, scheduling).
///
/// The assertion path itself never produces one of these.
#[derive(Debug)]
pub enum NotifierError {
    /// Startup config file exists but could not be read.
    ConfigRead { path: PathBuf, source: io::Error },

    /// Startup config file could not be parsed.
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Notifications were not authorized for this process.
    NotAuthorized,

    /// Generic error (fallback).
    Other(String),
}

impl NotifierError {
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl fmt::Display for NotifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifierError::ConfigRead { path, source } => {
                write!(f, "startup config read failed: path={path:?} err={source}")
            }
            NotifierError::ConfigParse { path, source } => {
                write!(f, "startup config parse failed (json): path={path:?} err={source}")
            }
            NotifierError::NotAuthorized => write!(f, "notifications not authorized"),
            NotifierError::Other(s) => write!(f, "{s}"),
        }
    }
}

impl Error for NotifierError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NotifierError::ConfigRead { source, .. } => Some(source),
            NotifierError::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<&str> for NotifierError {
    #[inline]
    fn from(value: &str) -> Self {
        NotifierError::Other(value.to_string())
    }
}

impl From<String> for NotifierError {
    #[inline]
    fn from(value: String) -> Self {
        NotifierError::Other(value)
    }
}

pub type NotifierResult<T> = Result<T, NotifierError>;
