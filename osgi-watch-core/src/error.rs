//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error in {context}: {error}")]
    Toml {
        error: toml::de::Error,
        context: String,
    },

    #[error("Config file not found: {0}. Expected 'osgi-watch.toml' in the project directory.")]
    ConfigNotFound(PathBuf),

    #[error("Invalid glob pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    #[error("Failed to run '{program}': {message}")]
    ToolSpawn { program: String, message: String },

    #[error("'{program}' exited with {status}")]
    ToolFailed {
        program: String,
        status: String,
        output: String,
    },

    #[error("Task {task} is not available for {mode} projects")]
    TaskUnavailable { task: String, mode: String },

    #[error("Watcher error: {0}")]
    Watcher(String),

    #[error("Live reload error: {0}")]
    LiveReload(String),
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Toml {
            error,
            context: "osgi-watch.toml".to_string(),
        }
    }
}

impl From<notify::Error> for Error {
    fn from(error: notify::Error) -> Self {
        Error::Watcher(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
