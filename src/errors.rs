//! Error handling for the idcheck host and CLI.

use std::path::PathBuf;

use idcheck_core_types::CoreError;
use thiserror::Error;
use view_checker::CheckerError;

#[derive(Debug, Error)]
pub enum IdcheckError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unsupported tree file {0}: expected .json, .yaml or .yml")]
    UnsupportedFormat(PathBuf),
    #[error("class {class} extends unknown class {parent}")]
    UnknownSuperclass { class: String, parent: String },
    #[error("class {class} is built in and cannot be redeclared as a subclass of {parent}")]
    BuiltinRedefinition { class: String, parent: String },
    #[error("class hierarchy has a cycle through {0}")]
    ClassCycle(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Checker(#[from] CheckerError),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl IdcheckError {
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IdcheckError>;
