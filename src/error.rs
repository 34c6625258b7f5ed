use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before any work begins
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GITHUB_TOKEN is not set; export it or add it to a .env file")]
    MissingToken,

    #[error("GITHUB_TOKEN contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("Failed to determine project directories")]
    NoProjectDirs,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors obtaining the search result set. Fatal to the current run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The working directory itself could not be listed
#[derive(Error, Debug)]
#[error("Failed to list working directory {path}: {source}")]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Invalid operator input from the menu
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Invalid operation selected: {0:?}")]
    InvalidOperation(String),

    #[error("Invalid input. Please enter a valid number (got {0:?})")]
    InvalidLimit(String),
}
