// Typed failure modes. Anything that is not one of these travels as a
// plain `anyhow::Error` with context attached.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrelloMoveError {
    #[error("{0} not found in .env file or environment variables")]
    MissingCredential(&'static str),

    #[error("Config file {path} is invalid: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Request to {endpoint} failed: {status} - {body}")]
    RequestFailed {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    /// Carries every candidate name so the caller can show what exists.
    #[error("No matches found for '{needle}'")]
    NoMatch {
        needle: String,
        available: Vec<String>,
    },

    #[error("Selection {choice} is out of range (1-{count})")]
    InvalidSelection { choice: usize, count: usize },

    #[error("No boards available for the authorized account")]
    NoBoards,
}
