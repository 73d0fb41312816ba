//! Error types for game data loading.

use thiserror::Error;

/// Errors that can occur when loading weapon or settings data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A value parsed but makes no sense for the game.
    #[error("Invalid {field} in '{name}': {details}")]
    InvalidValue {
        name: String,
        field: &'static str,
        details: String,
    },
}
