//! Structured error types for the grid engine.
//!
//! Almost nothing in a widget grid is worth failing over: a full grid is a
//! `None`, an unknown widget is a `false`, and a malformed size is zero. What
//! remains is a missing container and unreadable input.

use thiserror::Error;

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum GridError {
    /// The container a grid was asked to mount on does not exist.
    #[error("container not found: `{0}`")]
    ContainerMissing(String),

    /// Scene or configuration JSON failed to parse.
    #[error("failed to parse scene: {source}{}", hint_suffix(.hint))]
    ParseError {
        source: serde_json::Error,
        hint: String,
    },

    /// A scene was well-formed JSON but described something impossible.
    #[error("invalid scene: {0}")]
    InvalidScene(String),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for GridError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the scene schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        GridError::ParseError { source: e, hint }
    }
}
