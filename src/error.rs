/// Error types for gloss
///
/// User-facing outcomes like "no such term" or "that's a reserved word" are
/// not errors; they live in the dispatcher's outcome enums. This module only
/// covers things that actually went wrong.

use thiserror::Error;

/// Main error type for gloss operations
#[derive(Error, Debug)]
pub enum GlossError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A built-in pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A store implementation failed for a reason that isn't a database error
    #[error("Store error: {0}")]
    Store(String),

    /// Snapshot data can't be imported as-is
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type alias for gloss operations
pub type Result<T> = std::result::Result<T, GlossError>;

impl GlossError {
    /// Convert a GlossError to a message fit for a chat reply
    pub fn user_message(&self) -> String {
        match self {
            GlossError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            GlossError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            GlossError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            GlossError::Pattern(e) => {
                format!("Internal pattern error: {}", e)
            }
            GlossError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            GlossError::Store(msg) => {
                format!("The glossary store failed: {}", msg)
            }
            GlossError::InvalidSnapshot(msg) => {
                format!("That snapshot can't be imported: {}", msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = GlossError::Config("GLOSS_BROADCAST must be a boolean".to_string());
        assert!(err.user_message().contains("GLOSS_BROADCAST"));

        let err = GlossError::Store("disk on fire".to_string());
        assert!(err.user_message().contains("disk on fire"));
    }

    #[test]
    fn test_error_display() {
        let err = GlossError::InvalidSnapshot("duplicate term EW".to_string());
        let display = format!("{}", err);
        assert!(display.contains("Invalid snapshot"));
        assert!(display.contains("EW"));
    }
}
