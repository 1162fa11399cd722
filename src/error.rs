/// Error types for helpdesk-learning
///
/// This module defines all possible errors that can occur in the learning core.
/// Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for learning operations
#[derive(Error, Debug)]
pub enum LearningError {
    /// I/O errors (creating the data directory, writing the snapshot)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file exists but is not valid learning data
    #[error("Corrupt learning snapshot at {}: {source}", .path.display())]
    CorruptSnapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Imported payload is not a learning snapshot
    #[error("Invalid import: {0}")]
    InvalidImport(String),

    /// Action type outside the known set
    #[error("Unknown action type: {0}")]
    UnknownActionType(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for learning operations
pub type Result<T> = std::result::Result<T, LearningError>;

/// Convert LearningError to a user-friendly error message
impl LearningError {
    pub fn user_message(&self) -> String {
        match self {
            LearningError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            LearningError::CorruptSnapshot { path, .. } => {
                format!(
                    "Learning data at {} is damaged. Back it up or delete it to start fresh.",
                    path.display()
                )
            }
            LearningError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            LearningError::InvalidImport(reason) => {
                format!("Could not import learning data: {}", reason)
            }
            LearningError::UnknownActionType(kind) => {
                format!("'{}' is not a trackable action", kind)
            }
            LearningError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = LearningError::UnknownActionType("dance".to_string());
        assert!(err.user_message().contains("dance"));

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = LearningError::CorruptSnapshot {
            path: PathBuf::from("/tmp/learning.json"),
            source,
        };
        assert!(err.user_message().contains("/tmp/learning.json"));
    }

    #[test]
    fn test_error_display() {
        let err = LearningError::Config("max actions must be positive".to_string());
        let display = format!("{}", err);
        assert!(display.contains("Configuration error"));
    }
}
