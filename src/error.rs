//! Error types for operations that can be refused
//!
//! Nothing in the frame loop is fatal. Fallible operations return `SimError`
//! and the session turns it into a user-facing notice.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// An operation needs a selected object and none is selected
    #[error("select an object before using {operation}")]
    NoSelection { operation: &'static str },

    /// Not one of the gravity preset names
    #[error("unknown gravity preset `{0}`")]
    UnknownPreset(String),

    /// Action name from the host does not map to a UI action
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    /// Settings JSON could not be parsed
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = SimError::NoSelection {
            operation: "gravity",
        };
        assert_eq!(err.to_string(), "select an object before using gravity");

        let err = SimError::UnknownPreset("mars".into());
        assert!(err.to_string().contains("mars"));
    }

    #[test]
    fn test_settings_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SimError = parse.into();
        assert!(matches!(err, SimError::InvalidSettings(_)));
    }
}
