//! Error types for tagcheck.
//!
//! Uses thiserror for structured errors with context. Two classes exist:
//! - [`ValidatorError`]: the rule spec or registration is broken. Fatal to
//!   the call, never a partial result.
//! - Validation failures: the data is invalid. These are ordinary values
//!   collected in a [`ValidationResult`](crate::validation::ValidationResult).

use crate::core::path::FieldPath;
use crate::core::types::ValueKind;
use thiserror::Error;

/// Structural and configuration errors.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// A rule spec names neither a rule nor an alias.
    #[error("undefined validation function '{name}' in rule spec \"{spec}\"")]
    UnknownRule {
        /// The unknown name.
        name: String,
        /// The rule spec it appeared in.
        spec: String,
    },

    /// A rule rejected its `=parameter`.
    #[error("invalid parameter {param:?} for rule '{rule}': {reason}")]
    InvalidParameter {
        /// Name of the rule.
        rule: String,
        /// Parameter text, if any was given.
        param: Option<String>,
        /// Why the rule rejected it.
        reason: String,
    },

    /// `keys` was never closed.
    #[error("'keys' without a matching 'endkeys' in rule spec \"{spec}\"")]
    UnmatchedKeys {
        /// The offending rule spec.
        spec: String,
    },

    /// `endkeys` without an open `keys`.
    #[error("'endkeys' without a preceding 'keys' in rule spec \"{spec}\"")]
    UnexpectedEndKeys {
        /// The offending rule spec.
        spec: String,
    },

    /// `keys` not directly after `dive`.
    #[error("'keys' must immediately follow 'dive' in rule spec \"{spec}\"")]
    KeysWithoutDive {
        /// The offending rule spec.
        spec: String,
    },

    /// An alias expands back into itself.
    #[error("alias cycle detected: {}", chain.join(" -> "))]
    AliasCycle {
        /// Alias names in expansion order, ending with the repeated one.
        chain: Vec<String>,
    },

    /// `dive` reached a value without elements.
    #[error("cannot dive into {kind} at '{path}'")]
    DiveOnNonCollection {
        /// Location of the value.
        path: FieldPath,
        /// What the value actually was.
        kind: ValueKind,
    },

    /// `keys` reached a value that is not a map.
    #[error("'keys' applied to non-map {kind} at '{path}'")]
    KeysOnNonMap {
        /// Location of the value.
        path: FieldPath,
        /// What the value actually was.
        kind: ValueKind,
    },

    /// Struct validation was given something else.
    #[error("expected a struct value, got {0}")]
    NotAStruct(ValueKind),

    /// A registration used a name that cannot appear in a rule spec.
    #[error("invalid rule name {0:?}")]
    InvalidRuleName(String),

    /// A schema is inconsistent or a document does not fit it.
    #[error("schema error: {0}")]
    Schema(String),

    /// Reading a config or schema file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A config or schema file is not valid TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A document is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValidatorError {
    /// Whether the error comes from a malformed rule spec.
    pub fn is_spec_error(&self) -> bool {
        matches!(
            self,
            ValidatorError::UnknownRule { .. }
                | ValidatorError::InvalidParameter { .. }
                | ValidatorError::UnmatchedKeys { .. }
                | ValidatorError::UnexpectedEndKeys { .. }
                | ValidatorError::KeysWithoutDive { .. }
                | ValidatorError::AliasCycle { .. }
        )
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ValidatorError::UnknownRule { name, .. } => Some(format!(
                "Register '{}' with register_validation or register_alias",
                name
            )),
            ValidatorError::UnmatchedKeys { .. } => {
                Some("Close the key rules with 'endkeys'".to_string())
            }
            ValidatorError::KeysWithoutDive { .. } => {
                Some("Write 'dive,keys,...,endkeys'".to_string())
            }
            ValidatorError::DiveOnNonCollection { path, .. } => {
                Some(format!("Remove 'dive' from the rules of '{}'", path))
            }
            ValidatorError::AliasCycle { chain } => chain
                .first()
                .map(|name| format!("Alias '{}' must not expand to itself", name)),
            _ => None,
        }
    }
}

/// Result type alias for validator operations.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rule_suggestion() {
        let error = ValidatorError::UnknownRule {
            name: "username".to_string(),
            spec: "required,username".to_string(),
        };
        assert!(error.is_spec_error());
        assert!(error.suggested_fix().unwrap().contains("username"));
        assert!(error.to_string().contains("required,username"));
    }

    #[test]
    fn test_alias_cycle_display() {
        let error = ValidatorError::AliasCycle {
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(error.to_string(), "alias cycle detected: a -> b -> a");
    }

    #[test]
    fn test_walk_errors_are_not_spec_errors() {
        let error = ValidatorError::DiveOnNonCollection {
            path: FieldPath::root().field("Name"),
            kind: ValueKind::String,
        };
        assert!(!error.is_spec_error());
        assert_eq!(error.to_string(), "cannot dive into string at 'Name'");
    }
}
