//! Validation failures and their aggregation.

use crate::core::path::FieldPath;
use crate::core::types::Value;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// One violated rule at one location.
///
/// Serializes with an extra `key` flag, since a map key and the value
/// stored under it render to the same path text.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    /// Where the failing value lives.
    pub path: FieldPath,
    /// Name the rule was written as: the alias, if it came from one.
    pub tag: String,
    /// Registered name of the rule that failed.
    pub rule: String,
    /// Parameter text, if the rule had one.
    pub param: Option<String>,
    /// The offending value.
    pub value: Value,
}

impl ValidationFailure {
    /// Innermost field name with any index or key suffix, e.g. `Hobbies[2]`.
    pub fn field(&self) -> String {
        self.path.leaf()
    }
}

impl Serialize for ValidationFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationFailure", 6)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("key", &self.path.is_key())?;
        state.serialize_field("tag", &self.tag)?;
        state.serialize_field("rule", &self.rule)?;
        state.serialize_field("param", &self.param)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Key: '{}' Error:Field validation for '{}' failed on the '{}' tag",
            self.path,
            self.field(),
            self.tag
        )
    }
}

/// Ordered failures of one validation call. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    /// Create an empty (valid) result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a failure.
    pub fn push(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }

    /// Check if there are no failures.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Alias of [`is_empty`](Self::is_empty).
    pub fn is_valid(&self) -> bool {
        self.is_empty()
    }

    /// Number of failures.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// All failures in walk order.
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Iterate over failures.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationFailure> {
        self.failures.iter()
    }

    /// Failures whose rendered path equals `path`.
    pub fn for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationFailure> {
        self.failures
            .iter()
            .filter(move |failure| failure.path.to_string() == path)
    }

    /// Consume the result, returning the failures.
    pub fn into_inner(self) -> Vec<ValidationFailure> {
        self.failures
    }

    /// `Ok(())` when valid, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            "✓ Value is valid".to_string()
        } else {
            format!("✗ Validation failed with {} error(s)", self.len())
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationResult {}

impl IntoIterator for ValidationResult {
    type Item = ValidationFailure;
    type IntoIter = std::vec::IntoIter<ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = &'a ValidationFailure;
    type IntoIter = std::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
