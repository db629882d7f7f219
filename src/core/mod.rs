//! Core types and traits for the tagcheck validation engine.
//!
//! This module contains the foundational types the engine is built on:
//! - Value types (strings, numbers, collections, structs)
//! - Field paths used in failure reports
//! - The rule trait and typed rule parameters
//! - Rule evaluation context
//! - Error types

pub mod types;
pub mod path;
pub mod error;
pub mod context;
pub mod rule;

// Re-export commonly used types
pub use types::{Field, MapKey, StructValue, ToValue, Value, ValueKind};
pub use path::{FieldPath, PathSegment};
pub use error::{ValidatorError, ValidatorResult};
pub use context::{RuleContext, Siblings};
pub use rule::{FnRule, Parameter, Rule, RuleCategory};
