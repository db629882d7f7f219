//! # tagcheck - Tag-driven Value Validation
//!
//! tagcheck validates values against rule specs written in the familiar
//! struct-tag grammar: `required,min=5,eqfield=Password`. Every field of a
//! struct value carries its own spec, and the validator walks the value,
//! evaluates every rule and returns all failures at once.
//!
//! ## Features
//!
//! - **Rule specs**: comma separated rules with optional `=parameter`
//! - **Nested values**: structs inside structs, arrays and maps
//! - **Diving**: `dive` applies rules to every element, `keys ... endkeys`
//!   to map keys
//! - **Cross-field rules**: `eqfield`, `gtfield` and friends compare
//!   siblings in the same struct
//! - **Extensible**: aliases and custom rules through the [`Rule`] trait
//!   or plain closures
//! - **Schemas**: bind JSON documents to struct shapes declared in TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use tagcheck::prelude::*;
//!
//! struct RegisterUser {
//!     username: String,
//!     password: String,
//!     confirm_password: String,
//! }
//!
//! impl ToValue for RegisterUser {
//!     fn to_value(&self) -> Value {
//!         StructValue::new("RegisterUser")
//!             .field("Username", self.username.as_str(), "required,email")
//!             .field("Password", self.password.as_str(), "required,min=5")
//!             .field(
//!                 "ConfirmPassword",
//!                 self.confirm_password.as_str(),
//!                 "required,min=5,eqfield=Password",
//!             )
//!             .into()
//!     }
//! }
//!
//! let mut validator = Validator::new();
//! validator.register_alias("varchar", "required,max=255").unwrap();
//!
//! let request = RegisterUser {
//!     username: "eko@example.com".to_string(),
//!     password: "eko1234".to_string(),
//!     confirm_password: "eko".to_string(),
//! };
//!
//! let result = validator.validate(&request).unwrap();
//! for failure in &result {
//!     println!("{}", failure);
//! }
//! assert_eq!(result.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: values, paths, the rule trait and error types
//! - [`rules`]: the rule registry and builtin rules
//! - [`validation`]: spec parsing, walking, evaluation and results
//! - [`config`]: validator configuration loaded from TOML
//! - [`schema`]: companion schemas for JSON documents
//!
//! Errors come in two classes. A broken rule spec is a
//! [`ValidatorError`](core::error::ValidatorError) and aborts the call;
//! invalid data is reported in an `Ok(`[`ValidationResult`]`)`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod rules;
pub mod schema;
pub mod validation;

pub use crate::core::rule::Rule;
pub use crate::validation::{ValidationResult, Validator};

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use tagcheck::prelude::*;
/// ```
pub mod prelude {
    // Values
    pub use crate::core::types::{
        Field, MapKey, Measure, StructValue, ToValue, Value, ValueKind,
    };
    pub use crate::core::path::{FieldPath, PathSegment};

    // Rules
    pub use crate::core::context::{RuleContext, Siblings};
    pub use crate::core::rule::{FnRule, Parameter, Rule, RuleCategory};
    pub use crate::rules::registry::RuleRegistry;

    // Errors
    pub use crate::core::error::{ValidatorError, ValidatorResult};

    // Validation
    pub use crate::validation::{ValidationFailure, ValidationResult, Validator};

    // Configuration
    pub use crate::config::ValidatorConfig;
    pub use crate::schema::Schema;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
