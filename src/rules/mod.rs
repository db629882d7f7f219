//! Rule module.
//!
//! Contains the rule registry and built-in rule implementations.

pub mod registry;
pub mod builtin;

pub use registry::{RegistryEntry, Resolved, RuleRegistry};
