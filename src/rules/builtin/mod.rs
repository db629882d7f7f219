//! Built-in rule implementations.
//!
//! This module contains the standard rules that ship with tagcheck.

mod presence;
mod comparison;
mod fields;
mod format;

use crate::rules::registry::RuleRegistry;

/// Register all built-in rules.
pub fn register_all(registry: &mut RuleRegistry) {
    presence::register(registry);
    comparison::register(registry);
    fields::register(registry);
    format::register(registry);
}

// Re-export for direct access
pub use presence::Required;
pub use comparison::{Compare, Equals, Relation};
pub use fields::FieldCompare;
pub use format::{OneOf, Pattern};
