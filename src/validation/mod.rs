//! Validation engine.
//!
//! A call flows through four stages:
//! 1. [`tags`] parses each rule spec (cached by [`cache`])
//! 2. [`walker`] flattens the value into visits
//! 3. [`evaluator`] runs the rules of each visit
//! 4. [`result`] collects the failures in walk order
//!
//! [`Validator`] ties them together.

pub mod cache;
pub mod evaluator;
pub mod result;
pub mod tags;
pub mod validator;
pub mod walker;

pub use cache::{CacheStats, SpecCache};
pub use result::{ValidationFailure, ValidationResult};
pub use tags::{CompiledSpec, DiveSpec, RuleInvocation, Token};
pub use validator::Validator;
pub use walker::{Visit, Walker};
