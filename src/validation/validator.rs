//! The validator entry point.
//!
//! A [`Validator`] owns a rule registry and a cache of compiled specs, and
//! runs walk, evaluate and aggregate for every call. Registration takes
//! `&mut self`; validation takes `&self` and may run on many threads once
//! registration is done.

use crate::config::ValidatorConfig;
use crate::core::context::{RuleContext, Siblings};
use crate::core::error::{ValidatorError, ValidatorResult};
use crate::core::rule::Rule;
use crate::core::types::{ToValue, Value};
use crate::rules::registry::RuleRegistry;
use crate::validation::cache::{CacheStats, SpecCache};
use crate::validation::evaluator;
use crate::validation::result::ValidationResult;
use crate::validation::tags::{self, CompiledSpec};
use crate::validation::walker::{Visit, Walker};
use log::debug;
use std::sync::Arc;

/// Tag-driven validator.
///
/// # Example
///
/// ```rust
/// use tagcheck::prelude::*;
///
/// let validator = Validator::new();
/// let user = StructValue::new("LoginRequest")
///     .field("Username", "eko@example.com", "required,email")
///     .field("Password", "eko", "required,min=5");
///
/// let result = validator.validate(&user).unwrap();
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.failures()[0].path.to_string(), "Password");
/// ```
#[derive(Debug)]
pub struct Validator {
    registry: RuleRegistry,
    cache: SpecCache,
}

impl Validator {
    /// Create a validator with the builtin rules.
    pub fn new() -> Self {
        Self {
            registry: RuleRegistry::with_builtins(),
            cache: SpecCache::new(),
        }
    }

    /// Create a validator with the builtin rules plus everything in `config`.
    pub fn with_config(config: ValidatorConfig) -> ValidatorResult<Self> {
        let mut validator = Self::new();
        for (name, rule) in config.rules() {
            validator.register_rule(name, Arc::clone(rule))?;
        }
        for (name, expansion) in &config.aliases {
            validator.register_alias(name, expansion)?;
        }
        debug!(
            "Validator configured with {} aliases and {} custom rules",
            config.aliases.len(),
            config.rules().count()
        );
        Ok(validator)
    }

    /// Register an alias. Re-registering a name replaces it.
    pub fn register_alias(&mut self, name: &str, expansion: &str) -> ValidatorResult<()> {
        self.registry.register_alias(name, expansion)?;
        self.cache.clear();
        debug!("Registered alias '{}' -> \"{}\"", name, expansion);
        Ok(())
    }

    /// Register a closure as a rule. Re-registering a name replaces it.
    pub fn register_validation<F>(&mut self, name: &str, f: F) -> ValidatorResult<()>
    where
        F: Fn(&RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.registry.register_fn(name, f)?;
        self.cache.clear();
        debug!("Registered validation '{}'", name);
        Ok(())
    }

    /// Register a rule object. Re-registering a name replaces it.
    pub fn register_rule(&mut self, name: &str, rule: Arc<dyn Rule>) -> ValidatorResult<()> {
        self.registry.register(name, rule)?;
        self.cache.clear();
        debug!("Registered rule '{}'", name);
        Ok(())
    }

    /// Validate a single value against a rule spec.
    pub fn var(&self, value: &Value, spec: &str) -> ValidatorResult<ValidationResult> {
        self.run(|walker, f| walker.walk_value(value, spec, Siblings::None, f))
    }

    /// Validate a value against a rule spec, with `other` as the value
    /// cross-field rules compare against.
    pub fn var_with_value(
        &self,
        value: &Value,
        other: &Value,
        spec: &str,
    ) -> ValidatorResult<ValidationResult> {
        self.run(|walker, f| walker.walk_value(value, spec, Siblings::Value(other), f))
    }

    /// Validate a struct value using the specs its fields carry.
    pub fn validate_struct(&self, value: &Value) -> ValidatorResult<ValidationResult> {
        let root = value
            .as_struct()
            .ok_or_else(|| ValidatorError::NotAStruct(value.kind()))?;
        self.run(|walker, f| walker.walk_struct(root, f))
    }

    /// Validate anything that describes itself as a struct value.
    pub fn validate<T: ToValue + ?Sized>(&self, value: &T) -> ValidatorResult<ValidationResult> {
        self.validate_struct(&value.to_value())
    }

    /// Compile a rule spec without validating anything.
    pub fn compile(&self, spec: &str) -> ValidatorResult<Arc<CompiledSpec>> {
        self.cache.get_or_compile(spec, &self.registry)
    }

    /// Check a rule spec for structural errors.
    pub fn check_spec(&self, spec: &str) -> ValidatorResult<()> {
        tags::compile(spec, &self.registry).map(|_| ())
    }

    /// Compiled spec cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The registry of rules and aliases.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    fn run<W>(&self, walk: W) -> ValidatorResult<ValidationResult>
    where
        W: FnOnce(&Walker<'_>, &mut dyn FnMut(Visit<'_>)) -> ValidatorResult<()>,
    {
        let walker = Walker::new(&self.registry, &self.cache);
        let mut result = ValidationResult::new();
        walk(&walker, &mut |visit: Visit<'_>| {
            evaluator::evaluate_visit(&visit, &mut result)
        })?;
        debug!("Validation finished with {} failure(s)", result.len());
        Ok(result)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
