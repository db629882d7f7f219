//! Validator configuration.
//!
//! A [`ValidatorConfig`] lists what a new [`Validator`](crate::Validator)
//! should have registered before any validation runs. Aliases may come
//! from TOML; rules are code and are attached with
//! [`with_rule`](ValidatorConfig::with_rule) or
//! [`with_fn`](ValidatorConfig::with_fn).
//!
//! # Example TOML
//! ```toml
//! [aliases]
//! varchar = "required,max=255"
//! name = "varchar,alpha"
//! ```

use crate::core::context::RuleContext;
use crate::core::error::ValidatorResult;
use crate::core::rule::{FnRule, Rule};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Aliases and rules to pre-register.
#[derive(Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Alias name to expansion, in declaration order.
    pub aliases: IndexMap<String, String>,
    /// Custom rules, in registration order.
    #[serde(skip)]
    rules: Vec<(String, Arc<dyn Rule>)>,
}

impl ValidatorConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ValidatorResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ValidatorResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Add an alias.
    pub fn with_alias(mut self, name: &str, expansion: &str) -> Self {
        self.aliases.insert(name.to_string(), expansion.to_string());
        self
    }

    /// Add a rule.
    pub fn with_rule(mut self, name: &str, rule: Arc<dyn Rule>) -> Self {
        self.rules.push((name.to_string(), rule));
        self
    }

    /// Add a closure as a rule.
    pub fn with_fn<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.with_rule(name, Arc::new(FnRule::new(f)))
    }

    /// Custom rules with their names.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Arc<dyn Rule>)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Merge another configuration into this one. Later entries win.
    pub fn merge(&mut self, other: ValidatorConfig) {
        self.aliases.extend(other.aliases);
        self.rules.extend(other.rules);
    }
}

impl std::fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("aliases", &self.aliases)
            .field(
                "rules",
                &self.rules.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
