//! Rule registry for managing available rules and aliases.

use crate::core::context::RuleContext;
use crate::core::error::{ValidatorError, ValidatorResult};
use crate::core::rule::{FnRule, Rule, RuleCategory};
use indexmap::IndexMap;
use log::{debug, warn};
use std::sync::Arc;

/// Names reserved for structural markers in rule specs.
pub const MARKERS: &[&str] = &["dive", "keys", "endkeys", "omitempty", "-"];

/// Registry entry containing the evaluator and its origin.
#[derive(Clone)]
pub struct RegistryEntry {
    /// The evaluator.
    pub rule: Arc<dyn Rule>,
    /// Whether this rule ships with the crate.
    pub builtin: bool,
}

/// What a name in a rule spec resolves to.
pub enum Resolved<'a> {
    /// An alias and its expansion text.
    Alias(&'a str),
    /// A registered rule.
    Rule(&'a Arc<dyn Rule>),
}

/// Registry for all available rules and aliases.
///
/// Registering a name that already exists overwrites the previous entry.
/// Aliases are stored as raw text and expanded only when a spec is parsed,
/// so an alias may be registered before the rules it mentions.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    /// Rules indexed by name, in registration order.
    rules: IndexMap<String, RegistryEntry>,
    /// Alias name to expansion text.
    aliases: IndexMap<String, String>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with built-in rules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::rules::builtin::register_all(&mut registry);
        debug!("Registered {} built-in rules", registry.len());
        registry
    }

    /// Register a rule, replacing any rule of the same name.
    pub fn register(&mut self, name: &str, rule: Arc<dyn Rule>) -> ValidatorResult<()> {
        check_name(name)?;
        if let Some(previous) = self.rules.get(name) {
            if previous.builtin {
                warn!("Rule '{}' overrides a built-in rule", name);
            } else {
                debug!("Rule '{}' re-registered", name);
            }
        }
        self.rules.insert(
            name.to_string(),
            RegistryEntry {
                rule,
                builtin: false,
            },
        );
        Ok(())
    }

    /// Register a closure as a rule.
    pub fn register_fn<F>(&mut self, name: &str, f: F) -> ValidatorResult<()>
    where
        F: Fn(&RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.register(name, Arc::new(FnRule::new(f)))
    }

    /// Register a built-in rule. Names are trusted.
    pub(crate) fn register_builtin<R: Rule + 'static>(&mut self, name: &str, rule: R) {
        self.rules.insert(
            name.to_string(),
            RegistryEntry {
                rule: Arc::new(rule),
                builtin: true,
            },
        );
    }

    /// Register an alias expanding to a rule spec fragment.
    pub fn register_alias(&mut self, name: &str, expansion: &str) -> ValidatorResult<()> {
        check_name(name)?;
        if self.aliases.contains_key(name) {
            debug!("Alias '{}' re-registered", name);
        }
        self.aliases.insert(name.to_string(), expansion.to_string());
        Ok(())
    }

    /// Resolve a name from a rule spec. Aliases shadow rules.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
        if let Some(expansion) = self.aliases.get(name) {
            return Some(Resolved::Alias(expansion));
        }
        self.rules.get(name).map(|e| Resolved::Rule(&e.rule))
    }

    /// Get a rule by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Rule>> {
        self.rules.get(name).map(|e| Arc::clone(&e.rule))
    }

    /// Get a registry entry.
    pub fn get_entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.rules.get(name)
    }

    /// Get an alias expansion.
    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(|s| s.as_str())
    }

    /// Check if a rule or alias is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Get all registered rule names.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|s| s.as_str())
    }

    /// Get all registered aliases with their expansions.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Get the total number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Get rules grouped by category for display.
    pub fn grouped_by_category(&self) -> IndexMap<RuleCategory, Vec<(&str, &RegistryEntry)>> {
        let mut grouped: IndexMap<RuleCategory, Vec<(&str, &RegistryEntry)>> = IndexMap::new();

        for (name, entry) in &self.rules {
            grouped
                .entry(entry.rule.category())
                .or_default()
                .push((name.as_str(), entry));
        }

        grouped.sort_keys();
        for rules in grouped.values_mut() {
            rules.sort_by(|a, b| a.0.cmp(b.0));
        }

        grouped
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}

fn check_name(name: &str) -> ValidatorResult<()> {
    let malformed = name.is_empty()
        || name.contains(|c: char| c == ',' || c == '=' || c.is_whitespace());
    if malformed || MARKERS.contains(&name) {
        return Err(ValidatorError::InvalidRuleName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_present() {
        let registry = RuleRegistry::with_builtins();
        for name in ["required", "numeric", "min", "max", "gt", "eqfield", "email"] {
            assert!(registry.contains(name), "missing builtin '{}'", name);
        }
        assert!(registry.get_entry("required").unwrap().builtin);
    }

    #[test]
    fn test_register_fn_overwrites() {
        let mut registry = RuleRegistry::new();
        registry.register_fn("always", |_| true).unwrap();
        registry.register_fn("always", |_| false).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(!registry.get_entry("always").unwrap().builtin);
    }

    #[test]
    fn test_alias_shadows_rule() {
        let mut registry = RuleRegistry::with_builtins();
        registry.register_alias("min", "required").unwrap();
        assert!(matches!(registry.resolve("min"), Some(Resolved::Alias("required"))));
        assert!(matches!(registry.resolve("max"), Some(Resolved::Rule(_))));
        assert!(registry.resolve("nope").is_none());
    }

    #[test]
    fn test_reserved_names_rejected() {
        let mut registry = RuleRegistry::new();
        assert!(registry.register_alias("dive", "required").is_err());
        assert!(registry.register_fn("", |_| true).is_err());
        assert!(registry.register_fn("a,b", |_| true).is_err());
        assert!(registry.register_fn("min=3", |_| true).is_err());
    }

    #[test]
    fn test_grouping() {
        let mut registry = RuleRegistry::with_builtins();
        registry.register_fn("username", |_| true).unwrap();

        let grouped = registry.grouped_by_category();
        let custom = &grouped[&RuleCategory::Custom];
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].0, "username");
        assert!(grouped[&RuleCategory::Presence]
            .iter()
            .any(|(name, _)| *name == "required"));
    }
}
