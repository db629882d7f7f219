//! Value walking.
//!
//! The walker flattens a value into a stream of [`Visit`]s, one for every
//! location that carries rules. It follows the structural markers of each
//! compiled spec:
//! - fields of a struct are visited in declaration order, each with its own
//!   spec and the struct as sibling context
//! - `dive` descends into array elements in order, or into map entries in
//!   ascending key order, visiting the key before its value
//! - a struct is descended into after its own rules have been visited; a
//!   bare trailing `dive` on a struct means the same thing
//!
//! Visits are handed to a callback instead of being collected, since map
//! keys are materialized as temporary values while they are visited.

use crate::core::context::Siblings;
use crate::core::error::{ValidatorError, ValidatorResult};
use crate::core::path::{FieldPath, PathSegment};
use crate::core::types::{StructValue, Value};
use crate::rules::registry::RuleRegistry;
use crate::validation::cache::SpecCache;
use crate::validation::tags::{CompiledSpec, DiveSpec, RuleInvocation};
use log::trace;

/// One location to evaluate.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// Where the value lives.
    pub path: &'a FieldPath,
    /// The value under test.
    pub value: &'a Value,
    /// Rules to run, in spec order. Never empty.
    pub rules: &'a [RuleInvocation],
    /// Name of the enclosing struct field, if any.
    pub field: Option<&'a str>,
    /// What cross-field rules compare against.
    pub siblings: Siblings<'a>,
}

/// Walks values using specs compiled through a shared cache.
#[derive(Debug, Clone, Copy)]
pub struct Walker<'a> {
    registry: &'a RuleRegistry,
    cache: &'a SpecCache,
}

impl<'a> Walker<'a> {
    /// Create a walker over the given registry and cache.
    pub fn new(registry: &'a RuleRegistry, cache: &'a SpecCache) -> Self {
        Self { registry, cache }
    }

    /// Walk every field of a struct, using the specs the fields carry.
    pub fn walk_struct<F>(&self, root: &StructValue, f: &mut F) -> ValidatorResult<()>
    where
        F: FnMut(Visit<'_>) + ?Sized,
    {
        self.fields(&FieldPath::root(), root, f)
    }

    /// Walk a single value under an explicit spec.
    pub fn walk_value<F>(
        &self,
        value: &Value,
        spec: &str,
        siblings: Siblings<'_>,
        f: &mut F,
    ) -> ValidatorResult<()>
    where
        F: FnMut(Visit<'_>) + ?Sized,
    {
        let compiled = self.cache.get_or_compile(spec, self.registry)?;
        self.apply(&FieldPath::root(), value, &compiled, None, siblings, f)
    }

    fn fields<F>(&self, path: &FieldPath, parent: &StructValue, f: &mut F) -> ValidatorResult<()>
    where
        F: FnMut(Visit<'_>) + ?Sized,
    {
        for (name, field) in parent.fields() {
            let compiled = self.cache.get_or_compile(&field.rules, self.registry)?;
            let path = path.field(name);
            self.apply(
                &path,
                &field.value,
                &compiled,
                Some(name),
                Siblings::Struct(parent),
                f,
            )?;
        }
        Ok(())
    }

    fn apply<F>(
        &self,
        path: &FieldPath,
        value: &Value,
        spec: &CompiledSpec,
        field: Option<&str>,
        siblings: Siblings<'_>,
        f: &mut F,
    ) -> ValidatorResult<()>
    where
        F: FnMut(Visit<'_>) + ?Sized,
    {
        if spec.skip || (spec.omit_empty && value.is_zero()) {
            trace!("Skipping '{}'", path);
            return Ok(());
        }

        if !spec.rules.is_empty() {
            trace!("Visiting '{}' with {} rules", path, spec.rules.len());
            f(Visit {
                path,
                value,
                rules: &spec.rules,
                field,
                siblings,
            });
        }

        match (&spec.dive, value) {
            (Some(dive), _) => self.dive(path, value, dive, field, siblings, f),
            (None, Value::Struct(inner)) => self.fields(path, inner, f),
            (None, _) => Ok(()),
        }
    }

    fn dive<F>(
        &self,
        path: &FieldPath,
        value: &Value,
        dive: &DiveSpec,
        field: Option<&str>,
        siblings: Siblings<'_>,
        f: &mut F,
    ) -> ValidatorResult<()>
    where
        F: FnMut(Visit<'_>) + ?Sized,
    {
        match value {
            Value::Null => Ok(()),
            Value::Array(items) => {
                if dive.keys.is_some() {
                    return Err(ValidatorError::KeysOnNonMap {
                        path: path.clone(),
                        kind: value.kind(),
                    });
                }
                for (i, item) in items.iter().enumerate() {
                    let path = path.child(PathSegment::Index(i));
                    self.apply(&path, item, &dive.elements, field, siblings, f)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                for (key, item) in entries {
                    if let Some(keys) = &dive.keys {
                        let key_value = key.to_value();
                        let path = path.child(PathSegment::Key(key.clone()));
                        self.apply(&path, &key_value, keys, field, siblings, f)?;
                    }
                    let path = path.child(PathSegment::Entry(key.clone()));
                    self.apply(&path, item, &dive.elements, field, siblings, f)?;
                }
                Ok(())
            }
            Value::Struct(inner) if dive.keys.is_none() && dive.elements.is_empty() => {
                self.fields(path, inner, f)
            }
            other => Err(ValidatorError::DiveOnNonCollection {
                path: path.clone(),
                kind: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MapKey;
    use std::collections::BTreeMap;

    fn collect_struct(root: &StructValue) -> ValidatorResult<Vec<(String, Vec<String>)>> {
        let registry = RuleRegistry::with_builtins();
        let cache = SpecCache::new();
        let mut seen: Vec<(String, Vec<String>)> = Vec::new();
        Walker::new(&registry, &cache).walk_struct(root, &mut |visit: Visit<'_>| {
            let tags: Vec<String> = visit.rules.iter().map(|r| r.tag.clone()).collect();
            seen.push((visit.path.to_string(), tags));
        })?;
        Ok(seen)
    }

    fn paths(seen: &[(String, Vec<String>)]) -> Vec<&str> {
        seen.iter().map(|(p, _)| p.as_str()).collect()
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let root = StructValue::new("LoginRequest")
            .field("Username", "eko", "required,email")
            .field("Note", "", "")
            .field("Password", "x", "required,min=5");

        let seen = collect_struct(&root).unwrap();
        assert_eq!(paths(&seen), vec!["Username", "Password"]);
        assert_eq!(seen[1].1, vec!["required", "min"]);
    }

    #[test]
    fn test_nested_struct_rules_before_descent() {
        let address = StructValue::new("Address")
            .field("City", "", "required")
            .field("Country", "", "required");
        let root = StructValue::new("User")
            .field("Id", "", "required")
            .field("Address", address, "required");

        let seen = collect_struct(&root).unwrap();
        assert_eq!(
            paths(&seen),
            vec!["Id", "Address", "Address.City", "Address.Country"]
        );
    }

    #[test]
    fn test_dive_into_struct_elements() {
        let address = |city: &str| StructValue::new("Address").field("City", city, "required");
        let root = StructValue::new("User").field(
            "Addresses",
            vec![address("Jakarta"), address("")],
            "required,dive",
        );

        let seen = collect_struct(&root).unwrap();
        assert_eq!(
            paths(&seen),
            vec!["Addresses", "Addresses[0].City", "Addresses[1].City"]
        );
    }

    #[test]
    fn test_map_keys_then_values_in_key_order() {
        let mut wallet = BTreeMap::new();
        wallet.insert("MANDIRI", 0i64);
        wallet.insert("BCA", 1_000_000i64);
        let root = StructValue::new("User").field(
            "Wallet",
            wallet,
            "dive,keys,required,endkeys,required,gt=1000",
        );

        let seen = collect_struct(&root).unwrap();
        assert_eq!(
            paths(&seen),
            vec!["Wallet[BCA]", "Wallet[BCA]", "Wallet[MANDIRI]", "Wallet[MANDIRI]"]
        );
        assert_eq!(seen[0].1, vec!["required"]);
        assert_eq!(seen[1].1, vec!["required", "gt"]);
    }

    #[test]
    fn test_key_visit_sees_key_value() {
        let registry = RuleRegistry::with_builtins();
        let cache = SpecCache::new();
        let mut map = BTreeMap::new();
        map.insert(MapKey::from(7i64), Value::from("x"));
        let value = Value::Map(map);

        let mut keys = Vec::new();
        Walker::new(&registry, &cache)
            .walk_value(&value, "dive,keys,gt=1,endkeys", Siblings::None, &mut |visit: Visit<'_>| {
                if visit.path.is_key() {
                    keys.push(visit.value.clone());
                }
            })
            .unwrap();
        assert_eq!(keys, vec![Value::Integer(7)]);
    }

    #[test]
    fn test_omitempty_and_skip() {
        let root = StructValue::new("Profile")
            .field("Email", "", "omitempty,email")
            .field("Secret", "", "-")
            .field("Name", "", "required");

        let seen = collect_struct(&root).unwrap();
        assert_eq!(paths(&seen), vec!["Name"]);
    }

    #[test]
    fn test_dive_on_null_and_scalars() {
        let root = StructValue::new("User").field("Hobbies", Value::Null, "dive,required");
        assert!(collect_struct(&root).unwrap().is_empty());

        let root = StructValue::new("User").field("Age", 30i64, "dive,required");
        let err = collect_struct(&root).unwrap_err();
        assert!(matches!(err, ValidatorError::DiveOnNonCollection { .. }));
    }

    #[test]
    fn test_trailing_dive_on_struct_values() {
        let school = |name: &str| StructValue::new("School").field("Name", name, "required");
        let mut schools = BTreeMap::new();
        schools.insert("SD", school("SD Indonesia"));
        schools.insert("SMP", school(""));
        let root = StructValue::new("User").field(
            "Schools",
            schools,
            "dive,keys,required,min=2,endkeys,dive",
        );

        let seen = collect_struct(&root).unwrap();
        assert_eq!(
            paths(&seen),
            vec!["Schools[SD]", "Schools[SD].Name", "Schools[SMP]", "Schools[SMP].Name"]
        );

        let root = StructValue::new("User").field("School", school(""), "dive,required");
        assert!(matches!(
            collect_struct(&root),
            Err(ValidatorError::DiveOnNonCollection { .. })
        ));
    }

    #[test]
    fn test_keys_on_array() {
        let root = StructValue::new("User").field(
            "Tags",
            vec!["a"],
            "dive,keys,required,endkeys",
        );
        let err = collect_struct(&root).unwrap_err();
        assert!(matches!(err, ValidatorError::KeysOnNonMap { .. }));
    }

    #[test]
    fn test_spec_errors_propagate() {
        let root = StructValue::new("User").field("Name", "eko", "required,username");
        assert!(matches!(
            collect_struct(&root),
            Err(ValidatorError::UnknownRule { .. })
        ));
    }
}
