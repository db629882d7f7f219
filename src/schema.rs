//! Companion schemas for untyped documents.
//!
//! A schema declares struct shapes and the rule spec of every field, so a
//! JSON document can be bound into a [`Value::Struct`] graph and validated
//! like a Rust type that implements [`ToValue`](crate::core::types::ToValue).
//!
//! # Example TOML
//! ```toml
//! root = "User"
//!
//! [aliases]
//! varchar = "required,max=255"
//!
//! [[structs.User.fields]]
//! name = "Name"
//! rules = "varchar"
//!
//! [[structs.User.fields]]
//! name = "Addresses"
//! rules = "required,dive"
//! type = "[]Address"
//!
//! [[structs.Address.fields]]
//! name = "City"
//! rules = "required"
//! ```
//!
//! Field types:
//! - `string`, `int`, `float`, `bool`: checked scalars (`null` is always accepted)
//! - `any` or no type: whatever the document holds
//! - `[]T`: array of `T`
//! - `map[T]`: object with string keys and `T` values
//! - any other name: a struct declared under `[structs]`

use crate::config::ValidatorConfig;
use crate::core::error::{ValidatorError, ValidatorResult};
use crate::core::path::{FieldPath, PathSegment};
use crate::core::types::{MapKey, StructValue, Value};
use crate::validation::Validator;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// A schema document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// Name of the struct a document binds to.
    pub root: String,
    /// Aliases to register before validating.
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
    /// Struct declarations by name.
    #[serde(default)]
    pub structs: IndexMap<String, StructSchema>,
}

/// Fields of one struct, in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructSchema {
    /// Declared fields.
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

/// One declared field.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSchema {
    /// Field name as it appears in documents and paths.
    pub name: String,
    /// Rule spec, e.g. `required,min=5`.
    #[serde(default)]
    pub rules: String,
    /// Type expression; absent means `any`.
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
}

/// Parsed field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Whatever the document holds
    Any,
    /// `string`
    String,
    /// `int`
    Integer,
    /// `float`
    Float,
    /// `bool`
    Boolean,
    /// `[]T`
    Array(Box<FieldType>),
    /// `map[T]`
    Map(Box<FieldType>),
    /// A declared struct
    Struct(String),
}

impl FieldType {
    /// Parse a type expression.
    pub fn parse(text: &str) -> ValidatorResult<Self> {
        let text = text.trim();
        if let Some(inner) = text.strip_prefix("[]") {
            return Ok(FieldType::Array(Box::new(Self::parse(inner)?)));
        }
        if let Some(inner) = text.strip_prefix("map[").and_then(|t| t.strip_suffix(']')) {
            return Ok(FieldType::Map(Box::new(Self::parse(inner)?)));
        }
        Ok(match text {
            "" => return Err(ValidatorError::Schema("empty type expression".to_string())),
            "any" => FieldType::Any,
            "string" => FieldType::String,
            "int" | "integer" => FieldType::Integer,
            "float" | "number" => FieldType::Float,
            "bool" | "boolean" => FieldType::Boolean,
            name if name.contains(|c: char| !(c.is_alphanumeric() || c == '_')) => {
                return Err(ValidatorError::Schema(format!(
                    "malformed type expression '{}'",
                    text
                )))
            }
            name => FieldType::Struct(name.to_string()),
        })
    }

    fn struct_name(&self) -> Option<&str> {
        match self {
            FieldType::Array(inner) | FieldType::Map(inner) => inner.struct_name(),
            FieldType::Struct(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Any => write!(f, "any"),
            FieldType::String => write!(f, "string"),
            FieldType::Integer => write!(f, "int"),
            FieldType::Float => write!(f, "float"),
            FieldType::Boolean => write!(f, "bool"),
            FieldType::Array(inner) => write!(f, "[]{}", inner),
            FieldType::Map(inner) => write!(f, "map[{}]", inner),
            FieldType::Struct(name) => write!(f, "{}", name),
        }
    }
}

impl Schema {
    /// Parse and check a schema from TOML text.
    pub fn from_toml_str(text: &str) -> ValidatorResult<Self> {
        let schema: Schema = toml::from_str(text)?;
        schema.check()?;
        debug!(
            "Loaded schema with root '{}' and {} structs",
            schema.root,
            schema.structs.len()
        );
        Ok(schema)
    }

    /// Load a schema from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ValidatorResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Configuration holding the schema's aliases.
    pub fn config(&self) -> ValidatorConfig {
        self.aliases
            .iter()
            .fold(ValidatorConfig::new(), |config, (name, expansion)| {
                config.with_alias(name, expansion)
            })
    }

    /// A validator with the schema's aliases registered.
    pub fn validator(&self) -> ValidatorResult<Validator> {
        Validator::with_config(self.config())
    }

    /// Bind a JSON document to the root struct.
    pub fn bind(&self, document: &serde_json::Value) -> ValidatorResult<Value> {
        self.bind_struct(&self.root, document, &FieldPath::root())
    }

    /// Parse a JSON document and bind it.
    pub fn bind_str(&self, json: &str) -> ValidatorResult<Value> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        self.bind(&document)
    }

    fn check(&self) -> ValidatorResult<()> {
        if !self.structs.contains_key(&self.root) {
            return Err(ValidatorError::Schema(format!(
                "root struct '{}' is not declared",
                self.root
            )));
        }
        for (struct_name, decl) in &self.structs {
            for field in &decl.fields {
                let ty = field_type(field)?;
                if let Some(name) = ty.struct_name() {
                    if !self.structs.contains_key(name) {
                        return Err(ValidatorError::Schema(format!(
                            "field '{}.{}' refers to undeclared struct '{}'",
                            struct_name, field.name, name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn bind_struct(
        &self,
        name: &str,
        document: &serde_json::Value,
        path: &FieldPath,
    ) -> ValidatorResult<Value> {
        let decl = self
            .structs
            .get(name)
            .ok_or_else(|| ValidatorError::Schema(format!("struct '{}' is not declared", name)))?;
        let object = match document {
            serde_json::Value::Null => return Ok(Value::Null),
            serde_json::Value::Object(object) => object,
            other => return Err(mismatch(path, name, other)),
        };

        let mut value = StructValue::new(name);
        for field in &decl.fields {
            let field_path = path.field(field.name.as_str());
            let bound = match object.get(&field.name) {
                Some(item) => self.bind_typed(&field_type(field)?, item, &field_path)?,
                None => Value::Null,
            };
            value.insert(field.name.as_str(), bound, &field.rules);
        }
        Ok(Value::Struct(value))
    }

    fn bind_typed(
        &self,
        ty: &FieldType,
        document: &serde_json::Value,
        path: &FieldPath,
    ) -> ValidatorResult<Value> {
        use serde_json::Value as Json;

        match (ty, document) {
            (FieldType::Struct(name), _) => self.bind_struct(name, document, path),
            (_, Json::Null) | (FieldType::Any, _) => Ok(Value::from(document.clone())),
            (FieldType::String, Json::String(s)) => Ok(Value::String(s.clone())),
            (FieldType::Boolean, Json::Bool(b)) => Ok(Value::Boolean(*b)),
            (FieldType::Integer, Json::Number(n)) if n.is_i64() => {
                Ok(n.as_i64().map(Value::Integer).unwrap_or_default())
            }
            (FieldType::Float, Json::Number(n)) => {
                Ok(n.as_f64().map(Value::Float).unwrap_or_default())
            }
            (FieldType::Array(inner), Json::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.bind_typed(inner, item, &path.child(PathSegment::Index(i))))
                .collect::<ValidatorResult<Vec<_>>>()
                .map(Value::Array),
            (FieldType::Map(inner), Json::Object(entries)) => {
                let mut map = BTreeMap::new();
                for (key, item) in entries {
                    let key = MapKey::from(key.as_str());
                    let bound =
                        self.bind_typed(inner, item, &path.child(PathSegment::Entry(key.clone())))?;
                    map.insert(key, bound);
                }
                Ok(Value::Map(map))
            }
            (ty, other) => Err(mismatch(path, ty, other)),
        }
    }
}

fn field_type(field: &FieldSchema) -> ValidatorResult<FieldType> {
    field
        .ty
        .as_deref()
        .map(FieldType::parse)
        .unwrap_or(Ok(FieldType::Any))
}

fn mismatch(
    path: &FieldPath,
    expected: impl fmt::Display,
    found: &serde_json::Value,
) -> ValidatorError {
    let found = match found {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    };
    let at = if path.is_root() {
        "document root".to_string()
    } else {
        format!("'{}'", path)
    };
    ValidatorError::Schema(format!("expected {} at {}, found {}", expected, at, found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const USER_SCHEMA: &str = r#"
        root = "User"

        [aliases]
        varchar = "required,max=255"

        [[structs.User.fields]]
        name = "Id"
        rules = "varchar,min=5"
        type = "string"

        [[structs.User.fields]]
        name = "Age"
        rules = "gt=0"
        type = "int"

        [[structs.User.fields]]
        name = "Addresses"
        rules = "required,dive"
        type = "[]Address"

        [[structs.User.fields]]
        name = "Wallet"
        rules = "dive,keys,required,endkeys,required,gt=1000"
        type = "map[int]"

        [[structs.Address.fields]]
        name = "City"
        rules = "required"
    "#;

    #[test]
    fn test_parse_types() {
        assert_eq!(
            FieldType::parse("[]map[Address]").unwrap(),
            FieldType::Array(Box::new(FieldType::Map(Box::new(FieldType::Struct(
                "Address".to_string()
            )))))
        );
        assert_eq!(FieldType::parse("int").unwrap(), FieldType::Integer);
        assert!(FieldType::parse("map[string").is_err());
        assert!(FieldType::parse("").is_err());
        assert_eq!(FieldType::parse("[]string").unwrap().to_string(), "[]string");
    }

    #[test]
    fn test_undeclared_struct_rejected() {
        let err = Schema::from_toml_str(
            r#"
            root = "User"
            [[structs.User.fields]]
            name = "Address"
            type = "Address"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("undeclared struct 'Address'"));

        let err = Schema::from_toml_str("root = \"Missing\"").unwrap_err();
        assert!(matches!(err, ValidatorError::Schema(_)));
    }

    #[test]
    fn test_bind_document() {
        let schema = Schema::from_toml_str(USER_SCHEMA).unwrap();
        let value = schema
            .bind(&json!({
                "Id": "eko-123",
                "Addresses": [{"City": "Jakarta"}, {"City": ""}],
                "Wallet": {"BCA": 1000000},
                "Ignored": true
            }))
            .unwrap();

        let user = value.as_struct().unwrap();
        assert_eq!(user.name(), "User");
        assert_eq!(user.len(), 4);
        assert_eq!(user.get("Age"), Some(&Value::Null));
        assert_eq!(user.lookup("Id"), Some(&Value::from("eko-123")));
        let addresses = user.get("Addresses").and_then(Value::as_array).unwrap();
        assert_eq!(addresses[1].as_struct().unwrap().get("City"), Some(&Value::from("")));
    }

    #[test]
    fn test_type_mismatch() {
        let schema = Schema::from_toml_str(USER_SCHEMA).unwrap();
        let err = schema.bind(&json!({"Age": "old"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "schema error: expected int at 'Age', found string"
        );

        let err = schema.bind(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("document root"));
    }

    #[test]
    fn test_validate_bound_document() {
        let schema = Schema::from_toml_str(USER_SCHEMA).unwrap();
        let validator = schema.validator().unwrap();
        let value = schema
            .bind_str(
                r#"{
                    "Id": "eko",
                    "Age": 30,
                    "Addresses": [{"City": "Jakarta"}, {"City": ""}],
                    "Wallet": {"BCA": 1000000, "MANDIRI": 0}
                }"#,
            )
            .unwrap();

        let result = validator.validate_struct(&value).unwrap();
        let failures: Vec<(String, &str)> = result
            .iter()
            .map(|f| (f.path.to_string(), f.tag.as_str()))
            .collect();
        assert_eq!(
            failures,
            vec![
                ("Id".to_string(), "min"),
                ("Addresses[1].City".to_string(), "required"),
                ("Wallet[MANDIRI]".to_string(), "required"),
                ("Wallet[MANDIRI]".to_string(), "gt"),
            ]
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(USER_SCHEMA.as_bytes()).unwrap();

        let schema = Schema::load(file.path()).unwrap();
        assert_eq!(schema.root, "User");
        assert_eq!(schema.config().aliases["varchar"], "required,max=255");
    }
}
