//! Core value types that flow through the validator.
//!
//! The value model is a closed enum for the same reasons a reflective
//! runtime would have a fixed set of kinds:
//! - Zero values are well defined per variant, which `required` and
//!   `omitempty` rely on
//! - Rules can pattern match exhaustively
//! - Structs carry their own per-field rule specs, standing in for tags

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A value submitted for validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value (nil pointer, `None`, JSON `null`).
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Mapping with independently validatable keys, iterated in key order
    Map(BTreeMap<MapKey, Value>),
    /// Struct instance whose fields carry rule specs
    Struct(StructValue),
}

/// Key of a [`Value::Map`].
///
/// Keys are totally ordered so that map walks are reproducible: booleans
/// sort first, then integers, then strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum MapKey {
    /// Boolean key
    Boolean(bool),
    /// Integer key
    Integer(i64),
    /// String key
    String(String),
}

/// Kind of a value, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Boolean`]
    Boolean,
    /// [`Value::Integer`]
    Integer,
    /// [`Value::Float`]
    Float,
    /// [`Value::String`]
    String,
    /// [`Value::Array`]
    Array,
    /// [`Value::Map`]
    Map,
    /// [`Value::Struct`]
    Struct,
}

/// Quantity compared by size rules.
///
/// Integers and lengths stay exact; only floats go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    /// Integer value or a length
    Integer(i64),
    /// Floating point value
    Float(f64),
}

impl Measure {
    /// The measure as a float, possibly losing precision.
    pub fn as_f64(self) -> f64 {
        match self {
            Measure::Integer(i) => i as f64,
            Measure::Float(f) => f,
        }
    }
}

impl PartialOrd for Measure {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Measure::Integer(a), Measure::Integer(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

/// One field of a [`StructValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The field's value.
    pub value: Value,
    /// Rule spec attached to the field, e.g. `required,min=5`.
    pub rules: String,
}

/// A struct instance: a type name plus fields in declaration order.
///
/// Each field carries the rule spec that a struct tag would hold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructValue {
    name: String,
    fields: IndexMap<String, Field>,
}

/// Conversion of user types into the validator's value model.
///
/// This is the descriptor mechanism for user structs:
///
/// ```rust
/// use tagcheck::prelude::*;
///
/// struct LoginRequest {
///     username: String,
///     password: String,
/// }
///
/// impl ToValue for LoginRequest {
///     fn to_value(&self) -> Value {
///         StructValue::new("LoginRequest")
///             .field("Username", self.username.as_str(), "required,email")
///             .field("Password", self.password.as_str(), "required,min=5")
///             .into()
///     }
/// }
/// ```
pub trait ToValue {
    /// Build the value to validate.
    fn to_value(&self) -> Value;
}

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Get the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
            Value::Struct(_) => ValueKind::Struct,
        }
    }

    /// Check whether this is the zero value for its kind.
    ///
    /// Empty strings, `0`, `0.0`, `false`, null, empty collections and
    /// structs whose every field is zero are all zero values.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(b) => !*b,
            Value::Integer(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::String(s) => s.is_empty(),
            Value::Array(arr) => arr.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::Struct(s) => s.is_zero(),
        }
    }

    /// Length of a string (in characters), array or map.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(arr) => Some(arr.len()),
            Value::Map(map) => Some(map.len()),
            _ => None,
        }
    }

    /// Numeric measure used by size rules: the number itself for numeric
    /// values, the length for strings and collections.
    pub fn measure(&self) -> Option<Measure> {
        match self {
            Value::Integer(i) => Some(Measure::Integer(*i)),
            Value::Float(f) => Some(Measure::Float(*f)),
            other => other
                .len()
                .map(|len| Measure::Integer(i64::try_from(len).unwrap_or(i64::MAX))),
        }
    }

    /// Textual form of a scalar value.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    /// Integers are automatically converted to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Try to get this value as an array reference.
    pub fn as_array(&self) -> Option<&[Value]> {
        if let Value::Array(arr) = self {
            Some(arr)
        } else {
            None
        }
    }

    /// Try to get this value as a map reference.
    pub fn as_map(&self) -> Option<&BTreeMap<MapKey, Value>> {
        if let Value::Map(map) = self {
            Some(map)
        } else {
            None
        }
    }

    /// Try to get this value as a struct reference.
    pub fn as_struct(&self) -> Option<&StructValue> {
        if let Value::Struct(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(arr) => write!(f, "Array[{}]", arr.len()),
            Value::Map(map) => write!(f, "Map{{{} entries}}", map.len()),
            Value::Struct(s) => write!(f, "{}{{..}}", s.name),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
            ValueKind::Struct => "struct",
        };
        f.write_str(name)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for item in arr {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(&key.to_string(), value)?;
                }
                out.end()
            }
            Value::Struct(s) => {
                let mut out = serializer.serialize_map(Some(s.fields.len()))?;
                for (name, field) in &s.fields {
                    out.serialize_entry(name, &field.value)?;
                }
                out.end()
            }
        }
    }
}

// ============================================================================
// MapKey Implementation
// ============================================================================

impl MapKey {
    /// Convert the key into a value so key rules can evaluate it.
    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Boolean(b) => Value::Boolean(*b),
            MapKey::Integer(i) => Value::Integer(*i),
            MapKey::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Boolean(b) => write!(f, "{}", b),
            MapKey::Integer(i) => write!(f, "{}", i),
            MapKey::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::String(s.to_string())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::String(s)
    }
}

impl From<i64> for MapKey {
    fn from(i: i64) -> Self {
        MapKey::Integer(i)
    }
}

impl From<bool> for MapKey {
    fn from(b: bool) -> Self {
        MapKey::Boolean(b)
    }
}

// ============================================================================
// StructValue Implementation
// ============================================================================

impl StructValue {
    /// Create an empty struct value with the given type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Append a field. Re-declaring a name replaces the earlier field in place.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>, rules: &str) -> Self {
        self.insert(name, value, rules);
        self
    }

    /// Insert a field in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>, rules: &str) {
        self.fields.insert(
            name.into(),
            Field {
                value: value.into(),
                rules: rules.to_string(),
            },
        );
    }

    /// Type name of the struct.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a field's value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).map(|f| &f.value)
    }

    /// Look up a value by dotted path, e.g. `Address.City`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = current.as_struct()?.get(part)?;
        }
        Some(current)
    }

    /// Iterate over fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the struct has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A struct is zero when every field holds its zero value.
    pub fn is_zero(&self) -> bool {
        self.fields.values().all(|f| f.value.is_zero())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for StructValue {
    fn to_value(&self) -> Value {
        Value::Struct(self.clone())
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<StructValue> for Value {
    fn from(s: StructValue) -> Self {
        Value::Struct(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<K: Into<MapKey>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<MapKey>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(map: HashMap<K, V>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (MapKey::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert!(Value::from("").is_zero());
        assert!(Value::from(0i64).is_zero());
        assert!(Value::from(Vec::<Value>::new()).is_zero());
        assert!(Value::Null.is_zero());
        assert!(!Value::from("eko").is_zero());
        assert!(!Value::from(vec!["x"]).is_zero());
    }

    #[test]
    fn test_struct_zero_requires_all_fields_zero() {
        let empty = StructValue::new("Address")
            .field("City", "", "required")
            .field("Country", "", "required");
        assert!(empty.is_zero());

        let filled = empty.clone().field("City", "Jakarta", "required");
        assert!(!filled.is_zero());
        // Re-declared field keeps its position
        assert_eq!(filled.fields().next().map(|(n, _)| n), Some("City"));
    }

    #[test]
    fn test_length_counts_characters() {
        assert_eq!(Value::from("héllo").len(), Some(5));
        assert_eq!(Value::from("héllo").measure(), Some(Measure::Integer(5)));
        assert_eq!(Value::from(42i64).measure(), Some(Measure::Integer(42)));
        assert_eq!(Value::from(true).measure(), None);
    }

    #[test]
    fn test_integer_measures_compare_exactly() {
        let above = Measure::Integer(9_007_199_254_740_993);
        let bound = Measure::Integer(9_007_199_254_740_992);
        assert!(above > bound);
        // Same pair collapses to one float
        assert_eq!(above.as_f64(), bound.as_f64());
        assert!(Measure::Float(2.5) > Measure::Integer(2));
        assert_eq!(Measure::Float(f64::NAN).partial_cmp(&bound), None);
    }

    #[test]
    fn test_map_keys_are_sorted() {
        let mut map = HashMap::new();
        map.insert("SMP", 1i64);
        map.insert("", 2i64);
        map.insert("SD", 3i64);
        let value = Value::from(map);

        let keys: Vec<String> = value
            .as_map()
            .unwrap()
            .keys()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys, vec!["", "SD", "SMP"]);
    }

    #[test]
    fn test_dotted_lookup() {
        let user = StructValue::new("User").field(
            "Address",
            StructValue::new("Address").field("City", "Bandung", ""),
            "",
        );
        assert_eq!(user.lookup("Address.City"), Some(&Value::from("Bandung")));
        assert_eq!(user.lookup("Address.Zip"), None);
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({"id": 7, "tags": ["a"], "ratio": 0.5, "gone": null});
        let value = Value::from(json);
        let map = value.as_map().unwrap();
        assert_eq!(map[&MapKey::from("id")], Value::Integer(7));
        assert_eq!(map[&MapKey::from("ratio")], Value::Float(0.5));
        assert_eq!(map[&MapKey::from("gone")], Value::Null);
    }

    #[test]
    fn test_serialize_struct_as_object() {
        let value: Value = StructValue::new("School").field("Name", "SD", "required").into();
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({"Name": "SD"}));
    }
}
