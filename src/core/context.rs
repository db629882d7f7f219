//! Rule evaluation context.
//!
//! A [`RuleContext`] is what a rule sees: the value under test, its typed
//! parameter, and the sibling context needed by cross-field rules.

use crate::core::rule::Parameter;
use crate::core::types::{StructValue, Value};

/// Values a cross-field rule may compare against.
#[derive(Debug, Clone, Copy, Default)]
pub enum Siblings<'a> {
    /// No sibling context (plain `var` validation).
    #[default]
    None,
    /// The innermost struct instance enclosing the field.
    Struct(&'a StructValue),
    /// The explicit other value given to `var_with_value`.
    Value(&'a Value),
}

impl<'a> Siblings<'a> {
    /// Resolve a cross-field reference.
    ///
    /// In a struct, `name` is a (possibly dotted) field name. With an
    /// explicit other value the name is ignored and the value is returned.
    pub fn lookup(&self, name: Option<&str>) -> Option<&'a Value> {
        match *self {
            Siblings::None => None,
            Siblings::Struct(parent) => name.and_then(|n| parent.lookup(n)),
            Siblings::Value(other) => Some(other),
        }
    }
}

/// Context provided to a rule during evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    value: &'a Value,
    param: &'a Parameter,
    raw_param: Option<&'a str>,
    field: Option<&'a str>,
    siblings: Siblings<'a>,
}

impl<'a> RuleContext<'a> {
    /// Create a new rule context.
    pub fn new(
        value: &'a Value,
        param: &'a Parameter,
        raw_param: Option<&'a str>,
        field: Option<&'a str>,
        siblings: Siblings<'a>,
    ) -> Self {
        Self {
            value,
            param,
            raw_param,
            field,
            siblings,
        }
    }

    /// The value under test.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// The parsed parameter.
    pub fn param(&self) -> &'a Parameter {
        self.param
    }

    /// The parameter text as written in the rule spec.
    pub fn raw_param(&self) -> Option<&'a str> {
        self.raw_param
    }

    /// Name of the field being validated, if inside a struct.
    pub fn field(&self) -> Option<&'a str> {
        self.field
    }

    /// The sibling context.
    pub fn siblings(&self) -> Siblings<'a> {
        self.siblings
    }

    /// Look up a sibling field by name.
    pub fn sibling(&self, name: &str) -> Option<&'a Value> {
        self.siblings.lookup(Some(name))
    }

    /// The value a cross-field rule compares against: the sibling named by
    /// the parameter, or the explicit other value.
    pub fn other(&self) -> Option<&'a Value> {
        self.siblings.lookup(self.param.as_field())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_sibling_lookup() {
        let parent = StructValue::new("RegisterUser")
            .field("Password", "eko1234", "required")
            .field("ConfirmPassword", "eko1234", "eqfield=Password");
        let value = Value::from("eko1234");
        let param = Parameter::Field("Password".to_string());

        let ctx = RuleContext::new(
            &value,
            &param,
            Some("Password"),
            Some("ConfirmPassword"),
            Siblings::Struct(&parent),
        );
        assert_eq!(ctx.other(), Some(&Value::from("eko1234")));
        assert_eq!(ctx.sibling("Missing"), None);
    }

    #[test]
    fn test_other_value_ignores_name() {
        let other = Value::from("rahasia");
        let value = Value::from("rahasia");
        let param = Parameter::None;

        let ctx = RuleContext::new(&value, &param, None, None, Siblings::Value(&other));
        assert_eq!(ctx.other(), Some(&other));
    }

    #[test]
    fn test_no_siblings() {
        let value = Value::from(1i64);
        let param = Parameter::Field("X".to_string());
        let ctx = RuleContext::new(&value, &param, Some("X"), None, Siblings::None);
        assert!(ctx.other().is_none());
    }
}
