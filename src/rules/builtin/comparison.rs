//! Size and literal comparison rules.
//!
//! Size rules compare the value's measure against a numeric bound: the
//! number itself for numeric values, the length for strings (in
//! characters), arrays and maps.

use crate::core::context::RuleContext;
use crate::core::rule::{Parameter, Rule, RuleCategory};
use crate::core::types::{Measure, Value};
use crate::rules::registry::RuleRegistry;
use std::cmp::Ordering;

/// Register comparison rules.
pub fn register(registry: &mut RuleRegistry) {
    registry.register_builtin(
        "min",
        Compare::new(Relation::Gte, "length or value must be >= parameter"),
    );
    registry.register_builtin(
        "max",
        Compare::new(Relation::Lte, "length or value must be <= parameter"),
    );
    registry.register_builtin(
        "len",
        Compare::new(Relation::Eq, "length or value must equal parameter"),
    );
    registry.register_builtin(
        "gt",
        Compare::new(Relation::Gt, "length or value must be > parameter"),
    );
    registry.register_builtin(
        "gte",
        Compare::new(Relation::Gte, "length or value must be >= parameter"),
    );
    registry.register_builtin(
        "lt",
        Compare::new(Relation::Lt, "length or value must be < parameter"),
    );
    registry.register_builtin(
        "lte",
        Compare::new(Relation::Lte, "length or value must be <= parameter"),
    );
    registry.register_builtin("eq", Equals { negate: false });
    registry.register_builtin("ne", Equals { negate: true });
}

/// Relation between a measured value and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
}

impl Relation {
    /// Whether `ordering` (value compared to bound) satisfies the relation.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Relation::Eq => ordering == Ordering::Equal,
            Relation::Ne => ordering != Ordering::Equal,
            Relation::Gt => ordering == Ordering::Greater,
            Relation::Gte => ordering != Ordering::Less,
            Relation::Lt => ordering == Ordering::Less,
            Relation::Lte => ordering != Ordering::Greater,
        }
    }

    /// Compare two measures. NaN never satisfies a relation.
    pub fn compare(self, value: Measure, bound: Measure) -> bool {
        value
            .partial_cmp(&bound)
            .map(|ordering| self.holds(ordering))
            .unwrap_or(false)
    }
}

/// Numeric bound check on a value's measure.
#[derive(Debug, Clone)]
pub struct Compare {
    relation: Relation,
    description: &'static str,
}

impl Compare {
    /// Create a comparison rule.
    pub fn new(relation: Relation, description: &'static str) -> Self {
        Self {
            relation,
            description,
        }
    }
}

impl Rule for Compare {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> bool {
        match (ctx.value().measure(), ctx.param().as_measure()) {
            (Some(measure), Some(bound)) => self.relation.compare(measure, bound),
            _ => false,
        }
    }

    fn parse_param(&self, raw: Option<&str>) -> Result<Parameter, String> {
        Parameter::number(raw)
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Comparison
    }

    fn description(&self) -> &str {
        self.description
    }
}

/// Equality with a literal parameter (`eq`, `ne`).
///
/// Strings compare as text, numbers numerically, booleans by value and
/// collections by length.
#[derive(Debug, Clone)]
pub struct Equals {
    negate: bool,
}

impl Rule for Equals {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> bool {
        let literal = ctx.param().as_text().unwrap_or_default();
        equals_literal(ctx.value(), literal) != self.negate
    }

    fn parse_param(&self, raw: Option<&str>) -> Result<Parameter, String> {
        match raw {
            Some(text) => Ok(Parameter::Text(text.to_string())),
            None => Err("a literal parameter is required".to_string()),
        }
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Comparison
    }

    fn description(&self) -> &str {
        if self.negate {
            "value must differ from parameter"
        } else {
            "value must equal parameter"
        }
    }
}

fn equals_literal(value: &Value, literal: &str) -> bool {
    match value {
        Value::String(s) => s == literal,
        Value::Integer(i) => match literal.trim().parse::<i64>() {
            Ok(n) => n == *i,
            Err(_) => literal.trim().parse::<f64>().ok() == value.as_float(),
        },
        Value::Float(_) => literal.trim().parse::<f64>().ok() == value.as_float(),
        Value::Boolean(b) => literal.trim().parse::<bool>() == Ok(*b),
        Value::Array(_) | Value::Map(_) => literal.trim().parse::<usize>().ok() == value.len(),
        Value::Null | Value::Struct(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Siblings;

    fn check(rule: &dyn Rule, value: Value, raw: &str) -> bool {
        let param = rule.parse_param(Some(raw)).unwrap();
        rule.evaluate(&RuleContext::new(&value, &param, Some(raw), None, Siblings::None))
    }

    #[test]
    fn test_min_on_string_length() {
        let min = Compare::new(Relation::Gte, "");
        assert!(!check(&min, Value::from("eko"), "5"));
        assert!(check(&min, Value::from("eko1234"), "5"));
    }

    #[test]
    fn test_max_on_long_numeric_string() {
        let max = Compare::new(Relation::Lte, "");
        assert!(!check(&max, Value::from("99999999999999"), "10"));
        assert!(check(&max, Value::from(99999i64), "100000"));
    }

    #[test]
    fn test_gt_on_integers() {
        let gt = Compare::new(Relation::Gt, "");
        assert!(check(&gt, Value::from(1001i64), "1000"));
        assert!(!check(&gt, Value::from(1000i64), "1000"));
        assert!(!check(&gt, Value::from(0i64), "1000"));
    }

    #[test]
    fn test_integer_bounds_are_exact() {
        let max = Compare::new(Relation::Lte, "");
        assert!(!check(&max, Value::from(9_007_199_254_740_993i64), "9007199254740992"));
        assert!(check(&max, Value::from(9_007_199_254_740_992i64), "9007199254740992"));

        let gt = Compare::new(Relation::Gt, "");
        assert!(check(&gt, Value::from(i64::MAX), "9223372036854775806"));
        assert!(check(&gt, Value::from(2.5), "2"));
        assert!(!check(&gt, Value::from(2i64), "2.5"));
    }

    #[test]
    fn test_size_rules_reject_unmeasurable_values() {
        let min = Compare::new(Relation::Gte, "");
        assert!(!check(&min, Value::Null, "0"));
        assert!(!check(&min, Value::from(true), "0"));
    }

    #[test]
    fn test_numeric_parameter_required() {
        let min = Compare::new(Relation::Gte, "");
        assert!(min.parse_param(Some("abc")).is_err());
        assert!(min.parse_param(None).is_err());
    }

    #[test]
    fn test_equals_literal() {
        let eq = Equals { negate: false };
        let ne = Equals { negate: true };
        assert!(check(&eq, Value::from("admin"), "admin"));
        assert!(check(&eq, Value::from(3i64), "3"));
        assert!(!check(&eq, Value::from(9_007_199_254_740_993i64), "9007199254740992"));
        assert!(check(&eq, Value::from(vec![1i64, 2]), "2"));
        assert!(check(&ne, Value::from(true), "false"));
        assert!(!check(&ne, Value::from("admin"), "admin"));
    }
}
