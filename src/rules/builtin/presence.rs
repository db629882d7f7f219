//! Presence rules.

use crate::core::context::RuleContext;
use crate::core::rule::{Rule, RuleCategory};
use crate::rules::registry::RuleRegistry;

/// Register presence rules.
pub fn register(registry: &mut RuleRegistry) {
    registry.register_builtin("required", Required);
}

/// Fails when the value is the zero value for its kind.
///
/// For structs this means every field is zero; descent into the struct's
/// own fields happens regardless of the outcome.
#[derive(Debug, Clone)]
pub struct Required;

impl Rule for Required {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> bool {
        !ctx.value().is_zero()
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Presence
    }

    fn description(&self) -> &str {
        "value must not be the zero value"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Siblings;
    use crate::core::rule::Parameter;
    use crate::core::types::{StructValue, Value};

    fn check(value: Value) -> bool {
        let param = Parameter::None;
        Required.evaluate(&RuleContext::new(&value, &param, None, None, Siblings::None))
    }

    #[test]
    fn test_required_rejects_zero_values() {
        assert!(!check(Value::from("")));
        assert!(!check(Value::from(0i64)));
        assert!(!check(Value::from(Vec::<Value>::new())));
        assert!(!check(Value::Null));
        assert!(!check(StructValue::new("Address").field("City", "", "").into()));
    }

    #[test]
    fn test_required_accepts_values() {
        assert!(check(Value::from("eko")));
        assert!(check(Value::from(-1i64)));
        assert!(check(Value::from(true)));
        assert!(check(StructValue::new("Address").field("City", "Solo", "").into()));
    }
}
