//! Rule evaluation.
//!
//! Every rule of a visit runs, left to right. A failing rule never stops
//! the rules after it, so one field may report several failures.

use crate::core::context::{RuleContext, Siblings};
use crate::core::types::Value;
use crate::validation::result::{ValidationFailure, ValidationResult};
use crate::validation::tags::RuleInvocation;
use crate::validation::walker::Visit;
use log::trace;

/// Run one rule against a value.
pub fn evaluate(
    value: &Value,
    invocation: &RuleInvocation,
    field: Option<&str>,
    siblings: Siblings<'_>,
) -> bool {
    let ctx = RuleContext::new(
        value,
        &invocation.param,
        invocation.raw_param.as_deref(),
        field,
        siblings,
    );
    invocation.evaluate(&ctx)
}

/// Run every rule of a visit, appending a failure per failing rule.
pub fn evaluate_visit(visit: &Visit<'_>, result: &mut ValidationResult) {
    for invocation in visit.rules {
        if evaluate(visit.value, invocation, visit.field, visit.siblings) {
            continue;
        }
        trace!("'{}' failed on '{}'", visit.path, invocation.tag);
        result.push(ValidationFailure {
            path: visit.path.clone(),
            tag: invocation.tag.clone(),
            rule: invocation.name.clone(),
            param: invocation.raw_param.clone(),
            value: visit.value.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::path::FieldPath;
    use crate::rules::registry::RuleRegistry;
    use crate::validation::tags;

    #[test]
    fn test_all_rules_evaluated() {
        let registry = RuleRegistry::with_builtins();
        let spec = tags::compile("required,numeric,min=5,max=10", &registry).unwrap();
        let path = FieldPath::root().field("Code");
        let value = Value::from("");

        let mut result = ValidationResult::new();
        evaluate_visit(
            &Visit {
                path: &path,
                value: &value,
                rules: &spec.rules,
                field: Some("Code"),
                siblings: Siblings::None,
            },
            &mut result,
        );

        let failed: Vec<&str> = result.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(failed, vec!["required", "numeric", "min"]);
        assert_eq!(result.failures()[2].param.as_deref(), Some("5"));
    }

    #[test]
    fn test_single_rule() {
        let registry = RuleRegistry::with_builtins();
        let spec = tags::compile("gt=1000", &registry).unwrap();
        let rule = &spec.rules[0];

        assert!(evaluate(&Value::from(1001i64), rule, None, Siblings::None));
        assert!(!evaluate(&Value::from(1000i64), rule, None, Siblings::None));
    }
}
