//! Cross-field rules.
//!
//! These compare the value against a sibling field of the innermost
//! enclosing struct (`eqfield=Password`), or against the explicit other
//! value passed to `var_with_value` when no field is named.

use crate::core::context::RuleContext;
use crate::core::rule::{Parameter, Rule, RuleCategory};
use crate::rules::builtin::comparison::Relation;
use crate::rules::registry::RuleRegistry;

/// Register cross-field rules.
pub fn register(registry: &mut RuleRegistry) {
    registry.register_builtin("eqfield", FieldCompare::new(Relation::Eq));
    registry.register_builtin("nefield", FieldCompare::new(Relation::Ne));
    registry.register_builtin("gtfield", FieldCompare::new(Relation::Gt));
    registry.register_builtin("gtefield", FieldCompare::new(Relation::Gte));
    registry.register_builtin("ltfield", FieldCompare::new(Relation::Lt));
    registry.register_builtin("ltefield", FieldCompare::new(Relation::Lte));
}

/// Compare a value with a sibling value.
///
/// Equality is exact (kind and value). Ordering relations compare
/// measures, so strings compare by length. A missing sibling fails.
#[derive(Debug, Clone)]
pub struct FieldCompare {
    relation: Relation,
}

impl FieldCompare {
    /// Create a cross-field comparison.
    pub fn new(relation: Relation) -> Self {
        Self { relation }
    }
}

impl Rule for FieldCompare {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> bool {
        let Some(other) = ctx.other() else {
            return false;
        };
        let value = ctx.value();

        match self.relation {
            Relation::Eq => value == other,
            Relation::Ne => value != other,
            relation => match (value.measure(), other.measure()) {
                (Some(a), Some(b)) => relation.compare(a, b),
                _ => false,
            },
        }
    }

    fn parse_param(&self, raw: Option<&str>) -> Result<Parameter, String> {
        Parameter::field(raw)
    }

    fn is_cross_field(&self) -> bool {
        true
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::CrossField
    }

    fn description(&self) -> &str {
        match self.relation {
            Relation::Eq => "value must equal the named field",
            Relation::Ne => "value must differ from the named field",
            Relation::Gt => "value must be greater than the named field",
            Relation::Gte => "value must be at least the named field",
            Relation::Lt => "value must be less than the named field",
            Relation::Lte => "value must be at most the named field",
        }
    }
}
