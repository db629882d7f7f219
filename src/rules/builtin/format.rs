//! String format rules.

use crate::core::context::RuleContext;
use crate::core::rule::{Parameter, Rule, RuleCategory};
use crate::core::types::Value;
use crate::rules::registry::RuleRegistry;
use regex::Regex;
use std::sync::LazyLock;

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").expect("valid regex"));
static ALPHA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").expect("valid regex"));
static ALPHANUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("valid regex")
});

/// Register format rules.
pub fn register(registry: &mut RuleRegistry) {
    registry.register_builtin(
        "numeric",
        Pattern::new(&NUMERIC_RE, "string must be a decimal number").accepting_numbers(),
    );
    registry.register_builtin("alpha", Pattern::new(&ALPHA_RE, "ASCII letters only"));
    registry.register_builtin(
        "alphanum",
        Pattern::new(&ALPHANUM_RE, "ASCII letters and digits only"),
    );
    registry.register_builtin("email", Pattern::new(&EMAIL_RE, "conventional email address"));
    registry.register_builtin("oneof", OneOf);
}

/// Regex check on string values.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: &'static LazyLock<Regex>,
    accepts_numbers: bool,
    description: &'static str,
}

impl Pattern {
    /// Create a pattern rule over a static regex.
    pub fn new(regex: &'static LazyLock<Regex>, description: &'static str) -> Self {
        Self {
            regex,
            accepts_numbers: false,
            description,
        }
    }

    /// Let integer and float values pass without matching.
    pub fn accepting_numbers(mut self) -> Self {
        self.accepts_numbers = true;
        self
    }
}

impl Rule for Pattern {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> bool {
        match ctx.value() {
            Value::String(s) => self.regex.is_match(s),
            Value::Integer(_) | Value::Float(_) => self.accepts_numbers,
            _ => false,
        }
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Format
    }

    fn description(&self) -> &str {
        self.description
    }
}

/// Value must be one of a space separated list (`oneof=red green`).
#[derive(Debug, Clone)]
pub struct OneOf;

impl Rule for OneOf {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> bool {
        let (Some(text), Some(options)) = (ctx.value().to_text(), ctx.param().as_list()) else {
            return false;
        };
        options.iter().any(|option| *option == text)
    }

    fn parse_param(&self, raw: Option<&str>) -> Result<Parameter, String> {
        Parameter::list(raw)
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Format
    }

    fn description(&self) -> &str {
        "value must be one of the listed options"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Siblings;

    fn check(rule: &dyn Rule, value: Value) -> bool {
        let param = Parameter::None;
        rule.evaluate(&RuleContext::new(&value, &param, None, None, Siblings::None))
    }

    #[test]
    fn test_numeric() {
        let numeric = Pattern::new(&NUMERIC_RE, "").accepting_numbers();
        assert!(check(&numeric, Value::from("12345")));
        assert!(check(&numeric, Value::from("-3.5")));
        assert!(check(&numeric, Value::from(7i64)));
        assert!(!check(&numeric, Value::from("12a")));
        assert!(!check(&numeric, Value::from("")));
    }

    #[test]
    fn test_email() {
        let email = Pattern::new(&EMAIL_RE, "");
        assert!(check(&email, Value::from("eko@example.com")));
        assert!(check(&email, Value::from("first.last+tag@mail.example.co.id")));
        assert!(!check(&email, Value::from("eko")));
        assert!(!check(&email, Value::from("eko@localhost")));
        assert!(!check(&email, Value::from("@example.com")));
    }

    #[test]
    fn test_alpha_rules() {
        assert!(check(&Pattern::new(&ALPHA_RE, ""), Value::from("Eko")));
        assert!(!check(&Pattern::new(&ALPHA_RE, ""), Value::from("Eko1")));
        assert!(check(&Pattern::new(&ALPHANUM_RE, ""), Value::from("Eko1")));
        assert!(!check(&Pattern::new(&ALPHANUM_RE, ""), Value::from(1i64)));
    }

    #[test]
    fn test_oneof() {
        let param = OneOf.parse_param(Some("red green")).unwrap();
        let green = Value::from("green");
        let blue = Value::from("blue");
        let raw = Some("red green");
        assert!(OneOf.evaluate(&RuleContext::new(&green, &param, raw, None, Siblings::None)));
        assert!(!OneOf.evaluate(&RuleContext::new(&blue, &param, raw, None, Siblings::None)));
    }
}
