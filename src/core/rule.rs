//! Rule trait and rule parameters.
//!
//! Every evaluator, builtin or user supplied, implements [`Rule`]. A rule
//! gets two chances to look at its input: once at parse time, when it turns
//! the raw `=parameter` text into a typed [`Parameter`], and once per value
//! during evaluation.

use crate::core::context::RuleContext;
use crate::core::types::Measure;
use serde::{Deserialize, Serialize};

/// Category for organizing rules in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Presence checks (`required`)
    Presence,
    /// Size and value comparisons (`min`, `max`, `gt`, ...)
    Comparison,
    /// Comparisons against sibling fields (`eqfield`, ...)
    CrossField,
    /// String format checks (`email`, `numeric`, ...)
    Format,
    /// Custom/user-defined
    Custom,
}

impl RuleCategory {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            RuleCategory::Presence => "Presence",
            RuleCategory::Comparison => "Comparison",
            RuleCategory::CrossField => "Cross-field",
            RuleCategory::Format => "Format",
            RuleCategory::Custom => "Custom",
        }
    }
}

/// Typed rule parameter, parsed once per rule spec.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Parameter {
    /// No `=parameter` was given.
    #[default]
    None,
    /// Integer bound, e.g. `min=5`.
    Integer(i64),
    /// Fractional bound, e.g. `gt=2.5`.
    Number(f64),
    /// Name of a sibling field, e.g. `eqfield=Password`.
    Field(String),
    /// Space separated options, e.g. `oneof=red green`.
    List(Vec<String>),
    /// Literal text, e.g. `eq=admin`.
    Text(String),
}

impl Parameter {
    /// Parse a required numeric parameter. Integer text stays an integer.
    pub fn number(raw: Option<&str>) -> Result<Self, String> {
        let raw = raw.ok_or_else(|| "a numeric parameter is required".to_string())?;
        let text = raw.trim();
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Parameter::Integer(i));
        }
        text.parse::<f64>()
            .map(Parameter::Number)
            .map_err(|_| format!("'{}' is not a number", raw))
    }

    /// Parse an optional field reference.
    pub fn field(raw: Option<&str>) -> Result<Self, String> {
        match raw.map(str::trim) {
            None => Ok(Parameter::None),
            Some("") => Err("field name must not be empty".to_string()),
            Some(name) => Ok(Parameter::Field(name.to_string())),
        }
    }

    /// Parse a required, space separated option list.
    pub fn list(raw: Option<&str>) -> Result<Self, String> {
        let options: Vec<String> = raw
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if options.is_empty() {
            return Err("at least one option is required".to_string());
        }
        Ok(Parameter::List(options))
    }

    /// Keep the parameter as literal text, if present.
    pub fn text(raw: Option<&str>) -> Self {
        raw.map(|s| Parameter::Text(s.to_string()))
            .unwrap_or(Parameter::None)
    }

    /// Get the numeric bound as a float.
    pub fn as_number(&self) -> Option<f64> {
        self.as_measure().map(Measure::as_f64)
    }

    /// Get the numeric bound, exact for integers.
    pub fn as_measure(&self) -> Option<Measure> {
        match self {
            Parameter::Integer(i) => Some(Measure::Integer(*i)),
            Parameter::Number(n) => Some(Measure::Float(*n)),
            _ => None,
        }
    }

    /// Get the referenced field name.
    pub fn as_field(&self) -> Option<&str> {
        if let Parameter::Field(name) = self {
            Some(name)
        } else {
            None
        }
    }

    /// Get the option list.
    pub fn as_list(&self) -> Option<&[String]> {
        if let Parameter::List(options) = self {
            Some(options)
        } else {
            None
        }
    }

    /// Get the literal text.
    pub fn as_text(&self) -> Option<&str> {
        if let Parameter::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }
}

/// The core trait implemented by every rule evaluator.
///
/// # Example
///
/// ```rust
/// use tagcheck::prelude::*;
///
/// struct Uppercase;
///
/// impl Rule for Uppercase {
///     fn evaluate(&self, ctx: &RuleContext<'_>) -> bool {
///         ctx.value()
///             .as_str()
///             .map(|s| s == s.to_uppercase())
///             .unwrap_or(true)
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Return `true` when the value satisfies the rule.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> bool;

    /// Parse the raw parameter. Rejections surface as
    /// `ValidatorError::InvalidParameter` when the rule spec is parsed.
    fn parse_param(&self, raw: Option<&str>) -> Result<Parameter, String> {
        Ok(Parameter::text(raw))
    }

    /// Whether the rule reads a sibling value rather than a literal.
    fn is_cross_field(&self) -> bool {
        false
    }

    /// Category for listings.
    fn category(&self) -> RuleCategory {
        RuleCategory::Custom
    }

    /// One line description for listings.
    fn description(&self) -> &str {
        ""
    }
}

/// Adapter turning a closure into a [`Rule`].
pub struct FnRule<F> {
    f: F,
}

impl<F> FnRule<F>
where
    F: Fn(&RuleContext<'_>) -> bool + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&RuleContext<'_>) -> bool + Send + Sync,
{
    fn evaluate(&self, ctx: &RuleContext<'_>) -> bool {
        (self.f)(ctx)
    }

    fn description(&self) -> &str {
        "custom function"
    }
}
