//! Rule spec parsing.
//!
//! A rule spec is a comma separated list of tokens: `required,min=5`.
//! Parsing happens in two steps:
//! 1. [`parse`] splits the rule spec, expands aliases and resolves every rule
//!    name against the registry, yielding a flat [`Token`] list.
//! 2. [`compile_tokens`] checks the structural markers and arranges the
//!    tokens into a [`CompiledSpec`] tree the walker can follow.

use crate::core::context::RuleContext;
use crate::core::error::{ValidatorError, ValidatorResult};
use crate::core::rule::{Parameter, Rule};
use crate::rules::registry::{Resolved, RuleRegistry};
use log::trace;
use std::sync::Arc;

/// A resolved rule with its parsed parameter.
#[derive(Clone)]
pub struct RuleInvocation {
    /// Registered name of the rule that runs.
    pub name: String,
    /// Name as written in the rule spec: the outermost alias, or the rule name.
    pub tag: String,
    /// Parameter text after `=`, if any.
    pub raw_param: Option<String>,
    /// Parameter as parsed by the rule.
    pub param: Parameter,
    /// Whether the rule reads a sibling value.
    pub cross_field: bool,
    rule: Arc<dyn Rule>,
}

impl RuleInvocation {
    /// The evaluator.
    pub fn rule(&self) -> &Arc<dyn Rule> {
        &self.rule
    }

    /// Run the evaluator.
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> bool {
        self.rule.evaluate(ctx)
    }
}

impl std::fmt::Debug for RuleInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleInvocation")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("param", &self.param)
            .field("cross_field", &self.cross_field)
            .finish()
    }
}

/// One parsed element of a rule spec.
#[derive(Debug, Clone)]
pub enum Token {
    /// A rule to evaluate.
    Rule(RuleInvocation),
    /// Descend into the elements of an array or map.
    Dive,
    /// Start of the map key rules.
    Keys,
    /// End of the map key rules.
    EndKeys,
    /// Skip everything when the value is zero.
    OmitEmpty,
    /// `-`: never validate the field.
    Skip,
}

/// A rule spec arranged for walking.
#[derive(Debug, Clone, Default)]
pub struct CompiledSpec {
    /// The field is excluded from validation.
    pub skip: bool,
    /// Zero values skip rules and descent.
    pub omit_empty: bool,
    /// Rules applied to the value itself, in spec order.
    pub rules: Vec<RuleInvocation>,
    /// What to apply to elements, if the rule spec dives.
    pub dive: Option<Box<DiveSpec>>,
}

/// The part of a spec after `dive`.
#[derive(Debug, Clone, Default)]
pub struct DiveSpec {
    /// Rules for map keys (`keys ... endkeys`).
    pub keys: Option<CompiledSpec>,
    /// Rules for elements or map values.
    pub elements: CompiledSpec,
}

impl CompiledSpec {
    /// Whether the rule spec neither checks nor descends.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.dive.is_none() && !self.omit_empty && !self.skip
    }
}

/// Parse a rule spec into tokens, expanding aliases.
pub fn parse(spec: &str, registry: &RuleRegistry) -> ValidatorResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chain = Vec::new();
    expand(spec, spec, None, registry, &mut chain, &mut tokens)?;
    trace!("Parsed \"{}\" into {} tokens", spec, tokens.len());
    Ok(tokens)
}

/// Parse and compile a rule spec.
pub fn compile(spec: &str, registry: &RuleRegistry) -> ValidatorResult<CompiledSpec> {
    let tokens = parse(spec, registry)?;
    compile_tokens(&tokens, spec)
}

fn expand<'a>(
    spec: &str,
    fragment: &'a str,
    alias: Option<&'a str>,
    registry: &'a RuleRegistry,
    chain: &mut Vec<String>,
    out: &mut Vec<Token>,
) -> ValidatorResult<()> {
    for token in fragment.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (name, raw_param) = match token.split_once('=') {
            Some((name, param)) => (name.trim(), Some(param)),
            None => (token, None),
        };

        if let Some(marker) = marker(name) {
            if raw_param.is_some() {
                return Err(no_parameter(name, raw_param, "structural markers take no parameter"));
            }
            out.push(marker);
            continue;
        }

        match registry.resolve(name) {
            Some(Resolved::Alias(expansion)) => {
                if raw_param.is_some() {
                    return Err(no_parameter(name, raw_param, "aliases take no parameter"));
                }
                if chain.iter().any(|seen| seen == name) {
                    let mut cycle = chain.clone();
                    cycle.push(name.to_string());
                    return Err(ValidatorError::AliasCycle { chain: cycle });
                }
                chain.push(name.to_string());
                expand(spec, expansion, Some(alias.unwrap_or(name)), registry, chain, out)?;
                chain.pop();
            }
            Some(Resolved::Rule(rule)) => {
                let param = rule.parse_param(raw_param).map_err(|reason| {
                    ValidatorError::InvalidParameter {
                        rule: name.to_string(),
                        param: raw_param.map(str::to_string),
                        reason,
                    }
                })?;
                out.push(Token::Rule(RuleInvocation {
                    name: name.to_string(),
                    tag: alias.unwrap_or(name).to_string(),
                    raw_param: raw_param.map(str::to_string),
                    param,
                    cross_field: rule.is_cross_field(),
                    rule: Arc::clone(rule),
                }));
            }
            None => {
                return Err(ValidatorError::UnknownRule {
                    name: name.to_string(),
                    spec: spec.to_string(),
                })
            }
        }
    }
    Ok(())
}

fn marker(name: &str) -> Option<Token> {
    match name {
        "dive" => Some(Token::Dive),
        "keys" => Some(Token::Keys),
        "endkeys" => Some(Token::EndKeys),
        "omitempty" => Some(Token::OmitEmpty),
        "-" => Some(Token::Skip),
        _ => None,
    }
}

fn no_parameter(name: &str, raw_param: Option<&str>, reason: &str) -> ValidatorError {
    ValidatorError::InvalidParameter {
        rule: name.to_string(),
        param: raw_param.map(str::to_string),
        reason: reason.to_string(),
    }
}

/// Arrange tokens into a [`CompiledSpec`].
///
/// Tokens before the first `dive` belong to the value itself. A `dive`
/// may be followed directly by `keys ... endkeys`; everything after that
/// compiles recursively as the element spec, so `dive,dive,required`
/// reaches the elements of nested arrays.
pub fn compile_tokens(tokens: &[Token], spec: &str) -> ValidatorResult<CompiledSpec> {
    let mut compiled = CompiledSpec::default();

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Rule(invocation) => compiled.rules.push(invocation.clone()),
            Token::OmitEmpty => compiled.omit_empty = true,
            Token::Skip => compiled.skip = true,
            Token::Keys => {
                return Err(ValidatorError::KeysWithoutDive {
                    spec: spec.to_string(),
                })
            }
            Token::EndKeys => {
                return Err(ValidatorError::UnexpectedEndKeys {
                    spec: spec.to_string(),
                })
            }
            Token::Dive => {
                let rest = &tokens[i + 1..];
                let (keys, rest) = match rest.first() {
                    Some(Token::Keys) => {
                        let end = rest
                            .iter()
                            .position(|t| matches!(t, Token::EndKeys))
                            .ok_or_else(|| ValidatorError::UnmatchedKeys {
                                spec: spec.to_string(),
                            })?;
                        let keys = compile_tokens(&rest[1..end], spec)?;
                        (Some(keys), &rest[end + 1..])
                    }
                    _ => (None, rest),
                };
                let elements = compile_tokens(rest, spec)?;
                compiled.dive = Some(Box::new(DiveSpec { keys, elements }));
                break;
            }
        }
    }

    Ok(compiled)
}
