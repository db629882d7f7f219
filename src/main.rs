//! tagcheck CLI - Tag-driven Value Validation
//!
//! This is a demonstration CLI for the tagcheck library.

use anyhow::{bail, Context, Result};
use std::fs;
use tagcheck::prelude::*;

/// Options shared by all commands.
#[derive(Debug, Default)]
struct Options {
    json: bool,
    config: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("tagcheck");
    let (options, rest) = parse_options(args.get(1..).unwrap_or_default())?;

    let Some(command) = rest.first() else {
        print_usage(program);
        return Ok(());
    };

    match command.as_str() {
        "rules" => list_rules(&options),
        "var" => {
            if rest.len() < 3 {
                eprintln!("Error: Please specify a rule spec and a JSON value");
                eprintln!("Usage: {} var <spec> <json>", program);
                std::process::exit(2);
            }
            check_var(&options, &rest[1], &rest[2])
        }
        "check" => {
            if rest.len() < 3 {
                eprintln!("Error: Please specify a schema and a document");
                eprintln!("Usage: {} check <schema.toml> <document.json>", program);
                std::process::exit(2);
            }
            check_document(&options, &rest[1], &rest[2])
        }
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(program);
            std::process::exit(2);
        }
    }
}

fn parse_options(args: &[String]) -> Result<(Options, Vec<String>)> {
    let mut options = Options::default();
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => options.json = true,
            "--config" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("--config requires a path");
                };
                options.config = Some(path.clone());
                i += 1;
            }
            _ => rest.push(args[i].clone()),
        }
        i += 1;
    }

    Ok((options, rest))
}

fn print_usage(program: &str) {
    println!("tagcheck v{} - Tag-driven Value Validation", tagcheck::VERSION);
    println!();
    println!("Usage: {} [options] <command> [args]", program);
    println!();
    println!("Commands:");
    println!("  rules                          List all rules and aliases");
    println!("  var <spec> <json>              Validate one value against a rule spec");
    println!("  check <schema> <document>      Validate a JSON document against a TOML schema");
    println!("  help                           Show this help message");
    println!();
    println!("Options:");
    println!("  --config <file>   Load aliases from a TOML config file");
    println!("  --json            Print results as JSON");
    println!();
    println!("Exit status is 1 when validation fails. Set RUST_LOG=debug for logs.");
}

fn build_validator(options: &Options, extra: ValidatorConfig) -> Result<Validator> {
    let mut config = match &options.config {
        Some(path) => ValidatorConfig::load(path)
            .with_context(|| format!("failed to load config '{}'", path))?,
        None => ValidatorConfig::new(),
    };
    config.merge(extra);
    Ok(Validator::with_config(config)?)
}

fn list_rules(options: &Options) -> Result<()> {
    let validator = build_validator(options, ValidatorConfig::new())?;
    let registry = validator.registry();

    println!("Available rules ({} total):", registry.len());
    println!();

    for (category, rules) in registry.grouped_by_category() {
        println!("  📁 {}", category.display_name());
        for (name, entry) in rules {
            println!("      • {} - {}", name, entry.rule.description());
        }
        println!();
    }

    let aliases: Vec<_> = registry.aliases().collect();
    if !aliases.is_empty() {
        println!("Aliases:");
        for (name, expansion) in aliases {
            println!("      • {} = \"{}\"", name, expansion);
        }
    }
    Ok(())
}

fn check_var(options: &Options, spec: &str, text: &str) -> Result<()> {
    let validator = build_validator(options, ValidatorConfig::new())?;
    // Bare words that are not JSON are taken as strings.
    let value = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => Value::from(json),
        Err(_) => Value::from(text),
    };

    let result = validator
        .var(&value, spec)
        .with_context(|| format!("invalid rule spec \"{}\"", spec))?;
    report(options, &result)
}

fn check_document(options: &Options, schema_path: &str, document_path: &str) -> Result<()> {
    let schema = Schema::load(schema_path)
        .with_context(|| format!("failed to load schema '{}'", schema_path))?;
    let validator = build_validator(options, schema.config())?;

    let text = fs::read_to_string(document_path)
        .with_context(|| format!("failed to read document '{}'", document_path))?;
    let value = schema
        .bind_str(&text)
        .with_context(|| format!("document '{}' does not match the schema", document_path))?;

    let result = validator.validate_struct(&value)?;
    report(options, &result)
}

fn report(options: &Options, result: &ValidationResult) -> Result<()> {
    if options.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", result.summary());
        for (i, failure) in result.iter().enumerate() {
            let param = failure
                .param
                .as_deref()
                .map(|p| format!(" (param: {})", p))
                .unwrap_or_default();
            println!("  {}. {}{}", i + 1, failure, param);
        }
    }

    if !result.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
