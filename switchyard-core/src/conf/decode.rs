//! Typed decoding of single attributes.

use crate::conf::error::ConfigError;
use crate::conf::eval::{EvalContext, value_to_string};
use crate::conf::types::Origin;
use hcl::{Attribute, Block, Value};
use std::path::PathBuf;

pub fn string(ctx: &EvalContext, attr: &Attribute, origin: &Origin) -> Result<String, ConfigError> {
    match evaluate(ctx, attr, origin)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(type_mismatch(attr, "string", &other, origin)),
    }
}

pub fn bool(ctx: &EvalContext, attr: &Attribute, origin: &Origin) -> Result<bool, ConfigError> {
    match evaluate(ctx, attr, origin)? {
        Value::Bool(b) => Ok(b),
        other => Err(type_mismatch(attr, "bool", &other, origin)),
    }
}

pub fn port(ctx: &EvalContext, attr: &Attribute, origin: &Origin) -> Result<u16, ConfigError> {
    let value = evaluate(ctx, attr, origin)?;
    let port = match &value {
        Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        _ => None,
    };

    match port {
        Some(p) if p > 0 => Ok(p),
        _ => Err(ConfigError::decode(
            origin,
            format!(
                "attribute '{}' must be a port number between 1 and 65535, got '{}'",
                attr.key(),
                value_to_string(&value)
            ),
        )),
    }
}

pub fn path(ctx: &EvalContext, attr: &Attribute, origin: &Origin) -> Result<PathBuf, ConfigError> {
    string(ctx, attr, origin).map(PathBuf::from)
}

/// Accepts a single string or a list of strings.
pub fn string_list(
    ctx: &EvalContext,
    attr: &Attribute,
    origin: &Origin,
) -> Result<Vec<String>, ConfigError> {
    match evaluate(ctx, attr, origin)? {
        Value::String(s) => Ok(vec![s]),
        Value::Array(values) => values
            .into_iter()
            .map(|value| match value {
                Value::String(s) => Ok(s),
                other => Err(type_mismatch(attr, "list of strings", &other, origin)),
            })
            .collect(),
        other => Err(type_mismatch(attr, "list of strings", &other, origin)),
    }
}

/// The first label of a block, if any.
pub fn label(block: &Block) -> Option<String> {
    block.labels().first().map(|l| l.as_str().to_string())
}

pub fn unsupported_attribute(attr: &Attribute, origin: &Origin) -> ConfigError {
    ConfigError::decode(
        origin,
        format!("unsupported argument; an argument named '{}' is not expected here", attr.key()),
    )
}

pub fn unsupported_block(block: &Block, origin: &Origin) -> ConfigError {
    ConfigError::decode(
        origin,
        format!(
            "unsupported block type; blocks of type '{}' are not expected here",
            block.identifier()
        ),
    )
}

pub fn duplicate_block(block: &Block, origin: &Origin) -> ConfigError {
    ConfigError::decode(
        origin,
        format!("duplicate '{}' block", block.identifier()),
    )
}

pub fn missing_attribute(name: &str, origin: &Origin) -> ConfigError {
    ConfigError::decode(
        origin,
        format!("the argument '{name}' is required, but no definition was found"),
    )
}

fn evaluate(ctx: &EvalContext, attr: &Attribute, origin: &Origin) -> Result<Value, ConfigError> {
    ctx.evaluate(attr.expr()).map_err(|e| {
        ConfigError::decode(
            origin,
            format!("failed to evaluate attribute '{}': {}", attr.key(), e),
        )
    })
}

fn type_mismatch(attr: &Attribute, expected: &str, got: &Value, origin: &Origin) -> ConfigError {
    let got = match got {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    };

    ConfigError::decode(
        origin,
        format!("attribute '{}' must be a {}, got {}", attr.key(), expected, got),
    )
}
