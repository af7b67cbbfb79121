//! Validation of the per-call provider options block.
//!
//! The block arrives as opaque JSON. Each known field is type-checked before
//! anything is deserialized so a failure can name the exact field path.
//! The first violation aborts the call; nothing of the block is applied.

use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::debug;

use super::settings::ChatSettings;
use crate::engine::ContextOverflowPolicy;
use crate::error::BridgeError;

type Check = fn(&Value, &str) -> Result<(), BridgeError>;

const FIELDS: &[(&str, Check)] = &[
    ("contextOverflowPolicy", check_context_overflow_policy),
    ("toolCallStopStrings", check_string_array),
    ("xtcProbability", check_number),
    ("xtcThreshold", check_number),
    ("cpuThreads", check_count),
    ("draftModel", check_string),
    ("reasoningParsing", check_reasoning_parsing),
    ("preset", check_string),
    ("minPSampling", check_number),
    ("logProbs", check_count),
    ("promptTemplate", check_any),
    ("rawTools", check_tool_use_setting),
    ("speculativeDecodingNumDraftTokensExact", check_count),
    ("speculativeDecodingMinDraftLengthToConsider", check_count),
    ("speculativeDecodingMinContinueDraftingProbability", check_number),
    ("raw", check_kv_config),
];

/// Validate and parse the provider options block.
///
/// `null` field values are accepted and mean "explicitly cleared".
/// Unknown keys are ignored.
pub fn parse_chat_settings(provider: &str, block: &Value) -> Result<ChatSettings, BridgeError> {
    let object = block.as_object().ok_or_else(|| {
        BridgeError::configuration(provider, mismatch("an object", block))
    })?;

    for (key, value) in object {
        match FIELDS.iter().find(|(name, _)| name == key) {
            Some((_, check)) if !value.is_null() => check(value, key)?,
            Some(_) => {}
            None => debug!(provider, key = key.as_str(), "ignoring unknown provider option"),
        }
    }

    serde_json::from_value(block.clone())
        .map_err(|err| BridgeError::configuration(provider, err.to_string()))
}

fn mismatch(expected: &str, value: &Value) -> String {
    format!("expected {expected}, got {}", json_type_name(value))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn child(path: &str, key: impl std::fmt::Display) -> String {
    format!("{path}.{key}")
}

fn check_any(_value: &Value, _path: &str) -> Result<(), BridgeError> {
    Ok(())
}

fn check_number(value: &Value, path: &str) -> Result<(), BridgeError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(BridgeError::configuration(path, mismatch("a number", value)))
    }
}

fn check_count(value: &Value, path: &str) -> Result<(), BridgeError> {
    match value.as_u64() {
        Some(n) if n <= u64::from(u32::MAX) => Ok(()),
        _ => Err(BridgeError::configuration(
            path,
            mismatch("a non-negative integer", value),
        )),
    }
}

fn check_bool(value: &Value, path: &str) -> Result<(), BridgeError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(BridgeError::configuration(path, mismatch("a boolean", value)))
    }
}

fn check_string(value: &Value, path: &str) -> Result<(), BridgeError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(BridgeError::configuration(path, mismatch("a string", value)))
    }
}

fn check_string_array(value: &Value, path: &str) -> Result<(), BridgeError> {
    let items = value
        .as_array()
        .ok_or_else(|| BridgeError::configuration(path, mismatch("an array of strings", value)))?;
    for (index, item) in items.iter().enumerate() {
        check_string(item, &child(path, index))?;
    }
    Ok(())
}

fn object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, BridgeError> {
    value
        .as_object()
        .ok_or_else(|| BridgeError::configuration(path, mismatch("an object", value)))
}

fn required(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
    check: Check,
) -> Result<(), BridgeError> {
    let path = child(path, key);
    match object.get(key) {
        Some(value) => check(value, &path),
        None => Err(BridgeError::configuration(path, "required field is missing")),
    }
}

fn optional(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
    check: Check,
) -> Result<(), BridgeError> {
    match object.get(key) {
        Some(Value::Null) | None => Ok(()),
        Some(value) => check(value, &child(path, key)),
    }
}

fn literal(value: &Value, path: &str, expected: &str) -> Result<(), BridgeError> {
    if value.as_str() == Some(expected) {
        Ok(())
    } else {
        Err(BridgeError::configuration(
            path,
            format!("expected \"{expected}\", got {value}"),
        ))
    }
}

fn check_context_overflow_policy(value: &Value, path: &str) -> Result<(), BridgeError> {
    match value.as_str().map(ContextOverflowPolicy::from_str) {
        Some(Ok(_)) => Ok(()),
        _ => Err(BridgeError::configuration(
            path,
            format!("expected one of stopAtLimit, truncateMiddle, rollingWindow, got {value}"),
        )),
    }
}

fn check_reasoning_parsing(value: &Value, path: &str) -> Result<(), BridgeError> {
    let fields = object(value, path)?;
    required(fields, "enabled", path, check_bool)?;
    required(fields, "startString", path, check_string)?;
    required(fields, "endString", path, check_string)
}

fn check_kv_config(value: &Value, path: &str) -> Result<(), BridgeError> {
    let config = object(value, path)?;
    required(config, "fields", path, check_kv_fields)
}

fn check_kv_fields(value: &Value, path: &str) -> Result<(), BridgeError> {
    let items = value
        .as_array()
        .ok_or_else(|| BridgeError::configuration(path, mismatch("an array", value)))?;
    for (index, item) in items.iter().enumerate() {
        let item_path = child(path, index);
        let field = object(item, &item_path)?;
        required(field, "key", &item_path, check_string)?;
    }
    Ok(())
}

fn check_tool_use_setting(value: &Value, path: &str) -> Result<(), BridgeError> {
    let setting = object(value, path)?;
    required(setting, "type", path, check_string)?;
    match setting.get("type").and_then(Value::as_str) {
        Some("none") => Ok(()),
        Some("toolArray") => {
            required(setting, "tools", path, check_llm_tools)?;
            optional(setting, "force", path, check_bool)
        }
        _ => Err(BridgeError::configuration(
            child(path, "type"),
            "expected one of none, toolArray",
        )),
    }
}

fn check_llm_tools(value: &Value, path: &str) -> Result<(), BridgeError> {
    let tools = value
        .as_array()
        .ok_or_else(|| BridgeError::configuration(path, mismatch("an array", value)))?;
    for (index, tool) in tools.iter().enumerate() {
        check_llm_tool(tool, &child(path, index))?;
    }
    Ok(())
}

fn check_llm_tool(value: &Value, path: &str) -> Result<(), BridgeError> {
    let tool = object(value, path)?;
    required(tool, "type", path, |kind, kind_path| {
        literal(kind, kind_path, "function")
    })?;
    required(tool, "function", path, check_llm_function)
}

fn check_llm_function(value: &Value, path: &str) -> Result<(), BridgeError> {
    let function = object(value, path)?;
    required(function, "name", path, check_string)?;
    optional(function, "description", path, check_string)?;
    optional(function, "parameters", path, check_llm_parameters)
}

fn check_llm_parameters(value: &Value, path: &str) -> Result<(), BridgeError> {
    let parameters = object(value, path)?;
    required(parameters, "type", path, |kind, kind_path| {
        literal(kind, kind_path, "object")
    })?;
    required(parameters, "properties", path, |properties, properties_path| {
        object(properties, properties_path).map(|_| ())
    })?;
    optional(parameters, "required", path, check_string_array)?;
    optional(parameters, "additionalProperties", path, check_bool)
}
