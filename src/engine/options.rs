//! The options record passed to `act`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::abort::AbortSignal;

/// What to do once the conversation no longer fits the context window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ContextOverflowPolicy {
    StopAtLimit,
    TruncateMiddle,
    RollingWindow,
}

/// Delimiters the engine uses to split reasoning from plain output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningParsing {
    pub enabled: bool,
    pub start_string: String,
    pub end_string: String,
}

/// Constrained-output setting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StructuredPrediction {
    None,
    #[serde(rename_all = "camelCase")]
    Json { json_schema: serde_json::Value },
}

/// A tool in the engine's legacy raw tool-use format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: LlmToolFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmToolFunction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// Raw tool-use setting, bypassing `act`'s own tool handling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ToolUseSetting {
    None,
    ToolArray {
        tools: Vec<LlmTool>,
        #[serde(default)]
        force: bool,
    },
}

/// Free-form key/value configuration forwarded verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KvConfig {
    pub fields: Vec<KvConfigField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KvConfigField {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// Final options for one `act` invocation.
///
/// A `None` field is absent from the record: it is skipped on serialization
/// and the engine applies its own default. There is no "present but empty"
/// state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_strings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k_sampling: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p_sampling: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredPrediction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_prediction_rounds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_parallel_tool_execution: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_overflow_policy: Option<ContextOverflowPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_stop_strings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xtc_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xtc_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_threads: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_parsing: Option<ReasoningParsing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_p_sampling: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_probs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_tools: Option<ToolUseSetting>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub speculative_decoding_num_draft_tokens_exact: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speculative_decoding_min_draft_length_to_consider: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speculative_decoding_min_continue_drafting_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<KvConfig>,

    /// Cancellation handle owned by the invocation; never serialized.
    #[serde(skip)]
    pub signal: Option<AbortSignal>,
}

impl ActOptions {
    /// JSON view of the record with absent fields omitted.
    pub fn to_raw_settings(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
