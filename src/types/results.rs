//! Result types of the generic contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::generation::FinishReason;
use super::usage::Usage;
use super::warning::CallWarning;
use crate::engine::{ChatMessageData, PredictionResult};

/// A tool call issued by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    pub tool_call_id: String,
    pub tool_name: String,
    /// Arguments as a JSON object.
    pub args: Value,
}

impl ToolCall {
    /// Arguments serialized as a JSON string.
    pub fn args_json(&self) -> String {
        self.args.to_string()
    }
}

/// One item of generated output content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GeneratedContent {
    Text { text: String },
    ToolCall(ToolCall),
}

/// What was actually sent to the engine, for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestMetadata {
    pub prompt: Vec<ChatMessageData>,
    /// The merged options with absent fields omitted.
    pub settings: Value,
}

/// What the engine reported back, for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseMetadata {
    pub model_id: String,
    pub body: PredictionResult,
}

/// Result of a one-shot generation.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub content: Vec<GeneratedContent>,
    pub text: Option<String>,
    pub reasoning: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
    pub warnings: Vec<CallWarning>,
    pub request: RequestMetadata,
    pub response: ResponseMetadata,
}
