//! Fragments and final results of an engine prediction.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the engine classified a fragment with respect to reasoning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ReasoningType {
    /// Ordinary output.
    None,
    /// Content between the reasoning delimiters.
    Reasoning,
    /// The opening reasoning delimiter itself.
    ReasoningStartTag,
    /// The closing reasoning delimiter itself.
    ReasoningEndTag,
}

/// An incremental piece of generated output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionFragment {
    pub content: String,
    #[serde(default)]
    pub tokens_count: u32,
    #[serde(default)]
    pub contains_drafted: bool,
    pub reasoning_type: ReasoningType,
    #[serde(default)]
    pub round_index: u32,
}

impl PredictionFragment {
    pub fn new(content: impl Into<String>, reasoning_type: ReasoningType) -> Self {
        Self {
            content: content.into(),
            tokens_count: 1,
            contains_drafted: false,
            reasoning_type,
            round_index: 0,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(content, ReasoningType::None)
    }

    pub fn reasoning(content: impl Into<String>) -> Self {
        Self::new(content, ReasoningType::Reasoning)
    }
}

/// The engine's closed set of reasons a prediction stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StopReason {
    UserStopped,
    ModelUnloaded,
    Failed,
    EosFound,
    StopStringFound,
    ToolCalls,
    MaxPredictedTokensReached,
    ContextLengthReached,
}

/// Aggregate statistics of a finished prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionStats {
    pub stop_reason: StopReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_tokens_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_per_second: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_first_token_sec: Option<f64>,
}

impl PredictionStats {
    pub fn new(stop_reason: StopReason) -> Self {
        Self {
            stop_reason,
            prompt_tokens_count: None,
            predicted_tokens_count: None,
            total_tokens_count: None,
            tokens_per_second: None,
            time_to_first_token_sec: None,
        }
    }
}

/// Descriptor of the model that served a prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_key: Option<String>,
}

/// Final aggregate of one prediction round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_reasoning_content: Option<String>,
    pub stats: PredictionStats,
    pub model_info: ModelInfo,
    #[serde(default)]
    pub round_index: u32,
}
