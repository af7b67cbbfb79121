//! Call options, tool declarations and related enums.

use std::collections::HashMap;

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::engine::AbortSignal;
use crate::tools::ToolParameters;

/// Options for a single generate/stream call.
///
/// `None` means the caller has no opinion and lower configuration layers
/// (provider settings, engine defaults) apply.
#[derive(Debug, Clone, Default, Builder)]
pub struct CallOptions {
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub stop_sequences: Option<Vec<String>>,
    pub top_k: Option<u32>,
    pub top_p: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub seed: Option<u64>,
    pub response_format: Option<ResponseFormat>,
    #[builder(default)]
    pub tools: Vec<ToolDeclaration>,
    pub tool_choice: Option<ToolChoice>,
    /// Fires when the caller gives up on the call.
    pub abort_signal: Option<AbortSignal>,
    /// Opaque per-provider options keyed by provider name.
    #[builder(default)]
    pub provider_options: HashMap<String, Value>,
}

impl CallOptions {
    /// The opaque options block addressed to `provider`, if any.
    pub fn provider_options_for(&self, provider: &str) -> Option<&Value> {
        self.provider_options.get(provider)
    }
}

/// Requested response format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    Json {
        schema: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// A tool the model may call, as declared by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ToolDeclaration {
    Function(FunctionToolDeclaration),
    ProviderDefined(ProviderDefinedTool),
}

impl ToolDeclaration {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
    ) -> Self {
        Self::Function(FunctionToolDeclaration {
            name: name.into(),
            description: Some(description.into()),
            parameters: parameters.schema,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Function(tool) => &tool.name,
            Self::ProviderDefined(tool) => &tool.name,
        }
    }

    /// Wire name of the declaration kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::ProviderDefined(_) => "provider-defined",
        }
    }
}

/// A function tool described by a JSON schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionToolDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Value,
}

/// A tool whose implementation is owned by some provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderDefinedTool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

/// Policy for which tools the model may call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ToolChoice {
    Auto,
    None,
    Required,
    #[serde(rename_all = "camelCase")]
    Tool { tool_name: String },
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    Error,
    Other,
    Unknown,
}
