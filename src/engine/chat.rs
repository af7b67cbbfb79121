//! The engine's chat message representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role of an engine chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EngineRole {
    System,
    User,
    Assistant,
    Tool,
}

/// Plain data of one engine chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessageData {
    pub role: EngineRole,
    pub content: Vec<ChatMessagePart>,
}

impl ChatMessageData {
    pub fn new(role: EngineRole, content: Vec<ChatMessagePart>) -> Self {
        Self { role, content }
    }

    /// Tool call requests carried by this message.
    pub fn tool_call_requests(&self) -> impl Iterator<Item = &FunctionToolCallRequest> {
        self.content.iter().filter_map(|part| match part {
            ChatMessagePart::ToolCallRequest { tool_call_request } => Some(tool_call_request),
            _ => None,
        })
    }
}

/// A single part of an engine chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatMessagePart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    File {
        name: String,
        identifier: String,
    },
    #[serde(rename_all = "camelCase")]
    ToolCallRequest {
        tool_call_request: FunctionToolCallRequest,
    },
    #[serde(rename_all = "camelCase")]
    ToolCallResult {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call_id: Option<String>,
        content: String,
    },
}

impl ChatMessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Wire name of the part type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::File { .. } => "file",
            Self::ToolCallRequest { .. } => "toolCallRequest",
            Self::ToolCallResult { .. } => "toolCallResult",
        }
    }
}

/// A function call the model asked the engine to perform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionToolCallRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default = "function_type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

fn function_type() -> String {
    "function".to_string()
}

impl FunctionToolCallRequest {
    pub fn new(id: Option<String>, name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id,
            kind: function_type(),
            name: name.into(),
            arguments,
        }
    }
}

/// A message as the engine hands it to observers.
///
/// Owns its data; observers copy it out through [`ChatMessage::data`]
/// before the engine moves on.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    data: ChatMessageData,
}

impl ChatMessage {
    pub fn new(data: ChatMessageData) -> Self {
        Self { data }
    }

    pub fn role(&self) -> EngineRole {
        self.data.role
    }

    pub fn data(&self) -> &ChatMessageData {
        &self.data
    }

    pub fn into_data(self) -> ChatMessageData {
        self.data
    }
}

impl From<ChatMessageData> for ChatMessage {
    fn from(data: ChatMessageData) -> Self {
        Self::new(data)
    }
}
