//! Prompt conversion into engine chat messages.

use serde_json::Value;

use crate::engine::{ChatMessageData, ChatMessagePart, EngineRole, FunctionToolCallRequest};
use crate::error::{BridgeError, Result};
use crate::types::{CallWarning, ContentPart, ModelMessage, Role, ToolCallPart};

/// Convert a prompt into engine chat messages.
///
/// Parts the engine cannot represent for a role are skipped with an
/// [`CallWarning::UnsupportedContent`]. Assistant tool calls whose arguments
/// are not a JSON object fail the whole conversion.
pub fn to_engine(prompt: &[ModelMessage]) -> Result<(Vec<ChatMessageData>, Vec<CallWarning>)> {
    let mut messages = Vec::with_capacity(prompt.len());
    let mut warnings = Vec::new();

    for message in prompt {
        let mut parts = Vec::with_capacity(message.content.len());
        for part in &message.content {
            match convert_part(message.role, part)? {
                Some(converted) => parts.push(converted),
                None => warnings.push(CallWarning::unsupported_content(part.type_name())),
            }
        }
        messages.push(ChatMessageData::new(engine_role(message.role), parts));
    }

    Ok((messages, warnings))
}

fn engine_role(role: Role) -> EngineRole {
    match role {
        Role::System => EngineRole::System,
        Role::User => EngineRole::User,
        Role::Assistant => EngineRole::Assistant,
        Role::Tool => EngineRole::Tool,
    }
}

/// `Ok(None)` means the part has no engine counterpart for this role.
fn convert_part(role: Role, part: &ContentPart) -> Result<Option<ChatMessagePart>> {
    let converted = match (role, part) {
        (Role::System | Role::User | Role::Assistant, ContentPart::Text { text }) => {
            Some(ChatMessagePart::text(text.clone()))
        }
        (Role::Assistant, ContentPart::ToolCall(call)) => Some(tool_call_request(call)?),
        (Role::Tool, ContentPart::ToolResult(result)) => Some(ChatMessagePart::ToolCallResult {
            tool_call_id: Some(result.tool_call_id.clone()),
            content: serde_json::to_string(&result.result)?,
        }),
        _ => None,
    };
    Ok(converted)
}

fn tool_call_request(call: &ToolCallPart) -> Result<ChatMessagePart> {
    let Value::Object(arguments) = &call.args else {
        return Err(BridgeError::InvalidToolArguments {
            tool_name: call.tool_name.clone(),
            args: call.args.to_string(),
            reason: "top-level arguments must be an object with string keys".to_string(),
        });
    };

    Ok(ChatMessagePart::ToolCallRequest {
        tool_call_request: FunctionToolCallRequest::new(
            Some(call.tool_call_id.clone()),
            call.tool_name.clone(),
            arguments.clone(),
        ),
    })
}
