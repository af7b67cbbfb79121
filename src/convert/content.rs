//! Engine chat messages back into generated content.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::engine::{ChatMessageData, ChatMessagePart, EngineRole, FunctionToolCallRequest};
use crate::types::{CallWarning, GeneratedContent, ToolCall};

/// Convert engine messages into generated content.
///
/// Tool-role messages carry results the caller supplied and are not part of
/// the model's output, so they are left out.
pub fn from_engine(messages: &[ChatMessageData]) -> (Vec<GeneratedContent>, Vec<CallWarning>) {
    let mut content = Vec::new();
    let mut warnings = Vec::new();

    for message in messages {
        if message.role == EngineRole::Tool {
            debug!(parts = message.content.len(), "skipping tool-role engine message");
            continue;
        }

        for part in &message.content {
            match (message.role, part) {
                (_, ChatMessagePart::Text { text }) => {
                    content.push(GeneratedContent::Text { text: text.clone() });
                }
                (EngineRole::Assistant, ChatMessagePart::ToolCallRequest { tool_call_request }) => {
                    content.push(GeneratedContent::ToolCall(tool_call_from_request(
                        tool_call_request,
                    )));
                }
                (_, other) => warnings.push(CallWarning::unsupported_content(other.type_name())),
            }
        }
    }

    (content, warnings)
}

/// All tool calls requested by assistant messages, in order.
pub fn tool_calls(messages: &[ChatMessageData]) -> Vec<ToolCall> {
    messages
        .iter()
        .filter(|message| message.role == EngineRole::Assistant)
        .flat_map(ChatMessageData::tool_call_requests)
        .map(tool_call_from_request)
        .collect()
}

/// A fresh `call_<uuid>` id for a request the engine left unnamed.
pub fn synthesize_tool_call_id() -> String {
    format!("call_{}", Uuid::new_v4().simple())
}

/// Convert one engine request, synthesizing an id when the engine gave none.
pub fn tool_call_from_request(request: &FunctionToolCallRequest) -> ToolCall {
    ToolCall {
        tool_call_id: request.id.clone().unwrap_or_else(synthesize_tool_call_id),
        tool_name: request.name.clone(),
        args: Value::Object(request.arguments.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::to_engine;
    use crate::types::ModelMessage;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn texts(content: &[GeneratedContent]) -> Vec<&str> {
        content
            .iter()
            .filter_map(|item| match item {
                GeneratedContent::Text { text } => Some(text.as_str()),
                GeneratedContent::ToolCall(_) => None,
            })
            .collect()
    }

    #[test]
    fn text_round_trip_is_lossless() {
        let prompt = vec![
            ModelMessage::system("You are terse."),
            ModelMessage::user("2+2?\nand  spaces "),
            ModelMessage::assistant(""),
            ModelMessage::assistant("four ✓"),
        ];

        let (engine, _) = to_engine(&prompt).unwrap();
        let (content, warnings) = from_engine(&engine);

        assert!(warnings.is_empty());
        let original: Vec<String> = prompt.iter().map(ModelMessage::text).collect();
        assert_eq!(texts(&content), original);
    }

    #[test]
    fn tool_requests_become_tool_calls() {
        let message = ChatMessageData::new(
            EngineRole::Assistant,
            vec![
                ChatMessagePart::text("let me compute"),
                ChatMessagePart::ToolCallRequest {
                    tool_call_request: FunctionToolCallRequest::new(
                        Some("call_7".into()),
                        "calculator",
                        json!({"a": 1, "b": 1}).as_object().cloned().unwrap(),
                    ),
                },
            ],
        );

        let (content, _) = from_engine(&[message]);

        assert_eq!(
            content,
            vec![
                GeneratedContent::Text {
                    text: "let me compute".into()
                },
                GeneratedContent::ToolCall(ToolCall {
                    tool_call_id: "call_7".into(),
                    tool_name: "calculator".into(),
                    args: json!({"a": 1, "b": 1}),
                }),
            ]
        );
    }

    #[test]
    fn missing_ids_are_synthesized_uniquely() {
        let request = FunctionToolCallRequest::new(None, "lookup", Default::default());
        let first = tool_call_from_request(&request);
        let second = tool_call_from_request(&request);

        assert!(first.tool_call_id.starts_with("call_"));
        assert_ne!(first.tool_call_id, second.tool_call_id);
        assert_eq!(first.args, json!({}));
    }

    #[test]
    fn tool_messages_are_excluded() {
        let messages = vec![
            ChatMessageData::new(
                EngineRole::Tool,
                vec![ChatMessagePart::ToolCallResult {
                    tool_call_id: Some("call_1".into()),
                    content: "2".into(),
                }],
            ),
            ChatMessageData::new(EngineRole::Assistant, vec![ChatMessagePart::text("2")]),
        ];

        let (content, warnings) = from_engine(&messages);
        assert_eq!(content, vec![GeneratedContent::Text { text: "2".into() }]);
        assert!(warnings.is_empty());
        assert!(tool_calls(&messages).is_empty());
    }

    #[test]
    fn file_parts_warn() {
        let message = ChatMessageData::new(
            EngineRole::User,
            vec![ChatMessagePart::File {
                name: "a.png".into(),
                identifier: "f1".into(),
            }],
        );

        let (content, warnings) = from_engine(&[message]);
        assert!(content.is_empty());
        assert_eq!(warnings, vec![CallWarning::unsupported_content("file")]);
    }
}
