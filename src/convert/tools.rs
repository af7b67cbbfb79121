//! Tool declarations and tool choice into the engine's tool list.

use crate::engine::{EngineTool, RawFunctionDeclaration};
use crate::types::{CallWarning, ToolChoice, ToolDeclaration};

/// Build the tool list for `act` from the caller's declarations.
///
/// Only function tools are forwarded, as schema-only declarations.
pub fn prepare_tools(
    tools: &[ToolDeclaration],
    tool_choice: Option<&ToolChoice>,
) -> (Vec<EngineTool>, Vec<CallWarning>) {
    if matches!(tool_choice, Some(ToolChoice::None)) {
        return (Vec::new(), Vec::new());
    }

    let mut prepared = Vec::with_capacity(tools.len());
    let mut warnings = Vec::new();

    for tool in tools {
        let ToolDeclaration::Function(function) = tool else {
            warnings.push(CallWarning::UnsupportedTool {
                tool_name: Some(tool.name().to_string()),
                details: format!("Not implemented for tool type {}", tool.kind()),
            });
            continue;
        };

        if let Some(ToolChoice::Tool { tool_name }) = tool_choice {
            if *tool_name != function.name {
                warnings.push(CallWarning::UnsupportedTool {
                    tool_name: Some(function.name.clone()),
                    details: format!(
                        "Tool {} is not the tool specified in toolChoice",
                        function.name
                    ),
                });
                continue;
            }
        }

        prepared.push(EngineTool::RawFunction(RawFunctionDeclaration {
            name: function.name.clone(),
            description: function.description.clone().unwrap_or_default(),
            parameters_json_schema: function.parameters.clone(),
        }));
    }

    if matches!(tool_choice, Some(ToolChoice::Required)) {
        warnings.push(CallWarning::other(
            "Required tool choice is not supported by the engine",
        ));
    }

    (prepared, warnings)
}
