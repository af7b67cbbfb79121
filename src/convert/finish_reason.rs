use crate::engine::StopReason;
use crate::types::FinishReason;

/// Map an engine stop reason to a finish reason.
pub fn map_finish_reason(stop_reason: StopReason) -> FinishReason {
    match stop_reason {
        StopReason::UserStopped | StopReason::EosFound | StopReason::StopStringFound => {
            FinishReason::Stop
        }
        StopReason::MaxPredictedTokensReached | StopReason::ContextLengthReached => {
            FinishReason::Length
        }
        StopReason::Failed => FinishReason::Error,
        StopReason::ModelUnloaded => FinishReason::Other,
        StopReason::ToolCalls => FinishReason::ToolCalls,
    }
}

/// Finish reason reported for a run.
///
/// A round that issued tool calls may end with any native stop reason, so an
/// observed tool call always wins. Without one, `tool-calls` is never reported.
pub fn resolve_finish_reason(stop_reason: StopReason, tool_was_called: bool) -> FinishReason {
    if tool_was_called {
        return FinishReason::ToolCalls;
    }
    match map_finish_reason(stop_reason) {
        FinishReason::ToolCalls => FinishReason::Other,
        reason => reason,
    }
}
