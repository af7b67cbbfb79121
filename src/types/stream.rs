//! Streaming types.

use std::fmt;

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use super::generation::FinishReason;
use super::results::{RequestMetadata, ToolCall};
use super::usage::Usage;
use super::warning::CallWarning;
use crate::error::BridgeError;

/// An event of a streamed generation, in emission order.
///
/// Every `*-delta` and `*-end` reuses the id of the `*-start` that opened its span.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamEvent {
    TextStart {
        id: String,
    },
    TextDelta {
        id: String,
        delta: String,
    },
    TextEnd {
        id: String,
    },
    ReasoningStart {
        id: String,
    },
    ReasoningDelta {
        id: String,
        delta: String,
    },
    ReasoningEnd {
        id: String,
    },
    ToolCall(ToolCall),
    #[serde(rename_all = "camelCase")]
    Finish {
        finish_reason: FinishReason,
        usage: Usage,
    },
}

impl StreamEvent {
    /// Span id carried by start/delta/end events.
    pub fn span_id(&self) -> Option<&str> {
        match self {
            Self::TextStart { id }
            | Self::TextDelta { id, .. }
            | Self::TextEnd { id }
            | Self::ReasoningStart { id }
            | Self::ReasoningDelta { id, .. }
            | Self::ReasoningEnd { id } => Some(id),
            Self::ToolCall(_) | Self::Finish { .. } => None,
        }
    }

    pub fn is_finish(&self) -> bool {
        matches!(self, Self::Finish { .. })
    }
}

/// Stream of events; a terminal failure arrives as the last item.
pub type EventStream = BoxStream<'static, Result<StreamEvent, BridgeError>>;

/// Result of starting a streamed generation.
pub struct StreamResult {
    pub stream: EventStream,
    pub warnings: Vec<CallWarning>,
    pub request: RequestMetadata,
}

impl fmt::Debug for StreamResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamResult")
            .field("warnings", &self.warnings)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}
