//! The action-based execution engine, seen from the bridge.
//!
//! Everything here describes the collaborator's surface: how a model is
//! loaded, what `act` takes, which callbacks it drives and which data shapes
//! flow through them. Implementations live outside this crate (an LM Studio
//! client, or a scripted engine in tests).

pub mod abort;
pub mod chat;
pub mod observer;
pub mod options;
pub mod prediction;
pub mod tool;

pub use abort::{AbortController, AbortReason, AbortSignal};
pub use chat::{
    ChatMessage, ChatMessageData, ChatMessagePart, EngineRole, FunctionToolCallRequest,
};
pub use observer::ActObserver;
pub use options::{
    ActOptions, ContextOverflowPolicy, KvConfig, KvConfigField, LlmTool, LlmToolFunction,
    ReasoningParsing, StructuredPrediction, ToolUseSetting,
};
pub use prediction::{
    ModelInfo, PredictionFragment, PredictionResult, PredictionStats, ReasoningType, StopReason,
};
pub use tool::{EngineTool, RawFunctionDeclaration};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Title prefix the engine uses when a requested model does not exist.
pub const MODEL_NOT_FOUND_PREFIX: &str = "Model not found: ";

/// Failure reported by the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The run observed its abort signal and stopped.
    #[error("Prediction aborted: {0}")]
    Aborted(AbortReason),

    /// Any other failure. `title` is the engine's one-line summary.
    #[error("{title}")]
    Failed {
        title: String,
        cause: Option<String>,
    },
}

impl EngineError {
    pub fn aborted(reason: AbortReason) -> Self {
        Self::Aborted(reason)
    }

    pub fn failed(title: impl Into<String>) -> Self {
        Self::Failed {
            title: title.into(),
            cause: None,
        }
    }

    /// The engine's summary line, if it carries one.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Failed { title, .. } => Some(title),
            Self::Aborted(_) => None,
        }
    }

    /// Whether the title follows the "model not found" convention.
    pub fn is_model_not_found(&self) -> bool {
        self.title()
            .is_some_and(|title| title.starts_with(MODEL_NOT_FOUND_PREFIX))
    }
}

/// Entry point of the engine: resolves model identifiers to loaded models.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Load (or attach to) the model with the given identifier.
    async fn load(&self, model_id: &str) -> Result<Arc<dyn LoadedModel>, EngineError>;
}

/// A loaded model that can run multi-round, tool-augmented predictions.
#[async_trait]
pub trait LoadedModel: Send + Sync {
    /// Identifier the engine reports for this model.
    fn identifier(&self) -> &str;

    /// Run the agentic loop over `chat` with the given tools.
    ///
    /// Callbacks on `observer` are delivered in order and never overlap.
    /// Resolves once the loop ends; rejects with [`EngineError::Aborted`]
    /// when `options.signal` fires.
    async fn act(
        &self,
        chat: Vec<ChatMessageData>,
        tools: Vec<EngineTool>,
        options: ActOptions,
        observer: &mut (dyn ActObserver + Send),
    ) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_found_is_detected_by_title_prefix() {
        let err = EngineError::failed("Model not found: qwen3-1.7b");
        assert!(err.is_model_not_found());
        assert!(!EngineError::failed("Connection refused").is_model_not_found());
        assert!(!EngineError::aborted(AbortReason::RoundBoundary).is_model_not_found());
    }
}
