//! Convenience re-exports for common use.

pub use crate::config::ProviderSettings;
pub use crate::engine::{AbortController, AbortReason, AbortSignal};
pub use crate::error::{BridgeError, Result};
pub use crate::options::{ChatSettings, Explicit};
pub use crate::provider::{LanguageModel, LmStudioChatModel, LmStudioProvider};
pub use crate::types::{
    CallOptions, CallWarning, ContentPart, FinishReason, GenerateResult, ModelMessage, Role,
    StreamEvent, StreamResult, ToolChoice, ToolDeclaration, Usage,
};
