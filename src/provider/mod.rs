//! The generic language-model contract and the engine-backed provider.

pub mod chat_model;
pub(crate) mod round;
pub(crate) mod stream;

pub use chat_model::LmStudioChatModel;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ProviderSettings;
use crate::engine::Engine;
use crate::error::Result;
use crate::types::{CallOptions, GenerateResult, ModelMessage, StreamResult};

/// Provider name; also the key of the provider block in `CallOptions::provider_options`.
pub const PROVIDER_NAME: &str = "lmstudio";

/// Core trait of the generic text-generation contract.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider name (e.g., "lmstudio").
    fn provider(&self) -> &str;
    /// The model ID this instance serves.
    fn model_id(&self) -> &str;

    /// Generate a complete response.
    ///
    /// Unsupported settings, content and tools are reported in
    /// [`GenerateResult::warnings`], never as errors.
    async fn generate(
        &self,
        prompt: &[ModelMessage],
        options: &CallOptions,
    ) -> Result<GenerateResult>;

    /// Start a streamed response.
    ///
    /// Validation and model-load errors are returned here; failures during
    /// the run arrive as the last item of the stream.
    async fn stream(&self, prompt: &[ModelMessage], options: &CallOptions) -> Result<StreamResult>;
}

/// Factory for engine-backed chat models sharing one engine and one set of settings.
#[derive(Clone)]
pub struct LmStudioProvider {
    engine: Arc<dyn Engine>,
    settings: ProviderSettings,
}

impl LmStudioProvider {
    pub fn new(engine: Arc<dyn Engine>, settings: ProviderSettings) -> Self {
        Self { engine, settings }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn chat(&self, model_id: impl Into<String>) -> LmStudioChatModel {
        LmStudioChatModel::new(Arc::clone(&self.engine), model_id, self.settings.clone())
    }

    /// Same as [`LmStudioProvider::chat`].
    pub fn language_model(&self, model_id: impl Into<String>) -> LmStudioChatModel {
        self.chat(model_id)
    }
}

impl std::fmt::Debug for LmStudioProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LmStudioProvider")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
