//! The [`LanguageModel`] implementation on top of the engine's `act`.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, OnceCell};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use super::round::RoundState;
use super::stream::StreamSynthesizer;
use super::{LanguageModel, PROVIDER_NAME};
use crate::config::ProviderSettings;
use crate::convert::{from_engine, prepare_tools, resolve_finish_reason, to_engine, tool_calls};
use crate::engine::{
    ActObserver, ActOptions, ChatMessage, ChatMessageData, Engine, EngineError, EngineTool,
    LoadedModel, PredictionResult,
};
use crate::error::{BridgeError, Result};
use crate::options::convert_call_options;
use crate::types::{
    CallOptions, CallWarning, GenerateResult, ModelMessage, RequestMetadata, ResponseMetadata,
    StreamResult, Usage,
};

/// Everything needed for one `act` call, computed before the engine is touched.
struct PreparedCall {
    chat: Vec<ChatMessageData>,
    tools: Vec<EngineTool>,
    options: ActOptions,
    warnings: Vec<CallWarning>,
}

impl PreparedCall {
    fn request_metadata(&self) -> RequestMetadata {
        RequestMetadata {
            prompt: self.chat.clone(),
            settings: self.options.to_raw_settings(),
        }
    }
}

/// A chat model served by the engine.
///
/// The model is loaded on first use and the handle is reused by later calls.
/// Each call runs exactly one round of the engine's tool loop.
pub struct LmStudioChatModel {
    engine: Arc<dyn Engine>,
    model_id: String,
    settings: ProviderSettings,
    loaded: OnceCell<Arc<dyn LoadedModel>>,
}

impl LmStudioChatModel {
    pub fn new(
        engine: Arc<dyn Engine>,
        model_id: impl Into<String>,
        settings: ProviderSettings,
    ) -> Self {
        Self {
            engine,
            model_id: model_id.into(),
            settings,
            loaded: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Load the model, or return the cached handle.
    async fn model(&self) -> Result<Arc<dyn LoadedModel>> {
        let model = self
            .loaded
            .get_or_try_init(|| async {
                debug!(model_id = %self.model_id, "loading model");
                self.engine
                    .load(&self.model_id)
                    .await
                    .map_err(|err| self.load_error(err))
            })
            .await?;
        Ok(Arc::clone(model))
    }

    fn load_error(&self, err: EngineError) -> BridgeError {
        let model_id = self.model_id.clone();
        match err.title() {
            Some(title) if err.is_model_not_found() => BridgeError::NoSuchModel {
                model_id,
                message: title.to_string(),
            },
            _ => BridgeError::ModelLoad {
                model_id,
                message: err.to_string(),
            },
        }
    }

    /// Merge options, convert the prompt and the tools. Fails before any engine work.
    fn prepare(&self, prompt: &[ModelMessage], options: &CallOptions) -> Result<PreparedCall> {
        let (act_options, mut warnings) =
            convert_call_options(PROVIDER_NAME, options, &self.settings.chat)?;
        let (chat, message_warnings) = to_engine(prompt)?;
        let (tools, tool_warnings) = prepare_tools(&options.tools, options.tool_choice.as_ref());
        warnings.extend(message_warnings);
        warnings.extend(tool_warnings);

        Ok(PreparedCall {
            chat,
            tools,
            options: act_options,
            warnings,
        })
    }
}

/// Observer for one-shot calls: only the round protocol and accumulators.
struct GenerateObserver {
    round: RoundState,
}

impl ActObserver for GenerateObserver {
    fn on_message(&mut self, message: &ChatMessage) {
        self.round.record_message(message);
    }

    fn on_round_end(&mut self, round_index: u32) {
        self.round.end_round(round_index);
    }

    fn on_prediction_completed(&mut self, result: &PredictionResult) {
        self.round.complete(result);
    }

    fn on_failure(&mut self, error: &EngineError) {
        debug!(error = %error, "engine reported failure");
    }
}

#[async_trait]
impl LanguageModel for LmStudioChatModel {
    fn provider(&self) -> &str {
        PROVIDER_NAME
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(
        &self,
        prompt: &[ModelMessage],
        options: &CallOptions,
    ) -> Result<GenerateResult> {
        let prepared = self.prepare(prompt, options)?;
        let model = self.model().await?;

        let round = RoundState::new(options.abort_signal.as_ref());
        let mut act_options = prepared.options.clone();
        act_options.signal = Some(round.signal());
        let request = prepared.request_metadata();

        debug!(model_id = %self.model_id, state = "running", "starting act");
        let mut observer = GenerateObserver { round };
        let outcome = model
            .act(prepared.chat, prepared.tools, act_options, &mut observer)
            .await;
        let settled = observer.round.settle(outcome)?;

        let mut warnings = prepared.warnings;
        let (content, content_warnings) = from_engine(&settled.messages);
        warnings.extend(content_warnings);

        let completion = settled.completion;
        let finish_reason =
            resolve_finish_reason(completion.stats.stop_reason, settled.tool_was_called);
        Ok(GenerateResult {
            content,
            text: completion
                .non_reasoning_content
                .clone()
                .or_else(|| Some(completion.content.clone())),
            reasoning: completion.reasoning_content.clone(),
            tool_calls: tool_calls(&settled.messages),
            finish_reason,
            usage: Usage::from(&completion.stats),
            warnings,
            request,
            response: ResponseMetadata {
                model_id: completion.model_info.identifier.clone(),
                body: completion,
            },
        })
    }

    async fn stream(&self, prompt: &[ModelMessage], options: &CallOptions) -> Result<StreamResult> {
        let prepared = self.prepare(prompt, options)?;
        let model = self.model().await?;

        let round = RoundState::new(options.abort_signal.as_ref());
        let mut act_options = prepared.options.clone();
        act_options.signal = Some(round.signal());
        let request = prepared.request_metadata();

        let (tx, rx) = mpsc::unbounded_channel();
        let model_id = self.model_id.clone();
        let PreparedCall {
            chat,
            tools,
            warnings,
            ..
        } = prepared;

        tokio::spawn(async move {
            debug!(model_id = %model_id, state = "running", "starting streamed act");
            let mut synthesizer = StreamSynthesizer::new(round, tx);
            let outcome = model.act(chat, tools, act_options, &mut synthesizer).await;
            synthesizer.finish(outcome);
        });

        Ok(StreamResult {
            stream: Box::pin(UnboundedReceiverStream::new(rx)),
            warnings,
            request,
        })
    }
}
