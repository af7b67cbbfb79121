//! Shared test helpers and a scripted engine.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use lmstudio_bridge::engine::{
    AbortController, AbortReason, ActObserver, ActOptions, ChatMessage, ChatMessageData,
    ChatMessagePart, Engine, EngineError, EngineRole, EngineTool, FunctionToolCallRequest,
    LoadedModel, ModelInfo, PredictionFragment, PredictionResult, PredictionStats, ReasoningType,
    StopReason,
};

/// What the scripted model does during one `act` call.
#[derive(Debug, Clone)]
pub struct Script {
    pub fragments: Vec<PredictionFragment>,
    pub messages: Vec<ChatMessageData>,
    pub stop_reason: StopReason,
    /// Report a completed prediction.
    pub complete: bool,
    /// Fire `on_round_end` after the messages.
    pub end_round: bool,
    /// Reject with this error right after the fragments.
    pub fail_with: Option<EngineError>,
    /// Fire the caller's controller just before this fragment index.
    pub caller_abort: Option<CallerAbort>,
}

/// A caller-side abort that lands while the model is still producing output.
#[derive(Debug, Clone)]
pub struct CallerAbort {
    pub before_fragment: usize,
    pub controller: Arc<AbortController>,
    pub reason: AbortReason,
}

impl Script {
    /// A plain answer made of text fragments.
    pub fn text(chunks: &[&str]) -> Self {
        let fragments: Vec<PredictionFragment> =
            chunks.iter().map(|chunk| PredictionFragment::text(*chunk)).collect();
        let answer: String = chunks.concat();
        Self {
            fragments,
            messages: vec![ChatMessageData::new(
                EngineRole::Assistant,
                vec![ChatMessagePart::text(answer)],
            )],
            stop_reason: StopReason::EosFound,
            complete: true,
            end_round: true,
            fail_with: None,
            caller_abort: None,
        }
    }

    /// The model requests one tool call and the round ends.
    pub fn tool_call(id: Option<&str>, name: &str, args: Value) -> Self {
        Self {
            fragments: Vec::new(),
            messages: vec![assistant_tool_call(id, name, args)],
            stop_reason: StopReason::ToolCalls,
            complete: true,
            end_round: true,
            fail_with: None,
            caller_abort: None,
        }
    }

    pub fn with_fragments(mut self, fragments: Vec<PredictionFragment>) -> Self {
        self.fragments = fragments;
        self
    }

    pub fn with_stop_reason(mut self, stop_reason: StopReason) -> Self {
        self.stop_reason = stop_reason;
        self
    }

    pub fn without_completion(mut self) -> Self {
        self.complete = false;
        self
    }

    pub fn failing_with(mut self, err: EngineError) -> Self {
        self.fail_with = Some(err);
        self
    }

    pub fn aborting_caller(
        mut self,
        before_fragment: usize,
        controller: Arc<AbortController>,
        reason: AbortReason,
    ) -> Self {
        self.caller_abort = Some(CallerAbort {
            before_fragment,
            controller,
            reason,
        });
        self
    }
}

pub fn assistant_tool_call(id: Option<&str>, name: &str, args: Value) -> ChatMessageData {
    ChatMessageData::new(
        EngineRole::Assistant,
        vec![ChatMessagePart::ToolCallRequest {
            tool_call_request: FunctionToolCallRequest::new(
                id.map(str::to_string),
                name,
                args.as_object().cloned().unwrap_or_default(),
            ),
        }],
    )
}

/// One observed `act` invocation.
#[derive(Debug, Clone)]
pub struct ActCall {
    pub chat: Vec<ChatMessageData>,
    pub tool_names: Vec<String>,
    pub options: ActOptions,
}

/// A loaded model that replays a [`Script`], checking its abort signal like a real engine.
pub struct ScriptedModel {
    identifier: String,
    script: Script,
    calls: Mutex<Vec<ActCall>>,
}

impl ScriptedModel {
    fn completion(&self) -> PredictionResult {
        let collect = |kind: ReasoningType| -> String {
            self.script
                .fragments
                .iter()
                .filter(|fragment| fragment.reasoning_type == kind)
                .map(|fragment| fragment.content.as_str())
                .collect()
        };
        let reasoning = collect(ReasoningType::Reasoning);
        let text = collect(ReasoningType::None);

        let mut stats = PredictionStats::new(self.script.stop_reason);
        stats.prompt_tokens_count = Some(12);
        stats.predicted_tokens_count = Some(self.script.fragments.len() as u32);

        PredictionResult {
            content: self
                .script
                .fragments
                .iter()
                .map(|fragment| fragment.content.as_str())
                .collect(),
            reasoning_content: (!reasoning.is_empty()).then_some(reasoning),
            non_reasoning_content: Some(text),
            stats,
            model_info: ModelInfo {
                identifier: self.identifier.clone(),
                model_key: None,
            },
            round_index: 0,
        }
    }

    pub fn calls(&self) -> Vec<ActCall> {
        self.calls.lock().unwrap().clone()
    }
}

fn aborted(options: &ActOptions) -> Option<EngineError> {
    let signal = options.signal.as_ref()?;
    signal.is_aborted().then(|| {
        EngineError::aborted(signal.reason().unwrap_or(AbortReason::caller(None)))
    })
}

#[async_trait]
impl LoadedModel for ScriptedModel {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    async fn act(
        &self,
        chat: Vec<ChatMessageData>,
        tools: Vec<EngineTool>,
        options: ActOptions,
        observer: &mut (dyn ActObserver + Send),
    ) -> Result<(), EngineError> {
        self.calls.lock().unwrap().push(ActCall {
            chat,
            tool_names: tools.iter().map(|tool| tool.name().to_string()).collect(),
            options: options.clone(),
        });

        observer.on_round_start(0);
        for (index, fragment) in self.script.fragments.iter().enumerate() {
            if let Some(abort) = &self.script.caller_abort {
                if abort.before_fragment == index {
                    abort.controller.abort(abort.reason.clone());
                }
            }
            if let Some(err) = aborted(&options) {
                return Err(err);
            }
            observer.on_prediction_fragment(fragment);
            tokio::task::yield_now().await;
        }

        if let Some(err) = &self.script.fail_with {
            observer.on_failure(err);
            return Err(err.clone());
        }

        if self.script.complete {
            observer.on_prediction_completed(&self.completion());
        }
        for message in &self.script.messages {
            observer.on_message(&ChatMessage::new(message.clone()));
        }
        if self.script.end_round {
            observer.on_round_end(0);
        }

        // The loop would start another round here; the signal stops it.
        match aborted(&options) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Engine serving a single scripted model.
pub struct ScriptedEngine {
    model: Arc<ScriptedModel>,
    load_error: Option<EngineError>,
    loads: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new(model_id: &str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            model: Arc::new(ScriptedModel {
                identifier: model_id.to_string(),
                script,
                calls: Mutex::new(Vec::new()),
            }),
            load_error: None,
            loads: AtomicUsize::new(0),
        })
    }

    pub fn failing_load(err: EngineError) -> Arc<Self> {
        Arc::new(Self {
            model: Arc::new(ScriptedModel {
                identifier: String::new(),
                script: Script::text(&[]),
                calls: Mutex::new(Vec::new()),
            }),
            load_error: Some(err),
            loads: AtomicUsize::new(0),
        })
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<ActCall> {
        self.model.calls()
    }
}

#[async_trait]
impl Engine for ScriptedEngine {
    async fn load(&self, _model_id: &str) -> Result<Arc<dyn LoadedModel>, EngineError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &self.load_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.model.clone() as Arc<dyn LoadedModel>),
        }
    }
}
