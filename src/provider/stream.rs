//! Turns engine callbacks into the ordered stream of [`StreamEvent`]s.

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use super::round::RoundState;
use crate::convert::{from_engine, resolve_finish_reason};
use crate::engine::{
    AbortReason, ActObserver, ChatMessage, EngineError, PredictionFragment, PredictionResult,
    ReasoningType,
};
use crate::error::{BridgeError, Result};
use crate::types::{GeneratedContent, StreamEvent, Usage};

pub(crate) type EventSender = mpsc::UnboundedSender<Result<StreamEvent>>;

/// Open/closed state of one span kind. The id is fixed for the whole run.
#[derive(Debug)]
struct Span {
    id: String,
    open: bool,
}

impl Span {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            open: false,
        }
    }
}

/// Emits events and tracks span state. Holds no content.
struct EventWriter {
    tx: EventSender,
    text: Span,
    reasoning: Span,
    finished: bool,
}

impl EventWriter {
    fn emit(&mut self, event: StreamEvent) {
        if self.finished {
            return;
        }
        if self.tx.send(Ok(event)).is_err() {
            debug!("stream receiver dropped");
        }
    }

    fn open_text(&mut self) {
        if !self.text.open {
            self.text.open = true;
            let id = self.text.id.clone();
            self.emit(StreamEvent::TextStart { id });
        }
    }

    fn close_text(&mut self) {
        if self.text.open {
            self.text.open = false;
            let id = self.text.id.clone();
            self.emit(StreamEvent::TextEnd { id });
        }
    }

    fn open_reasoning(&mut self) {
        if !self.reasoning.open {
            self.reasoning.open = true;
            let id = self.reasoning.id.clone();
            self.emit(StreamEvent::ReasoningStart { id });
        }
    }

    fn close_reasoning(&mut self) {
        if self.reasoning.open {
            self.reasoning.open = false;
            let id = self.reasoning.id.clone();
            self.emit(StreamEvent::ReasoningEnd { id });
        }
    }

    fn text_delta(&mut self, delta: &str) {
        self.open_text();
        let id = self.text.id.clone();
        self.emit(StreamEvent::TextDelta {
            id,
            delta: delta.to_string(),
        });
    }

    fn reasoning_delta(&mut self, delta: &str) {
        self.open_reasoning();
        let id = self.reasoning.id.clone();
        self.emit(StreamEvent::ReasoningDelta {
            id,
            delta: delta.to_string(),
        });
    }

    /// Close open spans, then emit `finish`. Nothing goes out afterwards.
    fn finish(&mut self, finish: StreamEvent) {
        self.close_reasoning();
        self.close_text();
        self.emit(finish);
        self.finished = true;
    }

    fn fail(&mut self, err: BridgeError) {
        if !self.finished && self.tx.send(Err(err)).is_err() {
            debug!("stream receiver dropped before the error");
        }
        self.finished = true;
    }
}

/// Straight-through forwarder from engine callbacks to stream events.
pub(crate) struct StreamSynthesizer {
    round: RoundState,
    events: EventWriter,
}

impl StreamSynthesizer {
    pub fn new(round: RoundState, tx: EventSender) -> Self {
        Self {
            round,
            events: EventWriter {
                tx,
                text: Span::new(),
                reasoning: Span::new(),
                finished: false,
            },
        }
    }

    /// Emit the terminal item for a settled `act` run.
    ///
    /// On success exactly one `finish` goes out. On failure the error is the
    /// last item and open spans stay unterminated.
    pub fn finish(self, outcome: std::result::Result<(), EngineError>) {
        let Self { round, mut events } = self;
        match round.settle(outcome) {
            Ok(settled) => {
                let finish_reason = resolve_finish_reason(
                    settled.completion.stats.stop_reason,
                    settled.tool_was_called,
                );
                events.finish(StreamEvent::Finish {
                    finish_reason,
                    usage: Usage::from(&settled.completion.stats),
                });
            }
            Err(err) => events.fail(err),
        }
    }
}

impl StreamSynthesizer {
    /// Stop the run once the consumer dropped the stream.
    fn stop_if_unobserved(&mut self) {
        if self.events.tx.is_closed()
            && self
                .round
                .cancel(AbortReason::caller(Some("stream dropped".into())))
        {
            debug!("stream receiver dropped, aborting act");
        }
    }
}

impl ActObserver for StreamSynthesizer {
    fn on_prediction_fragment(&mut self, fragment: &PredictionFragment) {
        self.stop_if_unobserved();
        match fragment.reasoning_type {
            ReasoningType::ReasoningStartTag => self.events.open_reasoning(),
            ReasoningType::ReasoningEndTag => self.events.close_reasoning(),
            ReasoningType::Reasoning => self.events.reasoning_delta(&fragment.content),
            ReasoningType::None if fragment.content.is_empty() => {}
            ReasoningType::None => self.events.text_delta(&fragment.content),
        }
    }

    fn on_message(&mut self, message: &ChatMessage) {
        self.stop_if_unobserved();
        let data = self.round.record_message(message);
        let (content, _) = from_engine(std::slice::from_ref(data));
        for item in content {
            if let GeneratedContent::ToolCall(call) = item {
                self.events.emit(StreamEvent::ToolCall(call));
            }
        }
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
