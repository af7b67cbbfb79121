//! Per-invocation state of one `act` run and the round-boundary protocol.
//!
//! The engine keeps looping as long as the model asks for tools. The bridge
//! wants exactly one round, so it fires its own abort signal at the first
//! round boundary and later recognizes the resulting rejection as success.

use tracing::debug;

use crate::convert::synthesize_tool_call_id;
use crate::engine::{
    AbortController, AbortReason, AbortSignal, ChatMessage, ChatMessageData, ChatMessagePart,
    EngineError, EngineRole, PredictionResult,
};
use crate::error::{BridgeError, Result};

/// Accumulators and cancellation handle owned by a single invocation.
#[derive(Debug)]
pub(crate) struct RoundState {
    abort: AbortController,
    messages: Vec<ChatMessageData>,
    tool_was_called: bool,
    completion: Option<PredictionResult>,
}

/// What a successfully settled run produced.
#[derive(Debug)]
pub(crate) struct SettledRun {
    pub messages: Vec<ChatMessageData>,
    pub tool_was_called: bool,
    pub completion: PredictionResult,
}

impl RoundState {
    /// Fresh state; a caller signal, if any, propagates into this run's handle.
    pub fn new(caller_signal: Option<&AbortSignal>) -> Self {
        let abort = match caller_signal {
            Some(signal) => AbortController::child_of(signal),
            None => AbortController::new(),
        };
        Self {
            abort,
            messages: Vec::new(),
            tool_was_called: false,
            completion: None,
        }
    }

    /// The signal handed to the engine.
    pub fn signal(&self) -> AbortSignal {
        self.abort.signal()
    }

    /// Copy a finished message out of the engine. Returns the stored copy.
    ///
    /// Assistant tool requests without an id get one here, so every view
    /// built from the stored messages agrees on it.
    pub fn record_message(&mut self, message: &ChatMessage) -> &ChatMessageData {
        let mut data = message.data().clone();
        if data.role == EngineRole::Assistant {
            for part in &mut data.content {
                if let ChatMessagePart::ToolCallRequest { tool_call_request } = part {
                    self.tool_was_called = true;
                    tool_call_request.id.get_or_insert_with(synthesize_tool_call_id);
                }
            }
        }
        self.messages.push(data);
        &self.messages[self.messages.len() - 1]
    }

    /// Abort the run on the bridge's own behalf, e.g. once nobody listens.
    pub fn cancel(&mut self, reason: AbortReason) -> bool {
        self.abort.abort(reason)
    }

    /// Stop the engine's loop after the round that just ended.
    pub fn end_round(&mut self, round_index: u32) {
        let fired = self.abort.abort(AbortReason::RoundBoundary);
        debug!(round_index, fired, "round ended, stopping the act loop");
    }

    pub fn complete(&mut self, result: &PredictionResult) {
        self.completion = Some(result.clone());
    }

    /// Classify how `act` ended.
    ///
    /// A rejection caused by this run's own round-boundary abort counts as a
    /// normal completion. Every other failure is returned unchanged.
    pub fn settle(self, outcome: std::result::Result<(), EngineError>) -> Result<SettledRun> {
        match outcome {
            Ok(()) => debug!(state = "completed", "act resolved"),
            Err(EngineError::Aborted(_))
                if self.abort.reason() == Some(AbortReason::RoundBoundary) =>
            {
                debug!(state = "aborted-intentionally", "act stopped at round boundary");
            }
            Err(err) => {
                debug!(state = "failed", error = %err, "act failed");
                return Err(err.into());
            }
        }

        let completion = self.completion.ok_or(BridgeError::NoContentGenerated)?;
        Ok(SettledRun {
            messages: self.messages,
            tool_was_called: self.tool_was_called,
            completion,
        })
    }
}
