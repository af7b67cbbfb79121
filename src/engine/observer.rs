//! Callbacks the engine drives during `act`.

use super::chat::ChatMessage;
use super::prediction::{PredictionFragment, PredictionResult};
use super::EngineError;

/// Receiver of engine callbacks for one `act` run.
///
/// The engine calls these strictly in order, one at a time, and never from
/// two threads at once. Implementations must not block.
pub trait ActObserver {
    /// A token-level (or segment-level) piece of output arrived.
    fn on_prediction_fragment(&mut self, _fragment: &PredictionFragment) {}

    /// A complete message (assistant output or tool result) is available.
    fn on_message(&mut self, _message: &ChatMessage) {}

    fn on_round_start(&mut self, _round_index: u32) {}

    /// A round of the tool loop finished.
    fn on_round_end(&mut self, _round_index: u32) {}

    /// The engine finished a prediction and reports its aggregate.
    fn on_prediction_completed(&mut self, _result: &PredictionResult) {}

    /// The run is about to reject with `error`.
    fn on_failure(&mut self, _error: &EngineError) {}
}
