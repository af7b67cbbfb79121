//! Error classification.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Broad error category for routing handling logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    Configuration,
    InvalidArguments,
    Model,
    NoContent,
    Aborted,
    Engine,
    Serialization,
}
