//! Conversions between the generic contract and the engine's shapes.

pub mod content;
pub mod finish_reason;
pub mod messages;
pub mod tools;

pub use content::{from_engine, synthesize_tool_call_id, tool_call_from_request, tool_calls};
pub use finish_reason::{map_finish_reason, resolve_finish_reason};
pub use messages::to_engine;
pub use tools::prepare_tools;
