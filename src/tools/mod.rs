//! Tools the engine can execute itself, and parameter schema helpers.

pub mod tool;
pub mod types;

pub use tool::Tool;
pub use types::{ParameterBuilder, ToolParameters};
