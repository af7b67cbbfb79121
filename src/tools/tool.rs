//! Executable tool trait.
//!
//! These are tools the engine itself can run between rounds. The bridge
//! never produces them: tools declared through the generic contract are
//! forwarded as schema-only [`RawFunctionDeclaration`]s.
//!
//! [`RawFunctionDeclaration`]: crate::engine::RawFunctionDeclaration

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::types::ToolParameters;
use crate::error::BridgeError;

/// Core tool trait; implement to give the engine a tool with a body.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema parameters.
    fn parameters(&self) -> &ToolParameters;

    /// Execute the tool with the model-supplied arguments.
    async fn execute(&self, args: &Map<String, Value>) -> Result<Value, BridgeError>;
}
