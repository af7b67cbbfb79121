//! Tool declarations handed to `act`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tools::Tool;

/// Declaration of a function the engine may ask for but cannot run itself.
///
/// The engine reports the call through its message callbacks and the
/// round ends; no body is ever invoked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawFunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters_json_schema: serde_json::Value,
}

/// A tool as the engine sees it.
#[derive(Clone)]
pub enum EngineTool {
    /// Schema only.
    RawFunction(RawFunctionDeclaration),
    /// A tool with an executable body the engine runs between rounds.
    Function(Arc<dyn Tool>),
}

impl EngineTool {
    pub fn name(&self) -> &str {
        match self {
            Self::RawFunction(declaration) => &declaration.name,
            Self::Function(tool) => tool.name(),
        }
    }

    pub fn is_executable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    pub fn as_raw_function(&self) -> Option<&RawFunctionDeclaration> {
        match self {
            Self::RawFunction(declaration) => Some(declaration),
            Self::Function(_) => None,
        }
    }
}

impl fmt::Debug for EngineTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RawFunction(declaration) => {
                f.debug_tuple("RawFunction").field(declaration).finish()
            }
            Self::Function(tool) => f.debug_tuple("Function").field(&tool.name()).finish(),
        }
    }
}
