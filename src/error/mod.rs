//! Error types for the bridge.

pub mod unified;

pub use unified::ErrorCategory;

use thiserror::Error;

use crate::engine::EngineError;

/// Primary error type for all bridge operations.
///
/// Unsupported content, tools, settings and tool-choice policies are never
/// errors; they travel as [`CallWarning`](crate::types::CallWarning)s next to
/// a successful result.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The provider-specific options block failed validation.
    #[error("Invalid provider options at `{path}`: {message}")]
    Configuration { path: String, message: String },

    /// An assistant tool call carried arguments that are not a string-keyed map.
    #[error("Invalid arguments for tool `{tool_name}`: {reason} (got {args})")]
    InvalidToolArguments {
        tool_name: String,
        args: String,
        reason: String,
    },

    #[error("No such model `{model_id}`: {message}")]
    NoSuchModel { model_id: String, message: String },

    #[error("Failed to load model `{model_id}`: {message}")]
    ModelLoad { model_id: String, message: String },

    /// The engine run ended without ever reporting a completed prediction.
    #[error("No content generated")]
    NoContentGenerated,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// Create a configuration error for the given field path.
    pub fn configuration(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::InvalidToolArguments { .. } => ErrorCategory::InvalidArguments,
            Self::NoSuchModel { .. } | Self::ModelLoad { .. } => ErrorCategory::Model,
            Self::NoContentGenerated => ErrorCategory::NoContent,
            Self::Engine(EngineError::Aborted(_)) => ErrorCategory::Aborted,
            Self::Engine(_) => ErrorCategory::Engine,
            Self::Serialization(_) => ErrorCategory::Serialization,
        }
    }

    /// Whether the error was raised before the engine was ever invoked.
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Configuration | ErrorCategory::InvalidArguments
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BridgeError>;
