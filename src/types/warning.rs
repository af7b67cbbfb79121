//! Non-fatal call warnings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Something the bridge could not honor exactly.
///
/// Warnings are returned next to every result and never raised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CallWarning {
    /// A call setting the engine has no counterpart for.
    UnsupportedSetting {
        setting: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    /// A declared tool that was not forwarded.
    #[serde(rename_all = "camelCase")]
    UnsupportedTool {
        tool_name: Option<String>,
        details: String,
    },
    /// A content part that was skipped during conversion.
    #[serde(rename_all = "camelCase")]
    UnsupportedContent { content_type: String },
    /// Anything else, e.g. a tool-choice policy the engine cannot honor.
    Other { message: String },
}

impl CallWarning {
    pub fn unsupported_content(content_type: impl Into<String>) -> Self {
        Self::UnsupportedContent {
            content_type: content_type.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub fn unsupported_setting(setting: impl Into<String>, details: Option<String>) -> Self {
        Self::UnsupportedSetting {
            setting: setting.into(),
            details,
        }
    }
}

impl fmt::Display for CallWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSetting { setting, details } => {
                write!(f, "Unsupported setting: {setting}")?;
                if let Some(details) = details {
                    write!(f, " ({details})")?;
                }
                Ok(())
            }
            Self::UnsupportedTool { details, .. } => write!(f, "Unsupported tool: {details}"),
            Self::UnsupportedContent { content_type } => {
                write!(f, "Unsupported content type: {content_type}")
            }
            Self::Other { message } => f.write_str(message),
        }
    }
}
