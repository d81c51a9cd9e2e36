use serde::{Deserialize, Serialize};

/// Events not tied to a version check or a download
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    /// Something degraded, but the operation carried on
    Warning {
        message: String,
        context: Option<String>,
    },

    /// Diagnostic detail
    DebugLog { message: String },
}

impl GeneralEvent {
    #[must_use]
    pub fn warning(message: impl Into<String>, context: Option<String>) -> Self {
        Self::Warning {
            message: message.into(),
            context,
        }
    }

    #[must_use]
    pub fn debug(message: impl Into<String>) -> Self {
        Self::DebugLog {
            message: message.into(),
        }
    }
}
