use serde::{Deserialize, Serialize};

/// Update check events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UpdateEvent {
    /// Version check request sent
    CheckStarted { url: String },

    /// Server publishes a newer build
    Available { current: String, latest: String },

    /// Installed build is current
    UpToDate { current: String, latest: String },

    /// Version check failed
    CheckFailed { failure: super::FailureContext },
}
