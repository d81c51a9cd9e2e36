use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Artifact download events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Response received, body about to be streamed
    Started {
        url: String,
        version: String,
        total_size: Option<u64>,
    },

    /// Whole-percent progress change
    Progress { version: String, percent: u8 },

    /// Artifact written to disk
    Completed {
        version: String,
        path: PathBuf,
        size: u64,
    },

    /// Download stopped at the caller's request
    Cancelled { version: String },

    /// Download failed
    Failed {
        version: String,
        failure: super::FailureContext,
    },
}
