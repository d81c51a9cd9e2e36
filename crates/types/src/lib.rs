#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for updatekit
//!
//! This crate provides the version model used to decide whether a build
//! published on the update server is newer than the installed one, and
//! the status type reported by an update check.

pub mod version;

pub use version::{
    extract_main_version, is_newer_version, is_valid_version_format, parse_version_part,
    AppVersion, TEST_MARKER,
};

use serde::{Deserialize, Serialize};

/// Sentinel reported when the installed version cannot be determined
pub const UNKNOWN_VERSION: &str = "unknown";

/// Outcome of a successful update check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateStatus {
    /// The server publishes a newer build
    Available { current: String, latest: String },
    /// The installed build is current (or newer than the published one)
    UpToDate { current: String, latest: String },
}

impl UpdateStatus {
    /// Whether a newer build is available
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Version text published by the server
    #[must_use]
    pub fn latest(&self) -> &str {
        match self {
            Self::Available { latest, .. } | Self::UpToDate { latest, .. } => latest,
        }
    }

    /// Installed version the check compared against
    #[must_use]
    pub fn current(&self) -> &str {
        match self {
            Self::Available { current, .. } | Self::UpToDate { current, .. } => current,
        }
    }
}
