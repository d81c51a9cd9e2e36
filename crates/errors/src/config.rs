//! Configuration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("update server address is not configured")]
    UpdateServerNotConfigured,

    #[error("downloads directory could not be determined")]
    DownloadDirUnavailable,
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Provide a configuration file or rely on the defaults."),
            Self::InvalidValue { .. } | Self::ParseError { .. } => {
                Some("Fix the configuration value and retry.")
            }
            Self::UpdateServerNotConfigured => Some(
                "Set `update.server_url` in the configuration file or export UPDATEKIT_SERVER_URL.",
            ),
            Self::DownloadDirUnavailable => Some(
                "Set `paths.download_dir` in the configuration file or export UPDATEKIT_DOWNLOAD_DIR.",
            ),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "config.not_found",
            Self::ParseError { .. } => "config.parse_error",
            Self::InvalidValue { .. } => "config.invalid_value",
            Self::UpdateServerNotConfigured => "config.update_server_not_configured",
            Self::DownloadDirUnavailable => "config.download_dir_unavailable",
        };
        Some(code)
    }
}
