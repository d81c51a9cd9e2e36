//! Version string error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum VersionError {
    #[error("invalid version format: {input}")]
    InvalidFormat { input: String },

    #[error("installed version unavailable: {message}")]
    InstalledUnavailable { message: String },
}

impl UserFacingError for VersionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidFormat { .. } => {
                Some("The update server must publish a version like 1.2.3 or 1.2.3-test-02031200.")
            }
            Self::InstalledUnavailable { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidFormat { .. } => "version.invalid_format",
            Self::InstalledUnavailable { .. } => "version.installed_unavailable",
        };
        Some(code)
    }
}
