//! Source of the installed application version

use updatekit_errors::Error;

/// Reports the version of the build currently installed
///
/// The host usually answers from its package metadata. Failures are not
/// fatal to an update check: the client falls back to
/// [`UNKNOWN_VERSION`](updatekit_types::UNKNOWN_VERSION).
pub trait VersionProvider: Send + Sync + 'static {
    /// Version string of the installed build
    ///
    /// # Errors
    ///
    /// Returns an error if the installed version cannot be determined.
    fn installed_version(&self) -> Result<String, Error>;
}

/// A fixed installed version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticVersion(String);

impl StaticVersion {
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }
}

impl VersionProvider for StaticVersion {
    fn installed_version(&self) -> Result<String, Error> {
        Ok(self.0.clone())
    }
}

impl<F> VersionProvider for F
where
    F: Fn() -> Result<String, Error> + Send + Sync + 'static,
{
    fn installed_version(&self) -> Result<String, Error> {
        self()
    }
}
