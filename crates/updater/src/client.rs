//! Update client: version checks and artifact downloads

use crate::handle::{DownloadHandle, DownloadUpdate};
use crate::provider::VersionProvider;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use updatekit_config::{Config, SharedConfig};
use updatekit_errors::{ConfigError, Error, VersionError};
use updatekit_events::{
    AppEvent, DownloadEvent, EventEmitter, EventSender, FailureContext, UpdateEvent,
};
use updatekit_net::{
    fetch_text, join_url, stream_to_file, validate_file_name, validate_response, DownloadOutcome,
    NetClient, NetConfig,
};
use updatekit_types::{is_newer_version, is_valid_version_format, UpdateStatus, UNKNOWN_VERSION};

/// File on the update server holding the latest published version
pub const VERSION_FILE: &str = "version.txt";

/// The download `cancel_download` acts on
#[derive(Debug)]
struct ActiveDownload {
    id: u64,
    cancel: CancellationToken,
}

/// Checks an update server for newer builds and downloads them
///
/// The server address, artifact names and timeouts are read from the shared
/// configuration on every call. Clones share the tracked current download.
#[derive(Clone)]
pub struct UpdateClient {
    config: SharedConfig,
    provider: Arc<dyn VersionProvider>,
    tx: Option<EventSender>,
    current: Arc<Mutex<Option<ActiveDownload>>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for UpdateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateClient")
            .field("events", &self.tx.is_some())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl EventEmitter for UpdateClient {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl UpdateClient {
    #[must_use]
    pub fn new(config: SharedConfig, provider: impl VersionProvider) -> Self {
        Self {
            config,
            provider: Arc::new(provider),
            tx: None,
            current: Arc::new(Mutex::new(None)),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Also report activity as [`AppEvent`]s on `tx`
    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Whether an update server address is currently configured
    pub async fn is_update_server_configured(&self) -> bool {
        self.config.read().await.update.is_configured()
    }

    /// Installed version, or `"unknown"` if the provider cannot tell
    #[must_use]
    pub fn current_version(&self) -> String {
        match self.provider.installed_version() {
            Ok(version) => version,
            Err(e) => {
                let error = VersionError::InstalledUnavailable {
                    message: e.to_string(),
                };
                tracing::warn!(error = %error, "falling back to {UNKNOWN_VERSION}");
                self.emit_warning(
                    error.to_string(),
                    Some(format!("comparing as {UNKNOWN_VERSION}")),
                );
                UNKNOWN_VERSION.to_string()
            }
        }
    }

    /// Ask the update server for its latest version and compare it with
    /// the installed one
    ///
    /// # Errors
    ///
    /// Returns `UpdateServerNotConfigured` without touching the network when
    /// no server is set, a network error if the version file cannot be
    /// fetched, or `InvalidFormat` if it does not hold a version.
    pub async fn check_update(&self) -> Result<UpdateStatus, Error> {
        let config = self.snapshot().await;
        let result = self.check_update_with(&config).await;

        match &result {
            Ok(UpdateStatus::Available { current, latest }) => {
                self.emit(AppEvent::Update(UpdateEvent::Available {
                    current: current.clone(),
                    latest: latest.clone(),
                }));
            }
            Ok(UpdateStatus::UpToDate { current, latest }) => {
                self.emit(AppEvent::Update(UpdateEvent::UpToDate {
                    current: current.clone(),
                    latest: latest.clone(),
                }));
            }
            Err(e) => {
                self.emit(AppEvent::Update(UpdateEvent::CheckFailed {
                    failure: FailureContext::from_error(e),
                }));
            }
        }

        result
    }

    async fn check_update_with(&self, config: &Config) -> Result<UpdateStatus, Error> {
        let base = config
            .update
            .base_url()
            .ok_or(ConfigError::UpdateServerNotConfigured)?;
        let url = join_url(&base, VERSION_FILE)?.to_string();

        self.emit(AppEvent::Update(UpdateEvent::CheckStarted { url: url.clone() }));
        let net = NetClient::new(&NetConfig::from(&config.network))?;
        let text = fetch_text(&net, &url, self.tx.as_ref()).await?;

        let latest = text.trim();
        if !is_valid_version_format(latest) {
            return Err(VersionError::InvalidFormat {
                input: latest.to_string(),
            }
            .into());
        }

        let current = self.current_version();
        let latest = latest.to_string();
        tracing::debug!(%current, %latest, "comparing versions");

        if is_newer_version(&latest, &current) {
            Ok(UpdateStatus::Available { current, latest })
        } else {
            Ok(UpdateStatus::UpToDate { current, latest })
        }
    }

    /// Start downloading the artifact published for `version`
    ///
    /// The transfer runs on a task spawned onto the current Tokio runtime.
    /// Outside a runtime the handle fails at once with an internal error.
    /// The new download becomes the one
    /// [`cancel_download`](Self::cancel_download) acts on.
    #[must_use]
    pub fn download_artifact(&self, version: impl Into<String>) -> DownloadHandle {
        let version = version.into();
        let cancel = CancellationToken::new();
        let (handle, updates) = DownloadHandle::new(cancel.clone());

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            let _ = updates.send(DownloadUpdate::Failed(Error::internal(
                "download_artifact called outside a Tokio runtime",
            )));
            return handle;
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *self.lock_current() = Some(ActiveDownload {
            id,
            cancel: cancel.clone(),
        });

        let client = self.clone();
        runtime.spawn(async move {
            client.run_download(id, &version, &cancel, &updates).await;
        });

        handle
    }

    /// Cancel the most recently started download, if it is still running
    pub fn cancel_download(&self) {
        let current = self.lock_current();
        if let Some(active) = current.as_ref().filter(|a| !a.cancel.is_cancelled()) {
            tracing::debug!(id = active.id, "cancelling current download");
            active.cancel.cancel();
        }
    }

    async fn run_download(
        &self,
        id: u64,
        version: &str,
        cancel: &CancellationToken,
        updates: &UnboundedSender<DownloadUpdate>,
    ) {
        let result = self.download(version, cancel, updates).await;
        self.clear_current(id);

        // The handle may already be gone; the events still report the outcome
        let update = match result {
            Ok(outcome) => {
                self.emit_download_completed(version, outcome.path.clone(), outcome.size);
                DownloadUpdate::Complete(outcome.path)
            }
            Err(e) if e.is_cancelled() => {
                self.emit(AppEvent::Download(DownloadEvent::Cancelled {
                    version: version.to_string(),
                }));
                DownloadUpdate::Failed(e)
            }
            Err(e) => {
                self.emit(AppEvent::Download(DownloadEvent::Failed {
                    version: version.to_string(),
                    failure: FailureContext::from_error(&e),
                }));
                DownloadUpdate::Failed(e)
            }
        };
        let _ = updates.send(update);
    }

    async fn download(
        &self,
        version: &str,
        cancel: &CancellationToken,
        updates: &UnboundedSender<DownloadUpdate>,
    ) -> Result<DownloadOutcome, Error> {
        let config = self.snapshot().await;
        let base = config
            .update
            .base_url()
            .ok_or(ConfigError::UpdateServerNotConfigured)?;
        let url = join_url(&base, &config.update.remote_file_name(version))?.to_string();
        let file_name = config.update.local_file_name(version);
        let dest = config.download_dir()?.join(validate_file_name(&file_name)?);

        let net = NetClient::new(&NetConfig::from(&config.network))?;
        let response = net.get_cancellable(&url, cancel).await?;
        validate_response(&response)?;

        self.emit_download_started(&url, version, response.content_length());
        tracing::debug!(url = %url, dest = %dest.display(), "streaming artifact");

        stream_to_file(response, &dest, cancel, |percent| {
            self.emit_download_progress(version, percent);
            let _ = updates.send(DownloadUpdate::Progress(percent));
        })
        .await
    }

    async fn snapshot(&self) -> Config {
        self.config.read().await.clone()
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<ActiveDownload>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forget download `id` unless a newer download replaced it
    fn clear_current(&self, id: u64) {
        let mut current = self.lock_current();
        if current.as_ref().is_some_and(|active| active.id == id) {
            *current = None;
        }
    }
}
