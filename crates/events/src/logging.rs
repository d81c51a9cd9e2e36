//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields, so a
//! host that installs a `tracing` subscriber gets update activity in its logs
//! by draining the event channel through [`log_event_with_tracing`].

use crate::{AppEvent, DownloadEvent, GeneralEvent, UpdateEvent};
use tracing::{debug, error, info, warn};

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::Warning { message, context } => {
                warn!(target: "updatekit::events::general", context = ?context, "{message}");
            }
            GeneralEvent::DebugLog { message } => {
                debug!(target: "updatekit::events::general", "{message}");
            }
        },

        AppEvent::Update(update) => match update {
            UpdateEvent::CheckStarted { url } => {
                debug!(target: "updatekit::events::update", url = %url, "Checking for updates");
            }
            UpdateEvent::Available { current, latest } => {
                info!(
                    target: "updatekit::events::update",
                    current = %current,
                    latest = %latest,
                    "Update available"
                );
            }
            UpdateEvent::UpToDate { current, latest } => {
                info!(
                    target: "updatekit::events::update",
                    current = %current,
                    latest = %latest,
                    "Already up to date"
                );
            }
            UpdateEvent::CheckFailed { failure } => {
                error!(
                    target: "updatekit::events::update",
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Update check failed"
                );
            }
        },

        AppEvent::Download(download) => match download {
            DownloadEvent::Started {
                url,
                version,
                total_size,
            } => {
                info!(
                    target: "updatekit::events::download",
                    url = %url,
                    version = %version,
                    total_size = ?total_size,
                    "Download started"
                );
            }
            DownloadEvent::Progress { version, percent } => {
                debug!(
                    target: "updatekit::events::download",
                    version = %version,
                    percent = percent,
                    "Download progress"
                );
            }
            DownloadEvent::Completed {
                version,
                path,
                size,
            } => {
                info!(
                    target: "updatekit::events::download",
                    version = %version,
                    path = %path.display(),
                    size = size,
                    "Download completed"
                );
            }
            DownloadEvent::Cancelled { version } => {
                warn!(target: "updatekit::events::download", version = %version, "Download cancelled");
            }
            DownloadEvent::Failed { version, failure } => {
                error!(
                    target: "updatekit::events::download",
                    version = %version,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Download failed"
                );
            }
        },
    }
}
