#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in updatekit
//!
//! Update checks and downloads report what they are doing through events
//! sent over an unbounded channel. The receiving half belongs to the host,
//! which drains it on whatever task or thread it renders from; nothing in
//! this workspace calls back into host code from an I/O task.

pub mod events;
pub mod logging;

pub use events::{AppEvent, DownloadEvent, FailureContext, GeneralEvent, UpdateEvent};
pub use logging::log_event_with_tracing;

use tokio::sync::mpsc::UnboundedSender;

/// Type alias for event sender using the `AppEvent` system
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver using the `AppEvent` system
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel with the `AppEvent` system
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events
///
/// This trait provides a single, consistent API for emitting events regardless of
/// whether you have a raw `EventSender` or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>, context: Option<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message, context)));
    }

    /// Emit a download started event
    fn emit_download_started(
        &self,
        url: impl Into<String>,
        version: impl Into<String>,
        total_size: Option<u64>,
    ) {
        self.emit(AppEvent::Download(DownloadEvent::Started {
            url: url.into(),
            version: version.into(),
            total_size,
        }));
    }

    /// Emit a download progress event
    fn emit_download_progress(&self, version: impl Into<String>, percent: u8) {
        self.emit(AppEvent::Download(DownloadEvent::Progress {
            version: version.into(),
            percent,
        }));
    }

    /// Emit a download completed event
    fn emit_download_completed(
        &self,
        version: impl Into<String>,
        path: std::path::PathBuf,
        size: u64,
    ) {
        self.emit(AppEvent::Download(DownloadEvent::Completed {
            version: version.into(),
            path,
            size,
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
/// This allows `EventSender` to be used directly where `EventEmitter` is expected
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

/// An absent sender swallows events
impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
