//! Caller-side view of a running download

use std::path::PathBuf;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use updatekit_errors::Error;

/// One step of a download as seen by the caller
#[derive(Debug, Clone)]
pub enum DownloadUpdate {
    /// Whole percent received, strictly increasing, never 0
    Progress(u8),
    /// The artifact was written to this path
    Complete(PathBuf),
    /// The download ended without an artifact
    Failed(Error),
}

impl DownloadUpdate {
    /// Whether no further updates follow this one
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

/// Handle to a download running on a background task
///
/// Updates are delivered in order on the task that polls [`next`](Self::next).
/// Exactly one terminal update (`Complete` or `Failed`) ends the stream.
/// Dropping the handle does not stop the download.
#[derive(Debug)]
pub struct DownloadHandle {
    updates: UnboundedReceiver<DownloadUpdate>,
    cancel: CancellationToken,
}

impl DownloadHandle {
    pub(crate) fn new(cancel: CancellationToken) -> (Self, UnboundedSender<DownloadUpdate>) {
        let (tx, updates) = tokio::sync::mpsc::unbounded_channel();
        (Self { updates, cancel }, tx)
    }

    /// Wait for the next update; `None` once the terminal update was taken
    pub async fn next(&mut self) -> Option<DownloadUpdate> {
        self.updates.recv().await
    }

    /// Request cancellation; the stream then ends with `Failed(Cancelled)`
    /// unless the download already finished
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this download, for use from other tasks
    #[must_use]
    pub fn canceller(&self) -> CancellationToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drain the stream and return the downloaded file's path
    ///
    /// # Errors
    ///
    /// Returns the error carried by `Failed`, including
    /// [`Error::Cancelled`] when the download was cancelled.
    pub async fn finish(mut self) -> Result<PathBuf, Error> {
        while let Some(update) = self.next().await {
            match update {
                DownloadUpdate::Progress(_) => {}
                DownloadUpdate::Complete(path) => return Ok(path),
                DownloadUpdate::Failed(error) => return Err(error),
            }
        }
        Err(Error::internal("download task ended without a result"))
    }
}
