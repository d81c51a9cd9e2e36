//! Low-level streaming download mechanics

use super::progress::PercentTracker;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::{self as tokio_fs, File};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use updatekit_errors::{Error, NetworkError, StorageError};

/// Largest slice written to disk between progress and cancellation checks
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Result of a completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub size: u64,
}

/// RAII guard that removes a partially written file unless disarmed
struct PartialFileGuard {
    path: PathBuf,
    armed: bool,
}

impl PartialFileGuard {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if self.armed {
            // Best-effort cleanup - ignore errors
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Remove a previous download at `dest` and open a fresh file
async fn prepare_destination(dest: &Path) -> Result<File, Error> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio_fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::CreateDirFailed {
                path: parent.display().to_string(),
                message: e.to_string(),
            })?;
    }

    match tokio_fs::remove_file(dest).await {
        Ok(()) => tracing::debug!(path = %dest.display(), "removed previous download"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(StorageError::from_io_with_path(&e, dest).into()),
    }

    File::create(dest)
        .await
        .map_err(|e| StorageError::from_io_with_path(&e, dest).into())
}

/// Stream a response body into `dest`, reporting whole-percent progress
///
/// Any existing file at `dest` is replaced. Progress is only reported when
/// the response announces its length. If the transfer fails or `cancel`
/// fires, the partially written file is removed.
///
/// # Errors
///
/// Returns [`Error::Cancelled`] when cancelled, a network error if the body
/// cannot be read, `EmptyResponse` if the body is empty, or a storage error
/// if the file cannot be written.
pub async fn stream_to_file<F>(
    response: reqwest::Response,
    dest: &Path,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<DownloadOutcome, Error>
where
    F: FnMut(u8),
{
    let url = response.url().to_string();
    let mut tracker = PercentTracker::new(response.content_length());

    let guard = PartialFileGuard::new(dest);
    let mut file = prepare_destination(dest).await?;
    let mut stream = response.bytes_stream();

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Error::Cancelled),
            next = stream.next() => next,
        };

        let chunk = match next {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => return Err(NetworkError::DownloadFailed(e.to_string()).into()),
            None => break,
        };

        for piece in chunk.chunks(CHUNK_SIZE) {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            file.write_all(piece)
                .await
                .map_err(|e| StorageError::from_io_with_path(&e, dest))?;
            if let Some(percent) = tracker.advance(piece.len() as u64) {
                on_progress(percent);
            }
        }
    }

    file.flush()
        .await
        .map_err(|e| StorageError::from_io_with_path(&e, dest))?;
    drop(file);

    if tracker.received() == 0 {
        return Err(NetworkError::EmptyResponse { url }.into());
    }

    guard.disarm();
    Ok(DownloadOutcome {
        path: dest.to_path_buf(),
        size: tracker.received(),
    })
}
