#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for updatekit
//!
//! This crate handles all HTTP operations: fetching the version marker
//! published by the update server and streaming artifacts to disk with
//! progress reporting and cancellation.

mod client;
mod download;

pub use client::{NetClient, NetConfig};
pub use download::{
    join_url, stream_to_file, validate_file_name, validate_response, validate_url,
    DownloadOutcome, PercentTracker, CHUNK_SIZE,
};

use updatekit_errors::{Error, NetworkError};
use updatekit_events::{EventEmitter, EventSender};

/// Fetch text content from a URL
///
/// # Errors
///
/// Returns an error if the HTTP request fails, the server returns an error status,
/// the body is empty, or the response body cannot be decoded as text.
pub async fn fetch_text(
    client: &NetClient,
    url: &str,
    tx: Option<&EventSender>,
) -> Result<String, Error> {
    if let Some(tx) = tx {
        tx.emit_debug(format!("Fetching text from {url}"));
    }

    let response = client.get(url).await?;

    if !response.status().is_success() {
        return Err(NetworkError::HttpError {
            status: response.status().as_u16(),
            message: response.status().to_string(),
        }
        .into());
    }

    let text = response
        .text()
        .await
        .map_err(|e| Error::from(NetworkError::RequestFailed(e.to_string())))?;

    if text.is_empty() {
        return Err(NetworkError::EmptyResponse {
            url: url.to_string(),
        }
        .into());
    }

    Ok(text)
}
