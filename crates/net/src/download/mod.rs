//! Streaming artifact downloads
//!
//! The body is written to disk in small chunks while whole-percent progress
//! is reported, and the transfer can be cancelled between chunks.

mod progress;
mod stream;
mod validation;

pub use progress::PercentTracker;
pub use stream::{stream_to_file, DownloadOutcome, CHUNK_SIZE};
pub use validation::{join_url, validate_file_name, validate_response, validate_url};
