#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Update checks and artifact downloads for updatekit
//!
//! [`UpdateClient`] asks the configured update server for the version it
//! publishes in `version.txt`, compares it with the installed build and
//! downloads the matching artifact into the downloads directory.
//!
//! Results never arrive through callbacks run on an I/O task. A check is
//! an awaited future, and a download reports through the [`DownloadHandle`]
//! the caller polls, so both are observed on the caller's own task. With
//! [`UpdateClient::with_events`] the same activity is also published as
//! `AppEvent`s.

mod client;
mod handle;
mod provider;

pub use client::{UpdateClient, VERSION_FILE};
pub use handle::{DownloadHandle, DownloadUpdate};
pub use provider::{StaticVersion, VersionProvider};
pub use updatekit_types::UpdateStatus;
