//! HTTP client wrapper
//!
//! Every request is a single attempt; failures are mapped onto
//! [`NetworkError`] and returned to the caller, who decides whether to try
//! again.

use reqwest::{Client, Response};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use updatekit_config::NetworkConfig;
use updatekit_errors::{Error, NetworkError};

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(60),
            user_agent: format!("updatekit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&NetworkConfig> for NetConfig {
    fn from(config: &NetworkConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
            ..Self::default()
        }
    }
}

/// Thin wrapper around a pooled `reqwest` client
#[derive(Clone, Debug)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: &NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ClientInit(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&NetConfig::default())
    }

    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// Returns an error on timeouts, connection failures or other transport
    /// errors. HTTP error statuses are returned as a normal response.
    pub async fn get(&self, url: &str) -> Result<Response, Error> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| map_request_error(&e, url))
    }

    /// Execute a GET request that is abandoned as soon as `cancel` fires
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if the token fires before the response
    /// headers arrive, otherwise the same errors as [`NetClient::get`].
    pub async fn get_cancellable(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Response, Error> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            response = self.get(url) => response,
        }
    }
}

fn map_request_error(error: &reqwest::Error, url: &str) -> Error {
    if error.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
        .into()
    } else if error.is_connect() {
        NetworkError::ConnectionRefused(error.to_string()).into()
    } else if error.is_builder() {
        NetworkError::InvalidUrl(error.to_string()).into()
    } else {
        NetworkError::RequestFailed(error.to_string()).into()
    }
}
