use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError};

use super::dispatch::{Transport, TransportError};
use super::execution::execute_request;
use super::request::RequestDescriptor;

#[derive(Debug, Clone, Copy)]
pub struct ClientSettings {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the HTTP client used for the whole run.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be constructed.
    pub fn new(settings: ClientSettings) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))?;
        debug!(
            "HTTP client ready (timeout {:?}, connect timeout {:?})",
            settings.request_timeout, settings.connect_timeout
        );
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<u16, TransportError> {
        execute_request(&self.client, request).await
    }
}
