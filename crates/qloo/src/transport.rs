use std::time::Duration;

use async_trait::async_trait;
use culturehub_core::config::QlooConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Status and raw body of one insights request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("could not read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else if error.is_body() || error.is_decode() {
            Self::Body(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

#[async_trait]
pub trait QlooTransport: Send + Sync {
    async fn get(&self, query: &[(String, String)]) -> Result<HttpReply, TransportError>;
}

pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl ReqwestTransport {
    pub fn from_config(config: &QlooConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| TransportError::Request(error.to_string()))?;

        Ok(Self { client, base_url: config.base_url.clone(), api_key: config.api_key.clone() })
    }
}

#[async_trait]
impl QlooTransport for ReqwestTransport {
    async fn get(&self, query: &[(String, String)]) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .get(&self.base_url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .query(query)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}
