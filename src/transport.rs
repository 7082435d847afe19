//! Transport collaborator: sends one authenticated HTTP request and
//! returns the status code plus the parsed JSON body. Discrimination and
//! normalization happen above this layer, so implementations stay dumb —
//! an error body with HTTP 400 and a success body with HTTP 200 come back
//! the same way.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::endpoints::Verb;
use crate::error::{ApiResult, Error};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request; returns the HTTP status and the parsed JSON body.
    async fn send(
        &self,
        verb: Verb,
        url: &str,
        authorization: &str,
        body: Option<&Value>,
    ) -> ApiResult<(u16, Value)>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        verb: Verb,
        url: &str,
        authorization: &str,
        body: Option<&Value>,
    ) -> ApiResult<(u16, Value)> {
        (**self).send(verb, url, authorization, body).await
    }
}

/// Production transport over reqwest.
pub struct HttpTransport {
    client: Client,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> ApiResult<Self> {
        let request_timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("toss-payments-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            request_timeout,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        verb: Verb,
        url: &str,
        authorization: &str,
        body: Option<&Value>,
    ) -> ApiResult<(u16, Value)> {
        let method = match verb {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
        };

        let mut request = self
            .client
            .request(method, url)
            .header("Authorization", authorization);

        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .json(body);
        }

        let response = timeout(self.request_timeout, request.send())
            .await
            .map_err(|_| Error::timeout(self.request_timeout.as_secs()))??;

        let status = response.status().as_u16();
        debug!("provider responded with HTTP {}", status);

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| Error::decode(format!("response body is not JSON: {}", e)))?;

        Ok((status, parsed))
    }
}
