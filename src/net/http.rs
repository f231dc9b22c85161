// HTTP implementation of the backend client

use super::{
    Backend, BackendError, FailNodeReply, FailNodeRequest, RerouteReply, RerouteRequest, FAIL_NODE,
    GET_NETWORK, REROUTE,
};
use crate::app::config::HTTP_TIMEOUT;
use crate::topology::{NodeId, Snapshot};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Backend reached over HTTP with a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a client for the service at `base_url` (e.g. `http://127.0.0.1:5000`)
    ///
    /// Every request made through it is bounded by `HTTP_TIMEOUT`.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|source| BackendError::Client { source })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and decode its JSON body
    async fn exchange<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let resp = request
            .send()
            .await
            .map_err(|source| BackendError::Transport { endpoint, source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status { endpoint, status });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| BackendError::Transport { endpoint, source })?;
        decode(endpoint, &body)
    }
}

/// Parse a response body, tagging failures with the endpoint
fn decode<T: DeserializeOwned>(endpoint: &'static str, body: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(body).map_err(|source| BackendError::Malformed { endpoint, source })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get_network(&self) -> Result<Snapshot, BackendError> {
        self.exchange(GET_NETWORK, self.client.get(self.url(GET_NETWORK)))
            .await
    }

    async fn fail_node(&self, node: NodeId) -> Result<FailNodeReply, BackendError> {
        let request = self
            .client
            .post(self.url(FAIL_NODE))
            .json(&FailNodeRequest { node });
        self.exchange(FAIL_NODE, request).await
    }

    async fn reroute(&self, source: NodeId, target: NodeId) -> Result<RerouteReply, BackendError> {
        let request = self
            .client
            .post(self.url(REROUTE))
            .json(&RerouteRequest { source, target });
        self.exchange(REROUTE, request).await
    }
}
