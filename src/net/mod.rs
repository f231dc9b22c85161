// Backend client module
//
// The network simulation service is reached over HTTP. Everything above
// this module talks to it through the `Backend` trait so the pipeline can
// be driven by an in-memory fake in tests.

mod http;

pub use http::HttpBackend;

use crate::topology::{NodeId, Snapshot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Endpoint serving the current topology snapshot
pub const GET_NETWORK: &str = "/get_network";

/// Endpoint marking a node as failed
pub const FAIL_NODE: &str = "/fail_node";

/// Endpoint computing a route between two nodes
pub const REROUTE: &str = "/reroute";

/// Errors reaching or understanding the backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// The HTTP client could not be constructed
    #[error("cannot build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// Connection, timeout or body read failure
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success HTTP status
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    /// The body did not have the expected shape
    #[error("malformed response from {endpoint}: {source}")]
    Malformed {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Body of `POST /fail_node`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailNodeRequest {
    pub node: NodeId,
}

/// Reply of `POST /fail_node`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FailNodeReply {
    /// Human readable outcome, shown to the user as-is
    pub message: String,
    /// "success" or "error"; older backends omit it
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `POST /reroute`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerouteRequest {
    pub source: NodeId,
    pub target: NodeId,
}

/// Reply of `POST /reroute`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RerouteReply {
    pub status: String,
    #[serde(default)]
    pub path: Option<Vec<NodeId>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Interpreted result of a route query
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// Ordered hops from source to target
    Found(Vec<NodeId>),
    /// Reason reported by the backend
    NotFound(String),
}

/// Message used when the backend refuses a route without saying why
pub const NO_PATH_MESSAGE: &str = "No path available";

impl RerouteReply {
    /// Only `status == "success"` with a path counts as a route
    pub fn outcome(self) -> RouteOutcome {
        match (self.status.as_str(), self.path) {
            ("success", Some(path)) => RouteOutcome::Found(path),
            _ => RouteOutcome::NotFound(
                self.message.unwrap_or_else(|| NO_PATH_MESSAGE.to_string()),
            ),
        }
    }
}

/// Operations offered by the network simulation service
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /get_network`
    async fn get_network(&self) -> Result<Snapshot, BackendError>;

    /// `POST /fail_node`
    async fn fail_node(&self, node: NodeId) -> Result<FailNodeReply, BackendError>;

    /// `POST /reroute`
    async fn reroute(&self, source: NodeId, target: NodeId) -> Result<RerouteReply, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reroute_success_outcome() {
        let reply: RerouteReply =
            serde_json::from_str(r#"{"status": "success", "path": [1, 3, 2]}"#).unwrap();
        assert_eq!(
            reply.outcome(),
            RouteOutcome::Found(vec![NodeId(1), NodeId(3), NodeId(2)])
        );
    }

    #[test]
    fn test_reroute_error_outcome() {
        let reply: RerouteReply =
            serde_json::from_str(r#"{"status": "error", "message": "no path"}"#).unwrap();
        assert_eq!(reply.outcome(), RouteOutcome::NotFound("no path".to_string()));
    }

    #[test]
    fn test_reroute_outcome_without_message_or_path() {
        let reply: RerouteReply = serde_json::from_str(r#"{"status": "error"}"#).unwrap();
        assert_eq!(reply.outcome(), RouteOutcome::NotFound(NO_PATH_MESSAGE.to_string()));

        let reply: RerouteReply = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert_eq!(reply.outcome(), RouteOutcome::NotFound(NO_PATH_MESSAGE.to_string()));
    }

    #[test]
    fn test_fail_node_reply_status_is_optional() {
        let reply: FailNodeReply = serde_json::from_str(r#"{"message": "Node 4 failed"}"#).unwrap();
        assert_eq!(reply.message, "Node 4 failed");
        assert_eq!(reply.status, None);

        let reply: FailNodeReply =
            serde_json::from_str(r#"{"status": "error", "message": "Invalid node"}"#).unwrap();
        assert_eq!(reply.status.as_deref(), Some("error"));
    }

    #[test]
    fn test_request_bodies() {
        assert_eq!(
            serde_json::to_string(&FailNodeRequest { node: NodeId(4) }).unwrap(),
            r#"{"node":4}"#
        );
        assert_eq!(
            serde_json::to_string(&RerouteRequest { source: NodeId(1), target: NodeId(16) }).unwrap(),
            r#"{"source":1,"target":16}"#
        );
    }
}
