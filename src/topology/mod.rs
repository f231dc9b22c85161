// Topology data model
//
// Snapshot types received from the network-simulation backend, plus the
// layout engine and the snapshot store built on top of them.

pub mod layout;
pub mod store;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a network node
///
/// The backend addresses nodes by integer. The same value is used as the
/// position map key and as the label drawn next to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = ParseIntError;

    /// Parse user-entered text, ignoring surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(NodeId)
    }
}

/// A single node of the topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
}

/// An undirected link between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,

    /// Link latency in milliseconds, when the backend reports one
    #[serde(default)]
    pub latency: Option<f64>,
}

/// Decode `null` the same way as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Network health metrics attached to a snapshot
///
/// Missing or null fields default to zero instead of rejecting the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    /// Packet loss in percent (expected 0-100)
    #[serde(deserialize_with = "null_as_default")]
    pub packet_loss: f64,
    /// Jitter in milliseconds
    #[serde(deserialize_with = "null_as_default")]
    pub jitter: f64,
}

/// One complete graph state as returned by `GET /get_network`
///
/// Node order is significant: it determines the angular position of each
/// node in the layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
    #[serde(deserialize_with = "null_as_default")]
    pub edges: Vec<Edge>,
    #[serde(deserialize_with = "null_as_default")]
    pub metrics: Metrics,
}

impl Snapshot {
    /// Mean latency over the edges that report one
    pub fn mean_link_latency(&self) -> Option<f64> {
        let latencies: Vec<f64> = self.edges.iter().filter_map(|e| e.latency).collect();
        if latencies.is_empty() {
            return None;
        }
        Some(latencies.iter().sum::<f64>() / latencies.len() as f64)
    }
}
