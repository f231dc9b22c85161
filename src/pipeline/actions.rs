// Action dispatcher
//
// The two user-triggered requests: mark a node failed, and find a route
// between two nodes. Input is validated before anything is sent; the
// returned future performs the request and turns the reply into a notice.

use super::{InputField, Notice};
use crate::net::{Backend, RouteOutcome};
use crate::topology::NodeId;
use std::future::Future;
use std::num::ParseIntError;
use std::sync::Arc;
use thiserror::Error;

/// Separator used when displaying a route
pub const PATH_SEPARATOR: &str = " -> ";

/// Errors raised before a request leaves the process
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Invalid {field} id '{input}': expected a numeric node id")]
    InvalidInput {
        field: InputField,
        input: String,
        #[source]
        source: ParseIntError,
    },
}

/// Result of a completed action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Message for the user
    pub notice: Notice,
    /// Whether the topology may have changed and should be fetched again
    pub refresh: bool,
}

/// Parse a user-entered node id
pub fn parse_node_id(field: InputField, input: &str) -> Result<NodeId, ActionError> {
    input
        .parse::<NodeId>()
        .map_err(|source| ActionError::InvalidInput {
            field,
            input: input.to_string(),
            source,
        })
}

/// `1 -> 3 -> 2`
pub fn format_path(path: &[NodeId]) -> String {
    let hops: Vec<String> = path.iter().map(NodeId::to_string).collect();
    format!("Path: {}", hops.join(PATH_SEPARATOR))
}

/// Sends mutating requests to the backend
pub struct ActionDispatcher {
    backend: Arc<dyn Backend>,
}

impl ActionDispatcher {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Validate `input` and prepare a fail-node request
    ///
    /// On success the backend message is shown and a refresh is requested.
    /// A transport failure is shown too, but does not trigger a refresh.
    pub fn fail_node(
        &self,
        input: &str,
    ) -> Result<impl Future<Output = ActionOutcome> + Send + 'static, ActionError> {
        let node = parse_node_id(InputField::FailNode, input)?;
        let backend = Arc::clone(&self.backend);

        Ok(async move {
            tracing::info!(%node, "Requesting node failure");
            match backend.fail_node(node).await {
                Ok(reply) => {
                    let rejected = reply.status.as_deref() == Some("error");
                    if rejected {
                        tracing::warn!(%node, message = %reply.message, "Backend rejected node failure");
                    }
                    ActionOutcome {
                        notice: if rejected {
                            Notice::failure(reply.message)
                        } else {
                            Notice::info(reply.message)
                        },
                        refresh: true,
                    }
                }
                Err(e) => {
                    tracing::warn!(%node, error = %e, "Fail node request failed");
                    ActionOutcome {
                        notice: Notice::failure(format!("Could not fail node {}: {}", node, e)),
                        refresh: false,
                    }
                }
            }
        })
    }

    /// Validate both ids and prepare a route query
    ///
    /// A route query does not change the topology, so it never requests a
    /// refresh.
    pub fn find_path(
        &self,
        source_input: &str,
        target_input: &str,
    ) -> Result<impl Future<Output = ActionOutcome> + Send + 'static, ActionError> {
        let source = parse_node_id(InputField::Source, source_input)?;
        let target = parse_node_id(InputField::Target, target_input)?;
        let backend = Arc::clone(&self.backend);

        Ok(async move {
            tracing::info!(%source, %target, "Requesting route");
            let notice = match backend.reroute(source, target).await {
                Ok(reply) => match reply.outcome() {
                    RouteOutcome::Found(path) => Notice::info(format_path(&path)),
                    RouteOutcome::NotFound(reason) => Notice::failure(reason),
                },
                Err(e) => {
                    tracing::warn!(%source, %target, error = %e, "Route request failed");
                    Notice::failure(format!("Could not compute route: {}", e))
                }
            };
            ActionOutcome {
                notice,
                refresh: false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{FailNodeReply, RerouteReply, FAIL_NODE, REROUTE};
    use crate::pipeline::testing::{server_error, FakeBackend};
    use crate::pipeline::NoticeKind;
    use proptest::prelude::*;

    fn dispatcher() -> (Arc<FakeBackend>, ActionDispatcher) {
        let backend = Arc::new(FakeBackend::default());
        let dispatcher = ActionDispatcher::new(backend.clone());
        (backend, dispatcher)
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[NodeId(1), NodeId(3), NodeId(2)]), "Path: 1 -> 3 -> 2");
        assert_eq!(format_path(&[NodeId(4)]), "Path: 4");
    }

    #[test]
    fn test_invalid_input_message() {
        let err = parse_node_id(InputField::FailNode, "abc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid fail node id 'abc': expected a numeric node id"
        );
    }

    #[tokio::test]
    async fn test_fail_node_rejects_non_numeric_without_request() {
        let (backend, dispatcher) = dispatcher();
        for input in ["", "abc", "1.5", "-3", "4a"] {
            assert!(dispatcher.fail_node(input).is_err(), "input {:?}", input);
        }
        assert_eq!(backend.mutating_calls(), 0);
        assert_eq!(backend.get_calls(), 0);
    }

    #[tokio::test]
    async fn test_fail_node_success_requests_refresh() {
        let (backend, dispatcher) = dispatcher();
        backend.push_fail_reply(Ok(FailNodeReply {
            message: "Node 4 failed".to_string(),
            status: Some("success".to_string()),
        }));

        let outcome = dispatcher.fail_node(" 4 ").unwrap().await;

        assert_eq!(outcome.notice, Notice::info("Node 4 failed"));
        assert!(outcome.refresh);
        assert_eq!(*backend.fail_calls.lock().unwrap(), vec![NodeId(4)]);
    }

    #[tokio::test]
    async fn test_fail_node_semantic_failure_shown_verbatim() {
        let (backend, dispatcher) = dispatcher();
        backend.push_fail_reply(Ok(FailNodeReply {
            message: "Invalid node".to_string(),
            status: Some("error".to_string()),
        }));

        let outcome = dispatcher.fail_node("99").unwrap().await;

        assert_eq!(outcome.notice.kind, NoticeKind::Failure);
        assert_eq!(outcome.notice.text, "Invalid node");
        assert!(outcome.refresh);
    }

    #[tokio::test]
    async fn test_fail_node_transport_failure_skips_refresh() {
        let (backend, dispatcher) = dispatcher();
        backend.push_fail_reply(Err(server_error(FAIL_NODE)));

        let outcome = dispatcher.fail_node("2").unwrap().await;

        assert_eq!(outcome.notice.kind, NoticeKind::Failure);
        assert!(outcome.notice.text.starts_with("Could not fail node 2"));
        assert!(!outcome.refresh);
    }

    #[tokio::test]
    async fn test_find_path_success() {
        let (backend, dispatcher) = dispatcher();
        backend.push_reroute_reply(Ok(RerouteReply {
            status: "success".to_string(),
            path: Some(vec![NodeId(1), NodeId(3), NodeId(2)]),
            message: None,
        }));

        let outcome = dispatcher.find_path("1", "2").unwrap().await;

        assert_eq!(outcome.notice, Notice::info("Path: 1 -> 3 -> 2"));
        assert!(!outcome.refresh);
        assert_eq!(*backend.reroute_calls.lock().unwrap(), vec![(NodeId(1), NodeId(2))]);
    }

    #[tokio::test]
    async fn test_find_path_no_route() {
        let (backend, dispatcher) = dispatcher();
        backend.push_reroute_reply(Ok(RerouteReply {
            status: "error".to_string(),
            path: None,
            message: Some("no path".to_string()),
        }));

        let outcome = dispatcher.find_path("1", "16").unwrap().await;
        assert_eq!(outcome.notice, Notice::failure("no path"));
    }

    #[tokio::test]
    async fn test_find_path_transport_failure() {
        let (backend, dispatcher) = dispatcher();
        backend.push_reroute_reply(Err(server_error(REROUTE)));

        let outcome = dispatcher.find_path("1", "2").unwrap().await;
        assert_eq!(outcome.notice.kind, NoticeKind::Failure);
        assert!(outcome.notice.text.contains("/reroute"));
        assert!(!outcome.refresh);
    }

    #[tokio::test]
    async fn test_find_path_validates_both_fields() {
        let (backend, dispatcher) = dispatcher();

        let err = dispatcher.find_path("x", "2").err().unwrap();
        assert!(matches!(err, ActionError::InvalidInput { field: InputField::Source, .. }));

        let err = dispatcher.find_path("1", "").err().unwrap();
        assert!(matches!(err, ActionError::InvalidInput { field: InputField::Target, .. }));

        assert_eq!(backend.mutating_calls(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any decimal u64 is accepted as a node id
        #[test]
        fn prop_numeric_input_parses(id in any::<u64>()) {
            prop_assert_eq!(parse_node_id(InputField::Source, &id.to_string()), Ok(NodeId(id)));
        }

        /// Anything containing a non-digit character is rejected
        #[test]
        fn prop_non_numeric_input_rejected(input in "[0-9]{0,3}[a-zA-Z.,_ -][0-9a-z]{0,3}") {
            prop_assume!(input.trim().parse::<u64>().is_err());
            prop_assert!(parse_node_id(InputField::FailNode, &input).is_err());
        }
    }
}
