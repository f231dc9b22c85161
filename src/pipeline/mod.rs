// Refresh / layout / render pipeline
//
// Owns the snapshot store and drives one refresh cycle at a time:
// fetch result -> store -> layout -> render -> metrics. Everything that
// touches the screen goes through the `Presenter` trait.

pub mod actions;
pub mod fetcher;
pub mod schedule;

use crate::net::Backend;
use crate::render::{self, RenderReport, Surface};
use crate::topology::layout::{compute_positions, LayoutConfig};
use crate::topology::store::SnapshotStore;
use crate::ui::metrics::MetricsView;
use actions::ActionDispatcher;
use fetcher::{FetchOutcome, Fetcher};
use std::fmt;
use std::sync::Arc;

/// User-editable text fields read by the action dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputField {
    /// Id of the node to mark failed
    #[default]
    FailNode,
    /// Start of a route query
    Source,
    /// End of a route query
    Target,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailNode => write!(f, "fail node"),
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Failure,
}

/// Message shown to the user after an explicit action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            text: text.into(),
        }
    }
}

/// Narrow presentation interface the pipeline writes to
pub trait Presenter {
    /// Replace the metrics display
    fn set_metrics(&mut self, metrics: MetricsView);

    /// Drawing surface a frame is rendered onto
    fn canvas(&mut self) -> &mut dyn Surface;

    /// Current text of an input field
    fn read_input(&self, field: InputField) -> String;

    /// Show a message to the user
    fn notify(&mut self, notice: Notice);
}

/// What happened to a fetch result handed to the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum CycleResult {
    /// The snapshot was applied and a new frame drawn
    Rendered(RenderReport),
    /// A newer snapshot was already on screen
    Stale,
    /// The fetch failed; the previous frame stays
    Failed,
}

/// Single owner of the displayed snapshot and the refresh cycle
pub struct Pipeline {
    store: SnapshotStore,
    layout: LayoutConfig,
    fetcher: Fetcher,
    actions: ActionDispatcher,
    last_error: Option<String>,
    last_report: RenderReport,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn Backend>, layout: LayoutConfig) -> Self {
        Self {
            store: SnapshotStore::new(),
            layout,
            fetcher: Fetcher::new(Arc::clone(&backend)),
            actions: ActionDispatcher::new(backend),
            last_error: None,
            last_report: RenderReport::default(),
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn actions(&self) -> &ActionDispatcher {
        &self.actions
    }

    /// Drawing area the layout places nodes in
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Error of the most recent failed background refresh, cleared on success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Report of the most recent successful render
    pub fn last_report(&self) -> &RenderReport {
        &self.last_report
    }

    /// Issue a new fetch; the returned future can run detached
    pub fn begin_fetch(&mut self) -> impl std::future::Future<Output = FetchOutcome> + Send + 'static {
        self.fetcher.begin()
    }

    /// Fetch and apply in one step
    pub async fn refresh(&mut self, presenter: &mut dyn Presenter) -> CycleResult {
        let outcome = self.begin_fetch().await;
        self.apply(outcome, presenter)
    }

    /// Apply a completed fetch: store, layout, render, metrics
    ///
    /// Layout and render run synchronously, so the frame drawn always
    /// belongs to the snapshot stored in the same call.
    pub fn apply(&mut self, outcome: FetchOutcome, presenter: &mut dyn Presenter) -> CycleResult {
        let seq = outcome.seq;
        let snapshot = match outcome.result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(seq, error = %e, "Snapshot refresh failed, keeping previous frame");
                self.last_error = Some(e.to_string());
                return CycleResult::Failed;
            }
        };

        let snapshot = match self.store.replace(seq, snapshot) {
            Ok(snapshot) => snapshot,
            Err(stale) => {
                tracing::debug!(seq, applied_seq = stale.applied_seq, "Dropping stale snapshot");
                return CycleResult::Stale;
            }
        };

        let positions = compute_positions(snapshot, &self.layout);
        let report = render::render(presenter.canvas(), snapshot, &positions);
        presenter.set_metrics(MetricsView::from_snapshot(snapshot));

        tracing::debug!(
            seq,
            nodes = report.nodes_drawn,
            edges = report.edges_drawn,
            skipped = report.skipped_edges.len(),
            "Applied snapshot"
        );
        self.last_error = None;
        self.last_report = report.clone();
        CycleResult::Rendered(report)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory backend and presenter shared by the pipeline tests

    use super::*;
    use crate::net::{BackendError, FailNodeReply, RerouteReply};
    use crate::render::Scene;
    use crate::topology::{NodeId, Snapshot};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted backend: each call pops the next queued reply
    #[derive(Default)]
    pub struct FakeBackend {
        pub networks: Mutex<VecDeque<Result<Snapshot, BackendError>>>,
        pub fail_replies: Mutex<VecDeque<Result<FailNodeReply, BackendError>>>,
        pub reroute_replies: Mutex<VecDeque<Result<RerouteReply, BackendError>>>,
        pub get_calls: AtomicUsize,
        pub fail_calls: Mutex<Vec<NodeId>>,
        pub reroute_calls: Mutex<Vec<(NodeId, NodeId)>>,
    }

    impl FakeBackend {
        pub fn push_network(&self, reply: Result<Snapshot, BackendError>) {
            self.networks.lock().unwrap().push_back(reply);
        }

        pub fn push_fail_reply(&self, reply: Result<FailNodeReply, BackendError>) {
            self.fail_replies.lock().unwrap().push_back(reply);
        }

        pub fn push_reroute_reply(&self, reply: Result<RerouteReply, BackendError>) {
            self.reroute_replies.lock().unwrap().push_back(reply);
        }

        pub fn get_calls(&self) -> usize {
            self.get_calls.load(Ordering::SeqCst)
        }

        pub fn mutating_calls(&self) -> usize {
            self.fail_calls.lock().unwrap().len() + self.reroute_calls.lock().unwrap().len()
        }
    }

    /// Error the fake returns when nothing is queued
    pub fn server_error(endpoint: &'static str) -> BackendError {
        BackendError::Status {
            endpoint,
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn malformed(endpoint: &'static str) -> BackendError {
        let source = serde_json::from_str::<Snapshot>("not json").unwrap_err();
        BackendError::Malformed { endpoint, source }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn get_network(&self) -> Result<Snapshot, BackendError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.networks
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(server_error(crate::net::GET_NETWORK)))
        }

        async fn fail_node(&self, node: NodeId) -> Result<FailNodeReply, BackendError> {
            self.fail_calls.lock().unwrap().push(node);
            self.fail_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(server_error(crate::net::FAIL_NODE)))
        }

        async fn reroute(&self, source: NodeId, target: NodeId) -> Result<RerouteReply, BackendError> {
            self.reroute_calls.lock().unwrap().push((source, target));
            self.reroute_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(server_error(crate::net::REROUTE)))
        }
    }

    /// Presenter that records everything written to it
    #[derive(Default)]
    pub struct RecordingPresenter {
        pub scene: Scene,
        pub metrics: Option<MetricsView>,
        pub inputs: HashMap<InputField, String>,
        pub notices: Vec<Notice>,
        pub metrics_updates: usize,
    }

    impl Presenter for RecordingPresenter {
        fn set_metrics(&mut self, metrics: MetricsView) {
            self.metrics = Some(metrics);
            self.metrics_updates += 1;
        }

        fn canvas(&mut self) -> &mut dyn Surface {
            &mut self.scene
        }

        fn read_input(&self, field: InputField) -> String {
            self.inputs.get(&field).cloned().unwrap_or_default()
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }
}
