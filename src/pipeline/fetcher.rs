// Snapshot fetcher
//
// Issues `GET /get_network` requests tagged with a sequence number. The
// request future owns everything it needs so it can run as a detached task
// while the event loop keeps drawing.

use crate::net::{Backend, BackendError};
use crate::topology::Snapshot;
use std::future::Future;
use std::sync::Arc;

/// Result of one fetch, tagged with the order it was issued in
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<Snapshot, BackendError>,
}

pub struct Fetcher {
    backend: Arc<dyn Backend>,
    next_seq: u64,
}

impl Fetcher {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            next_seq: 0,
        }
    }

    /// Start a fetch; sequence numbers grow with every call
    pub fn begin(&mut self) -> impl Future<Output = FetchOutcome> + Send + 'static {
        self.next_seq += 1;
        let seq = self.next_seq;
        let backend = Arc::clone(&self.backend);
        async move {
            tracing::debug!(seq, "Fetching network snapshot");
            let result = backend.get_network().await;
            FetchOutcome { seq, result }
        }
    }
}
