use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::FromRef;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use utoipa::ToSchema;

use crate::config::Config;
use crate::models::simulation::RequestState;
use crate::orchestrator::Orchestrator;

/// One published dashboard snapshot. Replaced wholesale on every
/// transition — readers never observe partially-populated data.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Snapshot {
    /// Sequence number of the submit this snapshot belongs to (0 = startup)
    pub seq: u64,
    pub state: RequestState,
    pub at: DateTime<Utc>,
}

/// Holds the single `RequestState` snapshot behind a watch channel and the
/// monotonically increasing submit counter used to discard stale responses.
#[derive(Debug, Clone)]
pub struct DashboardState {
    tx: Arc<watch::Sender<Snapshot>>,
    latest_seq: Arc<AtomicU64>,
}

impl DashboardState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Snapshot {
            seq: 0,
            state: RequestState::Idle,
            at: Utc::now(),
        });
        Self {
            tx: Arc::new(tx),
            latest_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current snapshot, cloned out of the channel.
    pub fn snapshot(&self) -> Snapshot {
        self.tx.borrow().clone()
    }

    /// Receiver that yields on every transition — the renderer-side
    /// subscription (the websocket controller drains one of these).
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq.load(Ordering::SeqCst)
    }

    /// Start a new submit cycle: allocate the next sequence number and
    /// publish `Pending`, clearing any previous result or error. Runs inside
    /// the channel lock so it serializes against late `apply` calls.
    pub fn begin(&self) -> u64 {
        let mut seq = 0;
        self.tx.send_if_modified(|current| {
            seq = self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
            *current = Snapshot {
                seq,
                state: RequestState::Pending,
                at: Utc::now(),
            };
            true
        });
        seq
    }

    /// Publish the terminal state for submit `seq`. Returns false and leaves
    /// the snapshot untouched when `seq` has been superseded by a newer
    /// submit — the stale-response discard (last submit wins).
    pub fn apply(&self, seq: u64, state: RequestState) -> bool {
        self.tx.send_if_modified(|current| {
            if seq != self.latest_seq.load(Ordering::SeqCst) {
                return false;
            }
            *current = Snapshot {
                seq,
                state,
                at: Utc::now(),
            };
            true
        })
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

/// Combined router state. Handlers extract `State<DashboardState>`,
/// `State<Orchestrator>` or `State<Config>` via `FromRef` — a single
/// `.with_state(shared)` covers all three.
#[derive(Debug, Clone)]
pub struct SharedState {
    pub config: Config,
    pub dashboard: DashboardState,
    pub orchestrator: Orchestrator,
}

impl FromRef<SharedState> for Config {
    fn from_ref(shared: &SharedState) -> Config {
        shared.config.clone()
    }
}

impl FromRef<SharedState> for DashboardState {
    fn from_ref(shared: &SharedState) -> DashboardState {
        shared.dashboard.clone()
    }
}

impl FromRef<SharedState> for Orchestrator {
    fn from_ref(shared: &SharedState) -> Orchestrator {
        shared.orchestrator.clone()
    }
}
