use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::models::simulation::{PredictionPayload, RequestState};
use crate::services::prediction_client::PredictionService;
use crate::shared_state::DashboardState;

/// Drives the Idle → Pending → Succeeded | Failed cycle: one in-flight
/// request at a time, a new submit supersedes the old one, a superseded
/// request's late resolution is discarded.
#[derive(Clone)]
pub struct Orchestrator {
    state: DashboardState,
    service: Arc<dyn PredictionService>,
}

impl Orchestrator {
    pub fn new(state: DashboardState, service: Arc<dyn PredictionService>) -> Self {
        Self { state, service }
    }

    /// Accept a submit from any state. Publishes `Pending` synchronously,
    /// then resolves the prediction call on a spawned task. Returns the
    /// submit's sequence number and a request id for log correlation.
    pub fn submit(&self, payload: PredictionPayload) -> (u64, Uuid) {
        let request_id = Uuid::new_v4();
        let seq = self.state.begin();
        println!("[SUBMIT] req={} seq={} → PENDING", request_id, seq);
        #[cfg(feature = "verbose_log")]
        println!("[SUBMIT] req={} payload: {:?}", request_id, payload);

        let state = self.state.clone();
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            let next = match service.predict(&payload).await {
                Ok(outcome) => RequestState::Succeeded(outcome),
                Err(e) => {
                    eprintln!("[CLIENT] req={} seq={} {}: {}", request_id, seq, e.kind(), e);
                    RequestState::Failed(e.to_string())
                }
            };

            let phase = next.phase_name();
            if state.apply(seq, next) {
                println!("[RESULT] req={} seq={} → {}", request_id, seq, phase);
            } else {
                println!(
                    "[DISCARD] req={} seq={} superseded (latest={})",
                    request_id,
                    seq,
                    state.latest_seq()
                );
            }
        });

        (seq, request_id)
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::models::simulation::{
        BatteryReport, PredictionOutcome, SimulationInput, SimulationResult,
    };
    use crate::services::prediction_client::ClientError;

    /// Scripted collaborator: each `predict` call blocks on the next gate,
    /// so tests control exactly when and in which order calls resolve.
    struct ScriptedService {
        gates: Mutex<VecDeque<oneshot::Receiver<Result<PredictionOutcome, ClientError>>>>,
    }

    impl ScriptedService {
        fn with_calls(
            n: usize,
        ) -> (Arc<Self>, Vec<oneshot::Sender<Result<PredictionOutcome, ClientError>>>) {
            let mut senders = Vec::new();
            let mut gates = VecDeque::new();
            for _ in 0..n {
                let (tx, rx) = oneshot::channel();
                senders.push(tx);
                gates.push_back(rx);
            }
            (Arc::new(Self { gates: Mutex::new(gates) }), senders)
        }
    }

    #[async_trait]
    impl PredictionService for ScriptedService {
        async fn predict(
            &self,
            _payload: &PredictionPayload,
        ) -> Result<PredictionOutcome, ClientError> {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .pop_front()
                .expect("more predict calls than scripted gates");
            gate.await.expect("test dropped the gate sender")
        }
    }

    fn bangalore_payload() -> PredictionPayload {
        PredictionPayload::Dashboard(SimulationInput {
            latitude: 12.97,
            longitude: 77.59,
            max_grid_power: 5.0,
            max_battery_capacity: 13.5,
            current_battery_capacity: 4.2,
            energy_consumption: 0.8,
            duration_hours: 24.0,
        })
    }

    fn dashboard_outcome(total: f64) -> PredictionOutcome {
        PredictionOutcome::Dashboard(SimulationResult {
            total_energy_generated: total,
            battery: BatteryReport {
                energy_to_battery: 3.2,
                energy_from_battery: 1.7,
                unmet_energy: 0.0,
                percentage: 0.62,
                status_message: "ok".to_string(),
            },
            hourly_generated_energy: vec![0.0, 1.2, 2.6],
            hourly_battery_level: vec![4.2, 4.9, 6.1],
        })
    }

    fn total_of(state: &RequestState) -> f64 {
        match state {
            RequestState::Succeeded(PredictionOutcome::Dashboard(r)) => r.total_energy_generated,
            other => panic!("expected a dashboard success, got {:?}", other),
        }
    }

    /// Await transitions until the snapshot leaves `Pending`.
    async fn settled(rx: &mut tokio::sync::watch::Receiver<crate::shared_state::Snapshot>) -> RequestState {
        loop {
            let state = rx.borrow_and_update().state.clone();
            if state != RequestState::Pending {
                return state;
            }
            rx.changed().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_submit_moves_idle_to_pending_then_succeeded() {
        let (service, mut senders) = ScriptedService::with_calls(1);
        let state = DashboardState::new();
        let orchestrator = Orchestrator::new(state.clone(), service);
        let mut rx = state.subscribe();

        assert_eq!(state.snapshot().state, RequestState::Idle);
        let (seq, _) = orchestrator.submit(bangalore_payload());

        // Pending is published synchronously, before the client resolves.
        assert_eq!(state.snapshot().state, RequestState::Pending);

        senders.remove(0).send(Ok(dashboard_outcome(10.5))).unwrap();
        let final_state = settled(&mut rx).await;
        assert_eq!(total_of(&final_state), 10.5);
        assert_eq!(state.snapshot().seq, seq);
    }

    #[tokio::test]
    async fn test_second_submit_wins_even_if_first_resolves_last() {
        let (service, mut senders) = ScriptedService::with_calls(2);
        let state = DashboardState::new();
        let orchestrator = Orchestrator::new(state.clone(), service);
        let mut rx = state.subscribe();

        orchestrator.submit(bangalore_payload());
        let (second_seq, _) = orchestrator.submit(bangalore_payload());

        // Resolve the second call first…
        senders.remove(1).send(Ok(dashboard_outcome(20.0))).unwrap();
        let after_second = settled(&mut rx).await;
        assert_eq!(total_of(&after_second), 20.0);

        // …then let the superseded first call resolve late.
        senders.remove(0).send(Ok(dashboard_outcome(1.0))).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let snap = state.snapshot();
        assert_eq!(snap.seq, second_seq);
        assert_eq!(total_of(&snap.state), 20.0);
    }

    #[tokio::test]
    async fn test_rejected_call_surfaces_the_service_message() {
        let (service, mut senders) = ScriptedService::with_calls(1);
        let state = DashboardState::new();
        let orchestrator = Orchestrator::new(state.clone(), service);
        let mut rx = state.subscribe();

        orchestrator.submit(bangalore_payload());
        senders
            .remove(0)
            .send(Err(ClientError::Rejected("invalid latitude".to_string())))
            .unwrap();

        assert_eq!(
            settled(&mut rx).await,
            RequestState::Failed("invalid latitude".to_string())
        );
    }

    #[tokio::test]
    async fn test_unreachable_call_fails_with_nonempty_message() {
        let (service, mut senders) = ScriptedService::with_calls(1);
        let state = DashboardState::new();
        let orchestrator = Orchestrator::new(state.clone(), service);
        let mut rx = state.subscribe();

        orchestrator.submit(bangalore_payload());
        senders
            .remove(0)
            .send(Err(ClientError::Unreachable("connection refused".to_string())))
            .unwrap();

        match settled(&mut rx).await {
            RequestState::Failed(message) => assert!(!message.is_empty()),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_after_failure_recovers() {
        let (service, mut senders) = ScriptedService::with_calls(2);
        let state = DashboardState::new();
        let orchestrator = Orchestrator::new(state.clone(), service);
        let mut rx = state.subscribe();

        orchestrator.submit(bangalore_payload());
        senders
            .remove(0)
            .send(Err(ClientError::MalformedResponse))
            .unwrap();
        assert!(matches!(settled(&mut rx).await, RequestState::Failed(_)));

        orchestrator.submit(bangalore_payload());
        assert_eq!(state.snapshot().state, RequestState::Pending);
        senders.remove(0).send(Ok(dashboard_outcome(7.0))).unwrap();
        assert_eq!(total_of(&settled(&mut rx).await), 7.0);
    }
}
