use axum::{
    routing::{get, post},
    Router,
};
use crate::controllers::dashboard_controller::{
    // Submit & lifecycle
    submit_prediction, get_state, get_view,
    // Subscription & form defaults
    ws_view, get_site_defaults,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<Orchestrator>`, `State<DashboardState>` and/or
/// `State<Config>` via `FromRef<SharedState>` — a single `.with_state(shared)`
/// covers all of them.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/predict", post(submit_prediction))
        .route("/view",    get(get_view))
        .route("/state",   get(get_state))
        .route("/site",    get(get_site_defaults))
        .route("/ws",      get(ws_view))
        .with_state(shared)
}
