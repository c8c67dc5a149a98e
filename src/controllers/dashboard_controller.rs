use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};

use crate::config::{Config, SiteDefaults};
use crate::models::simulation::PredictForm;
use crate::orchestrator::Orchestrator;
use crate::shared_state::{DashboardState, Snapshot};
use crate::view::DashboardView;

/// POST /api/predict
/// Submit a prediction request
///
/// Accepts the raw form fields as free text; which fields are present selects
/// the payload variant. An accepted submit supersedes any in-flight request.
#[utoipa::path(
    post,
    path = "/api/predict",
    request_body = PredictForm,
    responses(
        (status = 202, description = "Submit accepted, request now pending"),
    )
)]
pub async fn submit_prediction(
    State(orchestrator): State<Orchestrator>,
    Json(form): Json<PredictForm>,
) -> impl IntoResponse {
    let payload = form.into_payload();
    let (seq, request_id) = orchestrator.submit(payload);
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "seq": seq, "request_id": request_id })),
    )
        .into_response()
}

/// GET /api/view
/// Current dashboard view
///
/// One immutable view per state snapshot: numeric summaries plus chart
/// geometry when (and only when) the last request succeeded with the full
/// dashboard result shape.
#[utoipa::path(
    get,
    path = "/api/view",
    responses(
        (status = 200, description = "Current renderer view", body = DashboardView),
    )
)]
pub async fn get_view(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    Json(DashboardView::from_snapshot(&dashboard.snapshot())).into_response()
}

/// GET /api/state
/// Raw request-lifecycle snapshot
#[utoipa::path(
    get,
    path = "/api/state",
    responses(
        (status = 200, description = "Current request state snapshot", body = Snapshot),
    )
)]
pub async fn get_state(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    Json(dashboard.snapshot()).into_response()
}

/// GET /api/site
/// Default site parameters for prefilling the form
#[utoipa::path(
    get,
    path = "/api/site",
    responses(
        (status = 200, description = "Configured site defaults", body = SiteDefaults),
    )
)]
pub async fn get_site_defaults(State(config): State<Config>) -> impl IntoResponse {
    Json(config.site).into_response()
}

/// GET /api/ws — upgrade to a websocket that pushes a `DashboardView` on
/// every state transition. This is the renderer's subscription.
pub async fn ws_view(
    ws: WebSocketUpgrade,
    State(dashboard): State<DashboardState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_views(socket, dashboard))
}

async fn stream_views(socket: WebSocket, dashboard: DashboardState) {
    let (mut sink, mut stream) = socket.split();
    let mut rx = dashboard.subscribe();
    // Deliver the current view right away, then one per transition.
    rx.mark_changed();

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = rx.borrow_and_update().clone();
                let view = DashboardView::from_snapshot(&snap);
                let text = match serde_json::to_string(&view) {
                    Ok(t) => t,
                    Err(e) => {
                        eprintln!("[WS] failed to encode view: {}", e);
                        break;
                    }
                };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            // Ignore inbound traffic, but bail out when the client hangs up.
            inbound = stream.next() => {
                match inbound {
                    None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
