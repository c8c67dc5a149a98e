mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod orchestrator;
mod view;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use axum::{Router, routing::get, response::Html};
use crate::routes::dashboard_routes::api_routes;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;
use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::orchestrator::Orchestrator;
use crate::services::prediction_client::PredictionClient;
use crate::shared_state::{DashboardState, SharedState};

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

#[tokio::main]
async fn main() {
    // 1. Load configuration
    let config = match Config::load("config.json") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config.json: {}", e);
            return;
        }
    };
    println!(
        "Configuration loaded: prediction service at {}",
        config.predictor.base_url
    );

    // 2. Build the prediction client
    let client = match PredictionClient::new(
        &config.predictor.base_url,
        Duration::from_secs(config.predictor.timeout_seconds),
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build prediction client: {}", e);
            return;
        }
    };

    // 3. Initialize the shared snapshot and the orchestrator
    let dashboard = DashboardState::new();
    let orchestrator = Orchestrator::new(dashboard.clone(), Arc::new(client));
    let shared = SharedState {
        config: config.clone(),
        dashboard,
        orchestrator,
    };

    // 4. Start Axum HTTP server
    let server_port = config.server.port;
    let app = Router::new()
        .nest("/api", api_routes(shared))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new("static"))
        // The static page and the API may be served from different origins
        // during development, same as the original Flask backend allowed.
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    println!("Dashboard listening on http://{}", addr);
    println!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
