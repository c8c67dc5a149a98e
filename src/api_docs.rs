use utoipa::OpenApi;
use crate::controllers::dashboard_controller;
use crate::models::simulation;
use crate::config;
use crate::services::chart_geometry;
use crate::shared_state;
use crate::view;

#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard_controller::submit_prediction,
        dashboard_controller::get_view,
        dashboard_controller::get_state,
        dashboard_controller::get_site_defaults
    ),
    components(
        schemas(
            simulation::PredictForm,
            simulation::SimulationInput,
            simulation::SimulationResult,
            simulation::SimplePrediction,
            simulation::PredictionOutcome,
            simulation::RequestState,
            simulation::BatteryReport,
            simulation::WeatherInputs,
            config::SiteDefaults,
            chart_geometry::CategoryBar,
            chart_geometry::SeriesLayout,
            chart_geometry::AxisTick,
            chart_geometry::PlotPoint,
            shared_state::Snapshot,
            view::DashboardView
        )
    ),
    tags(
        (name = "solar-prediction-dashboard", description = "Solar Prediction Dashboard API")
    )
)]
pub struct ApiDoc;
