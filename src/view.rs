use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::simulation::{PredictionOutcome, RequestState};
use crate::services::chart_geometry::{self, CategoryBar, SeriesLayout};
use crate::shared_state::Snapshot;

/// Bar colors for the energy breakdown, shared with the static page.
const COLOR_GENERATED: &str = "#fbc02d";
const COLOR_TO_BATTERY: &str = "#2e7d32";
const COLOR_FROM_BATTERY: &str = "#1976d2";
const COLOR_UNMET: &str = "#c62828";

/// What the renderer consumes: one immutable view per snapshot. Exactly one
/// of {nothing, spinner, result, error} is visible at a time; chart geometry
/// is only ever computed from a succeeded dashboard result.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardView {
    pub seq: u64,
    pub phase: &'static str,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The raw outcome, tagged-union style — the one renderer is
    /// parameterized by which shape it finds here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PredictionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_bars: Option<Vec<CategoryBar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_chart: Option<SeriesLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_chart: Option<SeriesLayout>,
}

impl DashboardView {
    pub fn from_snapshot(snap: &Snapshot) -> Self {
        let mut view = DashboardView {
            seq: snap.seq,
            phase: snap.state.phase_name(),
            at: snap.at,
            error: None,
            result: None,
            energy_bars: None,
            generation_chart: None,
            battery_chart: None,
        };

        match &snap.state {
            RequestState::Idle | RequestState::Pending => {}
            RequestState::Failed(message) => {
                view.error = Some(message.clone());
            }
            RequestState::Succeeded(outcome) => {
                if let PredictionOutcome::Dashboard(result) = outcome {
                    view.energy_bars = Some(chart_geometry::layout_category_bars(&[
                        ("Generated", result.total_energy_generated, COLOR_GENERATED),
                        ("To battery", result.battery.energy_to_battery, COLOR_TO_BATTERY),
                        ("From battery", result.battery.energy_from_battery, COLOR_FROM_BATTERY),
                        ("Unmet", result.battery.unmet_energy, COLOR_UNMET),
                    ]));
                    view.generation_chart =
                        Some(chart_geometry::layout_time_series(&result.hourly_generated_energy));
                    view.battery_chart =
                        Some(chart_geometry::layout_time_series(&result.hourly_battery_level));
                }
                view.result = Some(outcome.clone());
            }
        }

        view
    }
}
