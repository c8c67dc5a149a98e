use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Prediction request payloads ─────────────────────────────────────────────

/// Full dashboard form, coerced to numbers and sent to the prediction
/// service as-is. Field names are the wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimulationInput {
    /// Geographic latitude (decimal degrees, signed)
    pub latitude: f64,
    /// Geographic longitude (decimal degrees, signed)
    pub longitude: f64,
    /// Maximum grid draw (kW)
    pub max_grid_power: f64,
    /// Battery capacity (kWh)
    pub max_battery_capacity: f64,
    /// Battery charge at simulation start (kWh)
    pub current_battery_capacity: f64,
    /// Site consumption per hour (kWh)
    pub energy_consumption: f64,
    /// Simulated horizon (hours)
    pub duration_hours: f64,
}

/// Request-body variants for the different dashboard screens, collapsed
/// into one tagged union. Serialized untagged — the set of fields present
/// on the wire is what the service discriminates on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PredictionPayload {
    Dashboard(SimulationInput),
    Coordinates { latitude: f64, longitude: f64 },
    Duration { duration_hours: f64 },
}

// ─── Form coercion ────────────────────────────────────────────────────────────

/// Raw form fields as submitted — free text, everything optional. Which
/// fields are filled in selects the payload variant.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PredictForm {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub max_grid_power: Option<String>,
    pub max_battery_capacity: Option<String>,
    pub current_battery_capacity: Option<String>,
    pub energy_consumption: Option<String>,
    pub duration_hours: Option<String>,
}

/// Free-text → number coercion. Non-numeric text becomes the NaN sentinel;
/// serde_json writes a non-finite f64 as `null`, so the service sees a null
/// field and rejects the request — the failure surfaces as a `Failed` state,
/// never as a client-side panic.
pub fn coerce_number(raw: Option<&String>) -> f64 {
    raw.map(|s| s.trim().parse::<f64>().unwrap_or(f64::NAN))
        .unwrap_or(f64::NAN)
}

impl PredictForm {
    /// Collapse the near-identical screens into one payload: a form that
    /// fills any battery/grid/consumption field is the full dashboard, a
    /// coordinates-only form is the location screen, anything else is the
    /// duration screen.
    pub fn into_payload(self) -> PredictionPayload {
        let has_dashboard_fields = self.max_grid_power.is_some()
            || self.max_battery_capacity.is_some()
            || self.current_battery_capacity.is_some()
            || self.energy_consumption.is_some();

        if has_dashboard_fields {
            PredictionPayload::Dashboard(SimulationInput {
                latitude: coerce_number(self.latitude.as_ref()),
                longitude: coerce_number(self.longitude.as_ref()),
                max_grid_power: coerce_number(self.max_grid_power.as_ref()),
                max_battery_capacity: coerce_number(self.max_battery_capacity.as_ref()),
                current_battery_capacity: coerce_number(self.current_battery_capacity.as_ref()),
                energy_consumption: coerce_number(self.energy_consumption.as_ref()),
                duration_hours: coerce_number(self.duration_hours.as_ref()),
            })
        } else if self.latitude.is_some() || self.longitude.is_some() {
            PredictionPayload::Coordinates {
                latitude: coerce_number(self.latitude.as_ref()),
                longitude: coerce_number(self.longitude.as_ref()),
            }
        } else {
            PredictionPayload::Duration {
                duration_hours: coerce_number(self.duration_hours.as_ref()),
            }
        }
    }
}

// ─── Prediction service responses ────────────────────────────────────────────

/// Battery section of the full simulation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BatteryReport {
    /// Energy charged into the battery over the horizon (kWh)
    pub energy_to_battery: f64,
    /// Energy discharged from the battery (kWh)
    pub energy_from_battery: f64,
    /// Demand the simulation could not cover (kWh)
    pub unmet_energy: f64,
    /// Final state of charge, 0.0–1.0
    pub percentage: f64,
    pub status_message: String,
}

/// Full simulation result returned for the dashboard screen.
///
/// Both hourly series are chronological, one sample per simulated hour;
/// hour indices are 1-based when displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimulationResult {
    pub total_energy_generated: f64,
    pub battery: BatteryReport,
    pub hourly_generated_energy: Vec<f64>,
    pub hourly_battery_level: Vec<f64>,
}

/// Weather echo nested in the simple-screen response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherInputs {
    pub temperature_c: f64,
    pub direct_irradiance_wm2: f64,
    pub diffuse_irradiance_wm2: f64,
}

/// Reduced response shape used by the simple prediction screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SimplePrediction {
    /// Fraction of nominal power currently achievable, 0.0–1.0
    pub effective_power_fraction: f64,
    pub inputs: WeatherInputs,
}

/// The two response shapes the service can return, discriminated by field
/// presence (`total_energy_generated` vs `effective_power_fraction`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Dashboard(SimulationResult),
    Simple(SimplePrediction),
}

// ─── Request lifecycle state ──────────────────────────────────────────────────

/// Lifecycle of the one in-flight prediction request. Exactly one variant
/// holds at any instant; the snapshot holding it is replaced wholesale on
/// every transition, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "phase", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestState {
    Idle,
    Pending,
    Succeeded(PredictionOutcome),
    Failed(String),
}

impl RequestState {
    pub fn phase_name(&self) -> &'static str {
        match self {
            RequestState::Idle => "IDLE",
            RequestState::Pending => "PENDING",
            RequestState::Succeeded(_) => "SUCCEEDED",
            RequestState::Failed(_) => "FAILED",
        }
    }
}
