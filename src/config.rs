use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_timeout_seconds() -> u64 { 10 }

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub predictor: PredictorConfig,
    pub site: SiteDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictorConfig {
    /// Base URL of the external prediction service, e.g. http://127.0.0.1:5000
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Default site parameters used to prefill the dashboard form.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct SiteDefaults {
    pub latitude: f64,
    pub longitude: f64,
    pub max_grid_power_kw: f64,
    pub max_battery_capacity_kwh: f64,
    pub current_battery_capacity_kwh: f64,
    pub energy_consumption_kwh: f64,
    pub duration_hours: f64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
