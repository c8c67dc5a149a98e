pub mod chart_geometry;
pub mod prediction_client;
