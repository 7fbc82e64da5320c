//! Service metadata model

use serde::Serialize;

pub const SERVICE_TITLE: &str = "Lagos Travel Time Prediction API";
pub const SERVICE_DESCRIPTION: &str =
    "Predicts inter-city travel time in Nigeria using road and environmental features.";
pub const API_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            title: SERVICE_TITLE,
            description: SERVICE_DESCRIPTION,
            version: API_VERSION,
            endpoints: vec!["GET /", "POST /predict-time", "GET /health"],
        }
    }
}
