//! Feature Layout
//!
//! Column order the scaler and model were fitted on. Changing the order
//! silently corrupts predictions, so both artifacts are checked against
//! [`FEATURE_LAYOUT`] when they are loaded.

use crate::models::TravelInput;

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "Road Length (km)", // 0
    "Weather",          // 1
    "direction",        // 2
    "Congestion Level", // 3
];

pub const FEATURE_COUNT: usize = 4;

/// One model input row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow(pub [f64; FEATURE_COUNT]);

impl FeatureRow {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Named view, for logging
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<&TravelInput> for FeatureRow {
    fn from(input: &TravelInput) -> Self {
        FeatureRow([
            input.road_length_km,
            f64::from(input.weather.code()),
            f64::from(input.direction.code()),
            f64::from(input.congestion_level.code()),
        ])
    }
}

/// Check an artifact's recorded feature names against the layout
pub fn check_feature_names(names: &[String]) -> Result<(), String> {
    if names.len() != FEATURE_COUNT {
        return Err(format!(
            "expected {} features {:?}, artifact has {}: {:?}",
            FEATURE_COUNT,
            FEATURE_LAYOUT,
            names.len(),
            names
        ));
    }

    for (i, (expected, actual)) in FEATURE_LAYOUT.iter().zip(names).enumerate() {
        if *expected != actual.as_str() {
            return Err(format!(
                "feature {} is {:?}, expected {:?}",
                i, actual, expected
            ));
        }
    }

    Ok(())
}
