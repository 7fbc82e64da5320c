//! Fitted feature scaler
//!
//! JSON export of a fitted scikit-learn scaler:
//!
//! ```json
//! {
//!   "type": "standard",
//!   "feature_names": ["Road Length (km)", "Weather", "direction", "Congestion Level"],
//!   "mean": [...],
//!   "scale": [...]
//! }
//! ```
//!
//! `"type": "min_max"` carries `min` and `scale` instead of `mean`/`scale`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::artifact::Artifact;
use super::features::{check_feature_names, FeatureRow, FEATURE_COUNT};
use super::{InferenceError, InferenceResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalerParams {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,

    #[serde(flatten)]
    pub params: ScalerParams,
}

impl Scaler {
    pub fn load(path: impl AsRef<Path>) -> InferenceResult<(Self, Artifact)> {
        let artifact = Artifact::read(path)?;
        let scaler: Scaler = artifact.parse_json()?;
        scaler.validate()?;
        Ok((scaler, artifact))
    }

    pub fn from_json(json: &str) -> InferenceResult<Self> {
        let scaler: Scaler = serde_json::from_str(json)
            .map_err(|e| InferenceError::InvalidArtifact(format!("scaler: {}", e)))?;
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn kind(&self) -> &'static str {
        match self.params {
            ScalerParams::Standard { .. } => "standard",
            ScalerParams::MinMax { .. } => "min_max",
        }
    }

    fn validate(&self) -> InferenceResult<()> {
        if let Some(names) = &self.feature_names {
            check_feature_names(names)
                .map_err(|e| InferenceError::InvalidArtifact(format!("scaler: {}", e)))?;
        }

        let vectors: [(&str, &Vec<f64>); 2] = match &self.params {
            ScalerParams::Standard { mean, scale } => [("mean", mean), ("scale", scale)],
            ScalerParams::MinMax { min, scale } => [("min", min), ("scale", scale)],
        };

        for (name, values) in vectors {
            if values.len() != FEATURE_COUNT {
                return Err(InferenceError::InvalidArtifact(format!(
                    "scaler: {} has {} entries, expected {}",
                    name,
                    values.len(),
                    FEATURE_COUNT
                )));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(InferenceError::InvalidArtifact(format!(
                    "scaler: {} contains non-finite values",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn transform(&self, row: &FeatureRow) -> FeatureRow {
        let mut out = [0.0f64; FEATURE_COUNT];

        match &self.params {
            ScalerParams::Standard { mean, scale } => {
                for i in 0..FEATURE_COUNT {
                    // Constant features were fitted with scale 0; treat as 1.
                    let s = if scale[i] == 0.0 { 1.0 } else { scale[i] };
                    out[i] = (row.0[i] - mean[i]) / s;
                }
            }
            ScalerParams::MinMax { min, scale } => {
                for i in 0..FEATURE_COUNT {
                    out[i] = row.0[i] * scale[i] + min[i];
                }
            }
        }

        FeatureRow(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STANDARD: &str = r#"{
        "type": "standard",
        "feature_names": ["Road Length (km)", "Weather", "direction", "Congestion Level"],
        "mean": [10.0, 1.5, 0.5, 2.0],
        "scale": [5.0, 1.0, 0.5, 0.0]
    }"#;

    #[test]
    fn test_standard_transform() {
        let scaler = Scaler::from_json(STANDARD).unwrap();
        assert_eq!(scaler.kind(), "standard");

        let out = scaler.transform(&FeatureRow([20.0, 3.0, 1.0, 3.0]));
        assert_eq!(out.0, [2.0, 1.5, 1.0, 1.0]);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = Scaler::from_json(
            r#"{"type": "min_max", "min": [0.0, 0.0, 0.0, -0.5], "scale": [0.25, 0.5, 1.0, 0.5]}"#,
        )
        .unwrap();
        assert!(scaler.feature_names.is_none());

        let out = scaler.transform(&FeatureRow([2.0, 2.0, 1.0, 3.0]));
        assert_eq!(out.0, [0.5, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_rejects_wrong_feature_names() {
        let json = STANDARD.replace("\"Weather\", \"direction\"", "\"direction\", \"Weather\"");
        let err = Scaler::from_json(&json).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidArtifact(_)));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = Scaler::from_json(
            r#"{"type": "standard", "mean": [1.0, 2.0], "scale": [1.0, 1.0, 1.0, 1.0]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("mean has 2 entries"));
    }

    #[test]
    fn test_rejects_unknown_type() {
        assert!(Scaler::from_json(r#"{"type": "robust", "center": [], "scale": []}"#).is_err());
    }
}
