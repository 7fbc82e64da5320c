//! Regression models
//!
//! The model artifact is chosen by file extension:
//! - `.onnx` runs through ONNX Runtime ([`OnnxRegressor`])
//! - `.json` is a scikit-learn export tagged by `"type"`: `linear` or
//!   `tree_ensemble`

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::artifact::Artifact;
use super::features::{check_feature_names, FeatureRow, FEATURE_COUNT};
use super::onnx::OnnxRegressor;
use super::tree::TreeEnsemble;
use super::{InferenceError, InferenceResult};

/// A fitted model mapping one scaled feature row to a scalar
pub trait Regressor: Send + Sync {
    /// Short label for status output
    fn kind(&self) -> &'static str;

    fn predict(&self, row: &FeatureRow) -> InferenceResult<f64>;
}

/// JSON-exported models
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonModel {
    Linear(LinearRegressor),
    TreeEnsemble(TreeEnsemble),
}

/// Load the model artifact at `path`
pub fn load_regressor(path: impl AsRef<Path>) -> InferenceResult<(Box<dyn Regressor>, Artifact)> {
    let artifact = Artifact::read(path)?;

    let model: Box<dyn Regressor> = match artifact.extension().as_deref() {
        Some("onnx") => Box::new(OnnxRegressor::from_bytes(&artifact.bytes)?),
        Some("json") => match artifact.parse_json::<JsonModel>()? {
            JsonModel::Linear(linear) => {
                linear.validate()?;
                Box::new(linear)
            }
            JsonModel::TreeEnsemble(ensemble) => {
                ensemble.validate()?;
                Box::new(ensemble)
            }
        },
        other => {
            return Err(InferenceError::UnsupportedFormat(format!(
                "{} (extension {:?}, expected .json or .onnx)",
                artifact.path.display(),
                other.unwrap_or("")
            )))
        }
    };

    tracing::info!(
        path = %artifact.path.display(),
        kind = model.kind(),
        "Model loaded"
    );

    Ok((model, artifact))
}

// ============================================================================
// LINEAR
// ============================================================================

/// `intercept + Σ coefficients[i] * x[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Self {
        Self {
            feature_names: None,
            coefficients: coefficients.to_vec(),
            intercept,
        }
    }

    pub fn validate(&self) -> InferenceResult<()> {
        if let Some(names) = &self.feature_names {
            check_feature_names(names)
                .map_err(|e| InferenceError::InvalidArtifact(format!("linear model: {}", e)))?;
        }
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(InferenceError::InvalidArtifact(format!(
                "linear model has {} coefficients, expected {}",
                self.coefficients.len(),
                FEATURE_COUNT
            )));
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, row: &FeatureRow) -> InferenceResult<f64> {
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(row.as_slice())
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_linear_predict() {
        let model = LinearRegressor::new([2.0, 0.5, -1.0, 4.0], 10.0);
        let y = model.predict(&FeatureRow([1.0, 2.0, 3.0, 0.5])).unwrap();
        assert_eq!(y, 12.0);
    }

    #[test]
    fn test_load_linear_json() {
        let file = write_temp(
            ".json",
            r#"{
                "type": "linear",
                "feature_names": ["Road Length (km)", "Weather", "direction", "Congestion Level"],
                "coefficients": [1.0, 1.0, 1.0, 1.0],
                "intercept": 0.5
            }"#,
        );

        let (model, artifact) = load_regressor(file.path()).unwrap();
        assert_eq!(model.kind(), "linear");
        assert_eq!(artifact.sha256.len(), 64);
        assert_eq!(model.predict(&FeatureRow([1.0, 2.0, 3.0, 4.0])).unwrap(), 10.5);
    }

    #[test]
    fn test_load_tree_ensemble_json() {
        let file = write_temp(
            ".json",
            r#"{
                "type": "tree_ensemble",
                "aggregation": "sum",
                "base_score": 20.0,
                "learning_rate": 0.5,
                "trees": [{
                    "children_left": [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature": [0, -2, -2],
                    "threshold": [0.0, -2.0, -2.0],
                    "value": [0.0, -4.0, 6.0]
                }]
            }"#,
        );

        let (model, _) = load_regressor(file.path()).unwrap();
        assert_eq!(model.kind(), "tree_ensemble/sum");
        assert_eq!(model.predict(&FeatureRow([-1.0, 0.0, 0.0, 0.0])).unwrap(), 18.0);
        assert_eq!(model.predict(&FeatureRow([1.0, 0.0, 0.0, 0.0])).unwrap(), 23.0);
    }

    #[test]
    fn test_load_tree_ensemble_rejects_bad_tree() {
        let file = write_temp(
            ".json",
            r#"{
                "type": "tree_ensemble",
                "aggregation": "mean",
                "trees": [{
                    "children_left": [1, -1],
                    "children_right": [5, -1],
                    "feature": [0, -2],
                    "threshold": [0.0, -2.0],
                    "value": [0.0, 1.0]
                }]
            }"#,
        );
        let err = load_regressor(file.path()).err().unwrap();
        assert!(matches!(err, InferenceError::InvalidArtifact(_)));
    }

    #[test]
    fn test_load_onnx_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".onnx").tempfile().unwrap();
        file.write_all(include_bytes!("../../testdata/linear.onnx")).unwrap();

        let (model, artifact) = load_regressor(file.path()).unwrap();
        assert_eq!(model.kind(), "onnx");
        assert_eq!(artifact.extension().as_deref(), Some("onnx"));
        assert_eq!(model.predict(&FeatureRow([1.0, 2.0, 3.0, 0.5])).unwrap(), 12.0);
    }

    #[test]
    fn test_load_rejects_coefficient_mismatch() {
        let file = write_temp(".json", r#"{"type": "linear", "coefficients": [1.0], "intercept": 0.0}"#);
        let err = load_regressor(file.path()).err().unwrap();
        assert!(matches!(err, InferenceError::InvalidArtifact(_)));
    }

    #[test]
    fn test_load_rejects_pickle() {
        let file = write_temp(".pkl", "not a model");
        let err = load_regressor(file.path()).err().unwrap();
        assert!(matches!(err, InferenceError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_rejects_unknown_json_type() {
        let file = write_temp(".json", r#"{"type": "svr", "support_vectors": []}"#);
        let err = load_regressor(file.path()).err().unwrap();
        assert!(matches!(err, InferenceError::Parse { .. }));
    }
}
