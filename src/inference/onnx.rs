//! ONNX Runtime Integration
//!
//! Runs a regression model exported to ONNX (e.g. with skl2onnx). The graph
//! takes a single `[1, FEATURE_COUNT]` float tensor and the prediction is the
//! first element of its first output.

use ndarray::Array2;
use parking_lot::Mutex;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;

use super::features::{FeatureRow, FEATURE_COUNT};
use super::regressor::Regressor;
use super::{InferenceError, InferenceResult};

pub struct OnnxRegressor {
    /// `Session::run` needs exclusive access
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxRegressor {
    pub fn from_bytes(model_bytes: &[u8]) -> InferenceResult<Self> {
        tracing::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| InferenceError::Onnx(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Onnx(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| InferenceError::Onnx(format!("Load from memory error: {}", e)))?;

        if session.inputs.len() != 1 {
            return Err(InferenceError::InvalidArtifact(format!(
                "ONNX model has {} inputs, expected 1",
                session.inputs.len()
            )));
        }

        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::InvalidArtifact("ONNX model has no outputs".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn predict(&self, row: &FeatureRow) -> InferenceResult<f64> {
        let input_data: Vec<f32> = row.as_slice().iter().map(|v| *v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input_data)
            .map_err(|e| InferenceError::Onnx(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Onnx(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Onnx(format!("Inference failed: {}", e)))?;

        let output = outputs.get(&self.output_name)
            .ok_or_else(|| InferenceError::Onnx(format!("Missing output {}", self.output_name)))?;

        let (_, data) = output.try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Onnx(format!("Extract error: {}", e)))?;

        data.first()
            .map(|v| f64::from(*v))
            .ok_or_else(|| InferenceError::Onnx("Empty output tensor".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `Y = X · [2, 0.5, -1, 4]ᵀ + 10`, a MatMul + Add graph over a `[1, 4]` input
    const LINEAR_GRAPH: &[u8] = include_bytes!("../../testdata/linear.onnx");

    #[test]
    fn test_linear_graph_prediction() {
        let model = OnnxRegressor::from_bytes(LINEAR_GRAPH).unwrap();
        assert_eq!(model.kind(), "onnx");

        let y = model.predict(&FeatureRow([1.0, 2.0, 3.0, 0.5])).unwrap();
        assert_eq!(y, 12.0);

        let y = model.predict(&FeatureRow([0.0, 0.0, 0.0, 0.0])).unwrap();
        assert_eq!(y, 10.0);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = OnnxRegressor::from_bytes(b"definitely not a protobuf graph");
        assert!(matches!(result, Err(InferenceError::Onnx(_))));
    }
}
