//! Inference Engine
//!
//! Loads the fitted scaler and regression model once at startup and turns a
//! validated [`TravelInput`](crate::models::TravelInput) into a prediction.
//!
//! ```text
//! TravelInput ─► FeatureRow ─► Scaler::transform ─► Regressor::predict ─► round(2)
//! ```

pub mod artifact;
pub mod features;
pub mod scaler;
pub mod regressor;
pub mod tree;
pub mod onnx;
pub mod predictor;

use std::path::PathBuf;

pub use predictor::{Predictor, PredictorStatus};

pub type InferenceResult<T> = Result<T, InferenceError>;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("ONNX runtime: {0}")]
    Onnx(String),

    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),
}
