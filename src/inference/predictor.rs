//! Predictor - scaler + model held for the process lifetime

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{TravelInput, TravelPrediction};
use super::features::FeatureRow;
use super::regressor::{load_regressor, Regressor};
use super::scaler::Scaler;
use super::{InferenceError, InferenceResult};

/// Provenance of the loaded artifacts
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_kind: String,
    pub model_sha256: Option<String>,
    pub scaler_path: String,
    pub scaler_kind: String,
    pub scaler_sha256: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Metadata plus serving stats, for `/health`
#[derive(Debug, Clone, Serialize)]
pub struct PredictorStatus {
    #[serde(flatten)]
    pub metadata: ModelMetadata,
    pub prediction_count: u64,
    pub avg_latency_ms: f64,
}

pub struct Predictor {
    scaler: Scaler,
    model: Box<dyn Regressor>,
    metadata: ModelMetadata,
    prediction_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl Predictor {
    /// Load both artifacts from disk
    pub fn load(model_path: impl AsRef<Path>, scaler_path: impl AsRef<Path>) -> InferenceResult<Self> {
        let (scaler, scaler_artifact) = Scaler::load(scaler_path)?;
        tracing::info!(
            path = %scaler_artifact.path.display(),
            kind = scaler.kind(),
            "Scaler loaded"
        );

        let (model, model_artifact) = load_regressor(model_path)?;

        let metadata = ModelMetadata {
            model_path: model_artifact.path.display().to_string(),
            model_kind: model.kind().to_string(),
            model_sha256: Some(model_artifact.sha256),
            scaler_path: scaler_artifact.path.display().to_string(),
            scaler_kind: scaler.kind().to_string(),
            scaler_sha256: Some(scaler_artifact.sha256),
            loaded_at: Utc::now(),
        };

        Ok(Self::with_metadata(scaler, model, metadata))
    }

    /// Build from already-constructed parts
    pub fn new(scaler: Scaler, model: Box<dyn Regressor>) -> Self {
        let metadata = ModelMetadata {
            model_path: "<memory>".to_string(),
            model_kind: model.kind().to_string(),
            model_sha256: None,
            scaler_path: "<memory>".to_string(),
            scaler_kind: scaler.kind().to_string(),
            scaler_sha256: None,
            loaded_at: Utc::now(),
        };
        Self::with_metadata(scaler, model, metadata)
    }

    fn with_metadata(scaler: Scaler, model: Box<dyn Regressor>, metadata: ModelMetadata) -> Self {
        Self {
            scaler,
            model,
            metadata,
            prediction_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn predict(&self, input: &TravelInput) -> InferenceResult<TravelPrediction> {
        let start_time = Instant::now();

        let row = FeatureRow::from(input);
        let scaled = self.scaler.transform(&row);
        let raw = self.model.predict(&scaled)?;

        if !raw.is_finite() {
            return Err(InferenceError::NonFinite(raw));
        }

        let elapsed_us = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.prediction_count.fetch_add(1, Ordering::Relaxed);

        let predicted = round2(raw);
        tracing::debug!(
            features = ?row.named().collect::<Vec<_>>(),
            raw,
            predicted,
            elapsed_us,
            "Prediction"
        );

        Ok(TravelPrediction {
            predicted_travel_time_min: predicted,
        })
    }

    pub fn status(&self) -> PredictorStatus {
        let count = self.prediction_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f64 / count as f64) / 1000.0 } else { 0.0 };

        PredictorStatus {
            metadata: self.metadata.clone(),
            prediction_count: count,
            avg_latency_ms: avg,
        }
    }
}

/// Round to 2 decimals the way numpy rounds a float64: scale by 100, round
/// half to even, scale back.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
