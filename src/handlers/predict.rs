//! Travel time prediction handler

use axum::{extract::State, Json};

use crate::{AppState, AppResult};
use crate::middleware::ValidatedJson;
use crate::models::{TravelInput, TravelPrediction};

/// Predict travel time for one road segment
pub async fn predict_time(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TravelInput>,
) -> AppResult<Json<TravelPrediction>> {
    let prediction = state.predictor.predict(&input)?;
    Ok(Json(prediction))
}
