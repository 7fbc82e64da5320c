//! Validated JSON body extractor

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::AppError;

/// JSON body that also runs `T::validate()`. Decoding and validation
/// failures both surface as [`AppError`] so clients get one error shape.
///
/// A request without a `Content-Type` header is still decoded as JSON.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !accepts_json(req.headers()) {
            return Err(AppError::ValidationError(
                "Expected a JSON request body".to_string(),
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let Json(value) = Json::<T>::from_bytes(&bytes)?;

        value.validate().map_err(|errors| {
            tracing::debug!("Rejected request body: {}", errors);
            AppError::from(errors)
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Missing header, `application/json`, or any `+json` media type
fn accepts_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return true;
    };

    let Ok(value) = value.to_str() else {
        return false;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}
