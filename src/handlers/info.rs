//! Service metadata handler

use axum::Json;

use crate::models::ServiceInfo;

pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}
