use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub server: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let info = state.dispatcher.info();
    Json(HealthStatus {
        status: "healthy".to_string(),
        server: info.name.clone(),
        version: info.version.clone(),
        timestamp: Utc::now(),
    })
}
