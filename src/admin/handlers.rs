use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use super::AdminState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct CacheSummary {
    pub entries: usize,
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

pub async fn get_cache(State(state): State<AdminState>) -> Json<CacheSummary> {
    Json(CacheSummary {
        entries: state.cache.len(),
    })
}

pub async fn invalidate_cache(State(state): State<AdminState>) -> StatusCode {
    state.cache.invalidate("admin");
    StatusCode::NO_CONTENT
}
