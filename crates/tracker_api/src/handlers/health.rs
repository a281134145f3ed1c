use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /api/health`. Answers without touching the database.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: tracker_core::core_version(),
    })
}
