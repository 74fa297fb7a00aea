use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

// GET /test
pub async fn test_connection(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let total = {
        let db = state.db()?;
        queries::count_bookings(&db)?
    };

    Ok(Json(serde_json::json!({
        "status": "connected",
        "message": "Backend is working!",
        "total_bookings": total,
    })))
}

// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}
