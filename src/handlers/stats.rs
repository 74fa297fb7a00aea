use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::services::stats::{collect_stats, BookingStats};
use crate::state::AppState;

// GET /stats
pub async fn booking_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookingStats>, AppError> {
    let db = state.db()?;
    Ok(Json(collect_stats(&db, &state.catalog)?))
}
