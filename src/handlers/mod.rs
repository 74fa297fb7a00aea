pub mod bookings;
pub mod health;
pub mod locator;
pub mod slots;
pub mod stats;

use std::sync::Arc;

use axum::routing::{get, patch};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/test", get(health::test_connection))
        .route(
            "/book",
            get(bookings::book_info).post(bookings::create_booking),
        )
        .route("/bookings", get(bookings::list_bookings))
        .route("/bookings/:id/status", patch(bookings::update_status))
        .route("/available-slots", get(slots::available_slots))
        .route("/stats", get(stats::booking_stats))
        .route("/find-nearest-home", get(locator::find_nearest_home))
        .with_state(state)
}
