use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, HomeCatalog};
use crate::services::notification::compose_confirmation;
use crate::services::validation::{validate_booking, BookingRequest};
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 500;

// GET /book
pub async fn book_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Tour booking endpoint ready",
        "methods": ["POST"],
        "required_fields": [
            "first_name", "email", "phone_number",
            "preferred_home", "preferred_date", "preferred_time"
        ],
        "optional_fields": ["last_name", "notes"],
    }))
}

// POST /book
#[derive(Serialize)]
pub struct CreateBookingResponse {
    success: bool,
    message: String,
    booking_id: i64,
    email_sent: bool,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidArgument(e.body_text()))?;

    let now = Utc::now();
    let new_booking = validate_booking(&request, now.date_naive()).map_err(AppError::Validation)?;

    let booking = {
        let db = state.db()?;
        queries::create_booking(&db, &new_booking, now.naive_utc())?
    };

    tracing::info!(
        booking_id = booking.id,
        home = booking.preferred_home.as_str(),
        date = %booking.preferred_date,
        "tour booking created"
    );

    let email = compose_confirmation(&booking, &state.catalog, &state.config.business_name);
    let email_sent = state.notifier.dispatch(email).await;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            success: true,
            message: "Tour booking submitted successfully!".to_string(),
            booking_id: booking.id,
            email_sent,
        }),
    ))
}

// GET /bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: i64,
    first_name: String,
    last_name: Option<String>,
    full_name: String,
    email: String,
    phone_number: String,
    preferred_home: String,
    home_display_name: String,
    preferred_date: String,
    preferred_time: String,
    notes: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl BookingResponse {
    fn new(b: Booking, catalog: &HomeCatalog) -> Self {
        Self {
            id: b.id,
            full_name: b.full_name(),
            home_display_name: catalog.label(b.preferred_home).to_string(),
            preferred_home: b.preferred_home.as_str().to_string(),
            preferred_date: b.preferred_date.format("%Y-%m-%d").to_string(),
            preferred_time: b.preferred_time.format("%H:%M").to_string(),
            status: b.status.as_str().to_string(),
            created_at: b.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            updated_at: b.updated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            first_name: b.first_name,
            last_name: b.last_name,
            email: b.email,
            phone_number: b.phone_number,
            notes: b.notes,
        }
    }
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let status_filter = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(s) => Some(BookingStatus::parse(s).ok_or_else(|| invalid_status(s))?),
    };
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let bookings = {
        let db = state.db()?;
        queries::list_bookings(&db, status_filter, limit)?
    };

    Ok(Json(
        bookings
            .into_iter()
            .map(|b| BookingResponse::new(b, &state.catalog))
            .collect(),
    ))
}

// PATCH /bookings/:id/status
#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(update) = payload.map_err(|e| AppError::InvalidArgument(e.body_text()))?;

    let db = state.db()?;
    if queries::get_booking_by_id(&db, id)?.is_none() {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }

    let requested = update.status.unwrap_or_default();
    let status = BookingStatus::parse(requested.trim()).ok_or_else(|| invalid_status(&requested))?;

    queries::update_booking_status(&db, id, status, Utc::now().naive_utc())?;
    drop(db);

    tracing::info!(booking_id = id, status = status.as_str(), "booking status updated");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Status updated to {}", status.as_str()),
        "booking_id": id,
        "new_status": status.as_str(),
    })))
}

fn invalid_status(given: &str) -> AppError {
    let valid: Vec<&str> = BookingStatus::ALL.iter().map(|s| s.as_str()).collect();
    AppError::InvalidArgument(format!(
        "Invalid status \"{given}\". Must be one of: {}",
        valid.join(", ")
    ))
}
