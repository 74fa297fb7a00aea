use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Home;
use crate::services::slots;
use crate::state::AppState;

// GET /available-slots
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
    pub home: Option<String>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    available_slots: Vec<String>,
    date: String,
    home: String,
}

pub async fn available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = query.date.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let home = query.home.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let (Some(date_str), Some(home_str)) = (date, home) else {
        return Err(AppError::InvalidArgument(
            "Date and home parameters are required".to_string(),
        ));
    };

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
        AppError::InvalidArgument(format!("Invalid date \"{date_str}\", expected YYYY-MM-DD"))
    })?;
    let home = Home::parse(home_str)
        .ok_or_else(|| AppError::InvalidArgument(format!("Unknown home \"{home_str}\"")))?;

    let available = {
        let db = state.db()?;
        slots::available_slots(&db, &state.catalog, date, home)?
    };

    Ok(Json(SlotsResponse {
        available_slots: available
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect(),
        date: date.format("%Y-%m-%d").to_string(),
        home: home.as_str().to_string(),
    }))
}
