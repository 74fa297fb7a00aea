use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::locator::{self, Coordinates, NearestHome, Origin};
use crate::state::AppState;

// GET /find-nearest-home
#[derive(Deserialize)]
pub struct NearestQuery {
    pub location: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

pub async fn find_nearest_home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<NearestHome>, AppError> {
    let non_blank = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let location = non_blank(&query.location);
    let lat = non_blank(&query.lat);
    let lon = non_blank(&query.lon);

    let (point, origin) = match (lat, lon, location.as_deref()) {
        (Some(lat), Some(lon), _) => {
            let point = parse_coordinates(&lat, &lon)?;
            (point, Origin::Point(point))
        }
        (_, _, Some(location)) => {
            let point = match state.geocoder.geocode(location).await {
                Ok(Some(point)) => point,
                Ok(None) => {
                    return Err(AppError::NotFound(
                        "Location not found. Please try a different address or postcode."
                            .to_string(),
                    ));
                }
                Err(e) => {
                    tracing::warn!(error = %e, location, "geocoding failed");
                    return Err(AppError::ServiceUnavailable(format!(
                        "Geocoding service error: {e}"
                    )));
                }
            };
            (point, Origin::Query(location))
        }
        _ => {
            return Err(AppError::InvalidArgument(
                "Location parameter or both lat and lon parameters are required".to_string(),
            ));
        }
    };

    locator::locate(&state.catalog, point, &origin)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No homes found".to_string()))
}

fn parse_coordinates(lat: &str, lon: &str) -> Result<Coordinates, AppError> {
    let invalid = || AppError::InvalidArgument("Invalid latitude or longitude values".to_string());
    let lat: f64 = lat.parse().map_err(|_| invalid())?;
    let lon: f64 = lon.parse().map_err(|_| invalid())?;
    Coordinates::new(lat, lon).ok_or_else(invalid)
}
