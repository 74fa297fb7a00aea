use serde::Serialize;

use crate::models::{Facility, Home, HomeCatalog};

pub const EARTH_RADIUS_MILES: f64 = 3959.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// `None` when either value is outside the valid degree range.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    pub fn of(facility: &Facility) -> Self {
        Self {
            latitude: facility.latitude,
            longitude: facility.longitude,
        }
    }
}

/// Where the visitor starts from, as given by the caller.
#[derive(Debug, Clone)]
pub enum Origin<'a> {
    Point(Coordinates),
    Query(&'a str),
}

#[derive(Debug, Clone, Serialize)]
pub struct NearestHome {
    pub nearest_home: String,
    pub home_key: Home,
    pub address: String,
    pub phone: String,
    pub distance: String,
    pub distance_miles: f64,
    pub duration: String,
    pub maps_url: String,
    pub coordinates: (f64, f64),
}

/// Great-circle distance in miles.
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Closest facility to `point`. On an exact tie the facility listed first wins.
pub fn nearest(facilities: &[Facility], point: Coordinates) -> Option<(&Facility, f64)> {
    let mut best: Option<(&Facility, f64)> = None;
    for facility in facilities {
        let distance = haversine_miles(point, Coordinates::of(facility));
        if best.map_or(true, |(_, min)| distance < min) {
            best = Some((facility, distance));
        }
    }
    best
}

/// Whole minutes to cover `distance` at `speed`. Both are taken as-is: the
/// catalog's distance is in miles while its speed is in km/h.
pub fn estimate_minutes(distance: f64, speed: f64) -> i64 {
    (distance / speed * 60.0) as i64
}

pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{minutes} minutes");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    let plural = if hours > 1 { "s" } else { "" };
    format!("{hours} hour{plural} {rest} minutes")
}

pub fn maps_url(origin: &Origin<'_>, destination: &Facility) -> String {
    let origin = match origin {
        Origin::Point(p) => format!("{},{}", p.latitude, p.longitude),
        Origin::Query(q) => urlencoding::encode(q).into_owned(),
    };
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={origin}&destination={},{}",
        destination.latitude, destination.longitude
    )
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn locate(catalog: &HomeCatalog, point: Coordinates, origin: &Origin<'_>) -> Option<NearestHome> {
    let (facility, distance) = nearest(catalog.facilities(), point)?;
    let minutes = estimate_minutes(distance, catalog.average_speed_kmh());
    let distance_miles = round_one_decimal(distance);

    Some(NearestHome {
        nearest_home: facility.name.clone(),
        home_key: facility.key,
        address: facility.address.clone(),
        phone: facility.phone.clone(),
        distance: format!("{distance_miles:.1} miles"),
        distance_miles,
        duration: format_duration(minutes),
        maps_url: maps_url(origin, facility),
        coordinates: (facility.latitude, facility.longitude),
    })
}
