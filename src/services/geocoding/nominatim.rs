use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::Geocoder;
use crate::services::locator::Coordinates;

pub struct NominatimGeocoder {
    url: String,
    country: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(
        url: String,
        country: String,
        user_agent: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("failed to build geocoding HTTP client")?;

        Ok(Self {
            url,
            country,
            client,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> anyhow::Result<Option<Coordinates>> {
        let places: Vec<Place> = self
            .client
            .get(&self.url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", self.country.as_str()),
            ])
            .send()
            .await
            .context("failed to call geocoding service")?
            .error_for_status()
            .context("geocoding service returned error")?
            .json()
            .await
            .context("failed to parse geocoding response")?;

        places.first().map(parse_place).transpose()
    }
}

fn parse_place(place: &Place) -> anyhow::Result<Coordinates> {
    let lat: f64 = place
        .lat
        .parse()
        .with_context(|| format!("invalid latitude from geocoder: {}", place.lat))?;
    let lon: f64 = place
        .lon
        .parse()
        .with_context(|| format!("invalid longitude from geocoder: {}", place.lon))?;

    Coordinates::new(lat, lon)
        .ok_or_else(|| anyhow::anyhow!("geocoder returned out-of-range coordinates: {lat},{lon}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nominatim_response() {
        let body = r#"[{"place_id":1,"lat":"51.4816","lon":"-3.1791","display_name":"Cardiff, Wales"}]"#;
        let places: Vec<Place> = serde_json::from_str(body).unwrap();
        let point = parse_place(&places[0]).unwrap();
        assert_eq!(point, Coordinates::new(51.4816, -3.1791).unwrap());
    }

    #[test]
    fn test_parse_bad_coordinates() {
        let place = Place {
            lat: "north".to_string(),
            lon: "-3.1".to_string(),
        };
        assert!(parse_place(&place).is_err());

        let place = Place {
            lat: "123.0".to_string(),
            lon: "-3.1".to_string(),
        };
        assert!(parse_place(&place).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_error() {
        let geocoder = NominatimGeocoder::new(
            "http://127.0.0.1:9/search".to_string(),
            "gb".to_string(),
            "tourbook-test",
            Duration::from_millis(500),
        )
        .unwrap();
        assert!(geocoder.geocode("Cardiff").await.is_err());
    }
}
