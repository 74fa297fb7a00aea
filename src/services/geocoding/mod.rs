pub mod nominatim;

use async_trait::async_trait;

use super::locator::Coordinates;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service answered but knows no such place; `Err`
    /// when the service could not be reached or gave an unusable answer.
    async fn geocode(&self, query: &str) -> anyhow::Result<Option<Coordinates>>;
}
