use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::HomeCatalog;
use crate::services::geocoding::Geocoder;
use crate::services::notification::Notifier;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub catalog: HomeCatalog,
    pub geocoder: Box<dyn Geocoder>,
    pub notifier: Notifier,
}

impl AppState {
    /// Locks the database. Do not hold the guard across an `.await`.
    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("database lock poisoned")))
    }
}
