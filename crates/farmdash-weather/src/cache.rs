//! Single-slot durable cache for the most recently fetched forecast.
//!
//! The slot is one JSON file in the client's config directory, so the
//! cache survives restarts but is never shared between clients.

use std::path::{Path, PathBuf};

use chrono::Duration;

use crate::error::WeatherError;
use crate::types::{CacheEntry, ForecastSnapshot, CACHE_SCHEMA_VERSION};

/// Freshness window for cached forecasts.
pub const MAX_CACHE_AGE_HOURS: i64 = 12;

/// Freshness window as a duration.
pub fn max_age() -> Duration {
    Duration::hours(MAX_CACHE_AGE_HOURS)
}

/// Cache status for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheInfo {
    pub is_cached: bool,
    pub age_hours: i64,
    pub is_expired: bool,
}

/// Single-slot store for the latest forecast. A fetch for a different
/// location overwrites the previous entry.
#[derive(Debug)]
pub struct ForecastCache {
    cache_path: PathBuf,
}

impl ForecastCache {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            cache_path: config_dir.join("weather_cache.json"),
        }
    }

    /// Read the cached entry, if any.
    ///
    /// Unreadable, corrupt, or version-mismatched files read as a miss
    /// rather than an error; a miss just triggers a refetch.
    pub fn get(&self) -> Option<CacheEntry> {
        let json = match std::fs::read_to_string(&self.cache_path) {
            Ok(json) => json,
            Err(_) => return None,
        };

        match serde_json::from_str::<CacheEntry>(&json) {
            Ok(entry) if entry.version == CACHE_SCHEMA_VERSION => Some(entry),
            Ok(entry) => {
                tracing::warn!(
                    "Discarding cached forecast with schema version {} (expected {})",
                    entry.version,
                    CACHE_SCHEMA_VERSION
                );
                None
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable forecast cache: {}", e);
                None
            }
        }
    }

    /// Store a snapshot under its location key, overwriting any
    /// existing entry. `fetched_at` is set to now.
    pub fn put(
        &self,
        snapshot: ForecastSnapshot,
        location_key: &str,
    ) -> Result<CacheEntry, WeatherError> {
        let entry = CacheEntry::new(snapshot, location_key.to_string());
        self.write(&entry)?;
        Ok(entry)
    }

    fn write(&self, entry: &CacheEntry) -> Result<(), WeatherError> {
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| WeatherError::Cache(format!("create cache dir: {}", e)))?;
        }
        let json = serde_json::to_string(entry)
            .map_err(|e| WeatherError::Cache(format!("serialize cache entry: {}", e)))?;
        std::fs::write(&self.cache_path, json)
            .map_err(|e| WeatherError::Cache(format!("write cache file: {}", e)))?;

        tracing::debug!(
            "Cached forecast for {} at {}",
            entry.location_key,
            self.cache_path.display()
        );
        Ok(())
    }

    /// Whether an entry can be reused for the given key and freshness
    /// window: same key and not older than `max_age`.
    pub fn is_valid(entry: &CacheEntry, location_key: &str, max_age: Duration) -> bool {
        entry.location_key == location_key && entry.age() <= max_age
    }

    /// Remove the cached entry.
    pub fn clear(&self) -> Result<(), WeatherError> {
        match std::fs::remove_file(&self.cache_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WeatherError::Cache(format!("remove cache file: {}", e))),
        }
    }

    /// Cache status against the fixed freshness window.
    pub fn info(&self) -> CacheInfo {
        match self.get() {
            Some(entry) => {
                let age = entry.age();
                CacheInfo {
                    is_cached: true,
                    age_hours: age.num_hours(),
                    is_expired: age > max_age(),
                }
            }
            None => CacheInfo {
                is_cached: false,
                age_hours: 0,
                is_expired: true,
            },
        }
    }
}
