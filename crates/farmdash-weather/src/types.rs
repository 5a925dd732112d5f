use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Schema version for serialized cache entries. Bump when a field
/// change would make older cached JSON unreadable.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// One forecast sample per calendar day, selected from the provider's
/// 3-hourly samples (midday preferred).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySample {
    /// Calendar day, provider-local
    pub date: NaiveDate,
    /// Rounded temperature in the configured display unit
    pub temperature: i32,
    /// Opaque provider condition code (e.g. "10d")
    pub condition_code: String,
    pub description: String,
    /// Relative humidity percentage
    pub humidity: u8,
    pub wind_speed: f64,
    /// Accumulated precipitation for the day (mm)
    pub precipitation: f64,
}

/// Snapshot of current conditions at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: i32,
    pub condition_code: String,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// Unified forecast: provider-resolved location label, up to 5 daily
/// samples in chronological order, and current conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub city: String,
    pub country: String,
    pub forecast: Vec<DailySample>,
    pub current: CurrentConditions,
}

/// Cached forecast with its canonical location key and fetch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub version: u32,
    pub snapshot: ForecastSnapshot,
    pub location_key: String,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(snapshot: ForecastSnapshot, location_key: String) -> Self {
        Self {
            version: CACHE_SCHEMA_VERSION,
            snapshot,
            location_key,
            fetched_at: Utc::now(),
        }
    }

    /// Age of this entry relative to now.
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> ForecastSnapshot {
        ForecastSnapshot {
            city: "Columbia".to_string(),
            country: "US".to_string(),
            forecast: vec![],
            current: CurrentConditions {
                temperature: 21,
                condition_code: "01d".to_string(),
                description: "clear sky".to_string(),
                humidity: 40,
                wind_speed: 3.2,
            },
        }
    }

    #[test]
    fn test_cache_entry_carries_schema_version() {
        let entry = CacheEntry::new(sample_snapshot(), "city:columbia,mo,us".to_string());
        assert_eq!(entry.version, CACHE_SCHEMA_VERSION);
        assert!(entry.age().num_seconds() < 5);
    }

    #[test]
    fn test_snapshot_serde_roundtrip() {
        let entry = CacheEntry::new(sample_snapshot(), "postal:65201,us".to_string());
        let json = serde_json::to_string(&entry).unwrap();
        let back: CacheEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.location_key, "postal:65201,us");
        assert_eq!(back.snapshot.current.temperature, 21);
    }
}
