//! Forecast retrieval orchestration: resolve location, consult the
//! cache, call the provider, degrade to stale data on failure.

use tracing::instrument;

use crate::cache::{self, CacheInfo, ForecastCache};
use crate::error::WeatherError;
use crate::location::{self, LocationDefaults, LocationQuery, ResolvedLocation};
use crate::provider::OpenWeatherClient;
use crate::types::ForecastSnapshot;

/// Component-facing weather API: the UI hands it a location query and
/// gets back a unified forecast snapshot.
pub struct WeatherService {
    client: OpenWeatherClient,
    cache: ForecastCache,
    defaults: LocationDefaults,
}

impl WeatherService {
    pub fn new(client: OpenWeatherClient, cache: ForecastCache, defaults: LocationDefaults) -> Self {
        Self {
            client,
            cache,
            defaults,
        }
    }

    /// Fetch the forecast for a location.
    ///
    /// A cached snapshot for the same location younger than the
    /// freshness window is returned without any network call unless
    /// `force_refresh` is set. When the provider fails, any cached
    /// snapshot (even expired, even another location) is served
    /// instead; the error propagates only when the cache is empty.
    #[instrument(skip(self), level = "info")]
    pub async fn get_forecast(
        &self,
        query: &LocationQuery,
        force_refresh: bool,
    ) -> Result<ForecastSnapshot, WeatherError> {
        let resolved = location::resolve(query, &self.defaults);

        if !force_refresh {
            if let Some(entry) = self.cache.get() {
                if ForecastCache::is_valid(&entry, &resolved.key, cache::max_age()) {
                    tracing::debug!("Using cached forecast for {}", resolved.key);
                    return Ok(entry.snapshot);
                }
            }
        }

        match self.fetch_fresh(&resolved).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                // Availability over consistency: a stale snapshot for
                // whatever location was cached last beats an error.
                // The snapshot carries its own city/country label.
                if let Some(entry) = self.cache.get() {
                    tracing::warn!(
                        "Weather fetch for {} failed ({}); serving cached forecast for {}",
                        resolved.key,
                        e,
                        entry.location_key
                    );
                    Ok(entry.snapshot)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Two sequential provider calls, then cache and return.
    async fn fetch_fresh(
        &self,
        resolved: &ResolvedLocation,
    ) -> Result<ForecastSnapshot, WeatherError> {
        tracing::info!("Fetching fresh forecast for {}", resolved.key);

        let lookup = self.client.fetch_forecast(&resolved.params).await?;
        let current = self.client.fetch_current(&resolved.params).await?;

        let snapshot = ForecastSnapshot {
            city: lookup.city,
            country: lookup.country,
            forecast: lookup.days,
            current,
        };

        // A cache write failure is not worth failing the fetch over
        if let Err(e) = self.cache.put(snapshot.clone(), &resolved.key) {
            tracing::warn!("Failed to cache forecast: {}", e);
        }

        Ok(snapshot)
    }

    /// Remove the cached forecast.
    pub fn clear_cache(&self) -> Result<(), WeatherError> {
        self.cache.clear()
    }

    /// Cache status for UI display.
    pub fn cache_info(&self) -> CacheInfo {
        self.cache.info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CacheEntry, CurrentConditions};
    use chrono::{Duration, Utc};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_body(city: &str) -> serde_json::Value {
        json!({
            "list": [
                {
                    "dt": 1_711_976_400i64, // 2024-04-01 13:00 UTC
                    "main": { "temp": 19.6, "humidity": 52 },
                    "weather": [{ "description": "few clouds", "icon": "02d" }],
                    "wind": { "speed": 4.4 },
                    "rain": { "3h": 0.3 }
                }
            ],
            "city": { "name": city, "country": "US" }
        })
    }

    fn current_body() -> serde_json::Value {
        json!({
            "main": { "temp": 17.2, "humidity": 61 },
            "weather": [{ "description": "few clouds", "icon": "02d" }],
            "wind": { "speed": 5.0 }
        })
    }

    fn service(server: &MockServer, dir: &std::path::Path) -> WeatherService {
        WeatherService::new(
            OpenWeatherClient::new_with_base_url("test_key", "metric", &server.uri()),
            ForecastCache::new(dir),
            LocationDefaults::default(),
        )
    }

    fn seed_cache(dir: &std::path::Path, key: &str, city: &str, age_hours: i64) {
        let snapshot = ForecastSnapshot {
            city: city.to_string(),
            country: "US".to_string(),
            forecast: vec![],
            current: CurrentConditions {
                temperature: 11,
                condition_code: "04d".to_string(),
                description: "broken clouds".to_string(),
                humidity: 70,
                wind_speed: 6.0,
            },
        };
        let mut entry = CacheEntry::new(snapshot, key.to_string());
        entry.fetched_at = Utc::now() - Duration::hours(age_hours);
        std::fs::write(
            dir.join("weather_cache.json"),
            serde_json::to_string(&entry).unwrap(),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_fetch_builds_snapshot_and_caches_it() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Columbia,MO,US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Columbia")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;

        let service = service(&server, dir.path());
        let snapshot = service
            .get_forecast(&LocationQuery::default(), false)
            .await
            .unwrap();

        assert_eq!(snapshot.city, "Columbia");
        assert_eq!(snapshot.forecast.len(), 1);
        assert_eq!(snapshot.current.temperature, 17);

        let info = service.cache_info();
        assert!(info.is_cached);
        assert!(!info.is_expired);
    }

    #[tokio::test]
    async fn test_fresh_cache_short_circuits_network() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Columbia")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(1)
            .mount(&server)
            .await;

        let service = service(&server, dir.path());
        let query = LocationQuery::postal("65201");

        service.get_forecast(&query, false).await.unwrap();
        // Second call within the freshness window must be served from cache
        service.get_forecast(&query, false).await.unwrap();
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_fresh_cache() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        seed_cache(dir.path(), "city:columbia,mo,us", "Cached City", 1);

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Fresh City")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;

        let service = service(&server, dir.path());
        let snapshot = service
            .get_forecast(&LocationQuery::default(), true)
            .await
            .unwrap();

        assert_eq!(snapshot.city, "Fresh City");
    }

    #[tokio::test]
    async fn test_expired_cache_triggers_refetch() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        seed_cache(dir.path(), "city:columbia,mo,us", "Cached City", 13);

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Fresh City")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;

        let service = service(&server, dir.path());
        let snapshot = service
            .get_forecast(&LocationQuery::default(), false)
            .await
            .unwrap();

        assert_eq!(snapshot.city, "Fresh City");
    }

    #[tokio::test]
    async fn test_upstream_failure_falls_back_to_stale_cache() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        // Expired, and for a different location than the request
        seed_cache(dir.path(), "postal:65201,us", "Cached City", 20);

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let service = service(&server, dir.path());
        let snapshot = service
            .get_forecast(&LocationQuery::city_state("Columbia", "MO"), false)
            .await
            .unwrap();

        assert_eq!(snapshot.city, "Cached City");
    }

    #[tokio::test]
    async fn test_upstream_failure_with_empty_cache_propagates() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&server)
            .await;

        let service = service(&server, dir.path());
        let result = service
            .get_forecast(&LocationQuery::postal("00000"), false)
            .await;

        assert!(matches!(result, Err(WeatherError::LocationNotFound(_))));
    }

    #[tokio::test]
    async fn test_current_conditions_failure_also_falls_back() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        seed_cache(dir.path(), "city:columbia,mo,us", "Cached City", 2);

        // Forecast succeeds, current-conditions call fails
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Fresh City")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let service = service(&server, dir.path());
        let snapshot = service
            .get_forecast(&LocationQuery::default(), true)
            .await
            .unwrap();

        assert_eq!(snapshot.city, "Cached City");
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        seed_cache(dir.path(), "city:columbia,mo,us", "Cached City", 1);

        let service = service(&server, dir.path());
        assert!(service.cache_info().is_cached);

        service.clear_cache().unwrap();
        assert!(!service.cache_info().is_cached);
    }
}
