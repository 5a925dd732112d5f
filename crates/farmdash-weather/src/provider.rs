//! OpenWeather API client and response adapter.
//!
//! The provider's wire shapes stay private to this module; callers
//! only see the provider-agnostic domain types.

use chrono::{DateTime, Timelike};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::WeatherError;
use crate::location::ProviderParams;
use crate::types::{CurrentConditions, DailySample};

const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Forecast length cap in days.
pub const FORECAST_DAYS: usize = 5;

/// Midday window (inclusive hours) preferred when picking the day's
/// representative sample.
const MIDDAY_HOURS: std::ops::RangeInclusive<u32> = 12..=15;

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct ApiWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ApiRain {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastItem {
    dt: i64,
    main: ApiMain,
    weather: Vec<ApiWeather>,
    wind: ApiWind,
    rain: Option<ApiRain>,
}

impl ApiForecastItem {
    fn rain_amount(&self) -> f64 {
        self.rain
            .as_ref()
            .and_then(|r| r.three_hour)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize)]
struct ApiCity {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct ApiForecastResponse {
    list: Vec<ApiForecastItem>,
    city: ApiCity,
}

#[derive(Debug, Deserialize)]
struct ApiCurrentResponse {
    main: ApiMain,
    weather: Vec<ApiWeather>,
    wind: ApiWind,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Multi-day forecast lookup result: the provider-resolved location
/// label plus one sample per day.
#[derive(Debug, Clone)]
pub struct ForecastLookup {
    pub city: String,
    pub country: String,
    pub days: Vec<DailySample>,
}

pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    units: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: &str, units: &str) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            units: units.to_string(),
            base_url: OPENWEATHER_API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub fn new_with_base_url(api_key: &str, units: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            units: units.to_string(),
            base_url: base_url.to_string(),
        }
    }

    /// Fetch the multi-day forecast and reduce it to one sample per
    /// calendar day, capped at [`FORECAST_DAYS`].
    pub async fn fetch_forecast(
        &self,
        params: &ProviderParams,
    ) -> Result<ForecastLookup, WeatherError> {
        let url = format!("{}/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                params.as_pair(),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await?;

        let resp: ApiForecastResponse = Self::handle_response(response, params).await?;

        Ok(ForecastLookup {
            city: resp.city.name,
            country: resp.city.country,
            days: group_daily(&resp.list),
        })
    }

    /// Fetch current conditions.
    pub async fn fetch_current(
        &self,
        params: &ProviderParams,
    ) -> Result<CurrentConditions, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                params.as_pair(),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await?;

        let resp: ApiCurrentResponse = Self::handle_response(response, params).await?;
        let (code, description) = primary_condition(&resp.weather);

        Ok(CurrentConditions {
            temperature: resp.main.temp.round() as i32,
            condition_code: code,
            description,
            humidity: resp.main.humidity,
            wind_speed: resp.wind.speed,
        })
    }

    /// Classify API responses: 404 means the provider has no data for
    /// the location, anything else non-success is a generic upstream
    /// failure carrying the provider's message when parseable.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        params: &ProviderParams,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)));
        }

        let text = response.text().await.unwrap_or_default();
        let provider_message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|b| b.message);

        if status == reqwest::StatusCode::NOT_FOUND {
            let (_, location) = params.as_pair();
            Err(WeatherError::LocationNotFound(
                provider_message.unwrap_or_else(|| location.to_string()),
            ))
        } else {
            Err(WeatherError::Upstream(
                provider_message.unwrap_or_else(|| format!("HTTP {}", status)),
            ))
        }
    }
}

fn primary_condition(weather: &[ApiWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.icon.clone(), w.description.clone()))
        .unwrap_or_default()
}

/// Reduce 3-hourly samples to one per calendar day.
///
/// The representative sample is the first one whose hour falls in the
/// midday window, or the first seen for that day when none does.
/// Precipitation is accumulated across all of the day's samples.
fn group_daily(items: &[ApiForecastItem]) -> Vec<DailySample> {
    struct DayAccum<'a> {
        chosen: &'a ApiForecastItem,
        has_midday: bool,
        precipitation: f64,
    }

    let mut days: BTreeMap<chrono::NaiveDate, DayAccum> = BTreeMap::new();

    for item in items {
        let Some(ts) = DateTime::from_timestamp(item.dt, 0) else {
            continue;
        };
        let date = ts.date_naive();
        let is_midday = MIDDAY_HOURS.contains(&ts.hour());

        let accum = days.entry(date).or_insert(DayAccum {
            chosen: item,
            has_midday: is_midday,
            precipitation: 0.0,
        });
        accum.precipitation += item.rain_amount();
        if is_midday && !accum.has_midday {
            accum.chosen = item;
            accum.has_midday = true;
        }
    }

    days.into_iter()
        .take(FORECAST_DAYS)
        .map(|(date, accum)| {
            let (code, description) = primary_condition(&accum.chosen.weather);
            DailySample {
                date,
                temperature: accum.chosen.main.temp.round() as i32,
                condition_code: code,
                description,
                humidity: accum.chosen.main.humidity,
                wind_speed: accum.chosen.wind.speed,
                precipitation: accum.precipitation,
            }
        })
        .collect()
}
