//! Planting advisories derived from a resolved forecast.
//!
//! Pure functions over [`DailySample`]s: condition-code to icon
//! mapping and threshold-based planting recommendations.

use serde::{Deserialize, Serialize};

use crate::types::DailySample;

/// Abstract icon category for a provider condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconCategory {
    Sun,
    Moon,
    CloudSun,
    CloudMoon,
    Cloud,
    CloudRain,
    CloudLightning,
    CloudSnow,
    CloudFog,
}

impl IconCategory {
    /// Icon asset name as the UI expects it.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::CloudSun => "cloud-sun",
            Self::CloudMoon => "cloud-moon",
            Self::Cloud => "cloud",
            Self::CloudRain => "cloud-rain",
            Self::CloudLightning => "cloud-lightning",
            Self::CloudSnow => "cloud-snow",
            Self::CloudFog => "cloud-fog",
        }
    }
}

/// Map a provider condition code to an icon category. Unknown codes
/// fall back to a plain cloud.
pub fn icon_category(condition_code: &str) -> IconCategory {
    match condition_code {
        "01d" => IconCategory::Sun,
        "01n" => IconCategory::Moon,
        "02d" => IconCategory::CloudSun,
        "02n" => IconCategory::CloudMoon,
        "03d" | "03n" | "04d" | "04n" => IconCategory::Cloud,
        "09d" | "09n" | "10d" | "10n" => IconCategory::CloudRain,
        "11d" | "11n" => IconCategory::CloudLightning,
        "13d" | "13n" => IconCategory::CloudSnow,
        "50d" | "50n" => IconCategory::CloudFog,
        _ => IconCategory::Cloud,
    }
}

const AVG_TEMP_TOO_LOW: f64 = 10.0;
const AVG_TEMP_COOL: f64 = 15.0;
const PRECIP_HEAVY: f64 = 5.0;
const PRECIP_MODERATE: f64 = 2.0;

/// Planting recommendation from average temperature and total
/// precipitation over the forecast. Rules are evaluated in order;
/// first match wins.
pub fn planting_recommendation(forecast: &[DailySample]) -> &'static str {
    let avg_temp = if forecast.is_empty() {
        0.0
    } else {
        forecast.iter().map(|d| f64::from(d.temperature)).sum::<f64>() / forecast.len() as f64
    };
    let total_precipitation: f64 = forecast.iter().map(|d| d.precipitation).sum();

    if avg_temp < AVG_TEMP_TOO_LOW {
        "Soil temperature too low. Wait for warmer conditions before planting."
    } else if avg_temp < AVG_TEMP_COOL {
        "Cool conditions. Consider waiting for soil to warm up for optimal germination."
    } else if total_precipitation > PRECIP_HEAVY {
        "Heavy rain expected. Delay planting to avoid soil compaction."
    } else if total_precipitation > PRECIP_MODERATE {
        "Moderate rainfall expected. Good conditions for planting after rain."
    } else {
        "Favorable conditions for planting. Monitor soil moisture levels."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(temperature: i32, precipitation: f64) -> DailySample {
        DailySample {
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            temperature,
            condition_code: "01d".to_string(),
            description: "clear sky".to_string(),
            humidity: 50,
            wind_speed: 3.0,
            precipitation,
        }
    }

    #[test]
    fn test_icon_table() {
        assert_eq!(icon_category("01d"), IconCategory::Sun);
        assert_eq!(icon_category("01n"), IconCategory::Moon);
        assert_eq!(icon_category("02d"), IconCategory::CloudSun);
        assert_eq!(icon_category("04n"), IconCategory::Cloud);
        assert_eq!(icon_category("10d"), IconCategory::CloudRain);
        assert_eq!(icon_category("11d"), IconCategory::CloudLightning);
        assert_eq!(icon_category("13n"), IconCategory::CloudSnow);
        assert_eq!(icon_category("50d"), IconCategory::CloudFog);
    }

    #[test]
    fn test_icon_unknown_code_defaults_to_cloud() {
        assert_eq!(icon_category("unknown-code"), IconCategory::Cloud);
        assert_eq!(icon_category(""), IconCategory::Cloud);
    }

    #[test]
    fn test_icon_names_match_ui_assets() {
        assert_eq!(IconCategory::CloudLightning.name(), "cloud-lightning");
        assert_eq!(IconCategory::Sun.name(), "sun");
    }

    #[test]
    fn test_cold_forecast() {
        let rec = planting_recommendation(&[day(5, 0.0)]);
        assert!(rec.contains("too low"));
    }

    #[test]
    fn test_cool_forecast() {
        let rec = planting_recommendation(&[day(12, 0.0)]);
        assert!(rec.contains("Cool conditions"));
    }

    #[test]
    fn test_heavy_rain() {
        let rec = planting_recommendation(&[day(20, 6.0)]);
        assert!(rec.contains("Heavy rain"));
    }

    #[test]
    fn test_moderate_rain() {
        let rec = planting_recommendation(&[day(20, 1.5), day(20, 1.5)]);
        assert!(rec.contains("Moderate rainfall"));
    }

    #[test]
    fn test_favorable() {
        let rec = planting_recommendation(&[day(20, 0.0)]);
        assert!(rec.contains("Favorable"));
    }

    #[test]
    fn test_cold_wins_over_rain() {
        // First match wins: cold message even with heavy rain forecast
        let rec = planting_recommendation(&[day(4, 10.0)]);
        assert!(rec.contains("too low"));
    }

    #[test]
    fn test_empty_forecast_reads_as_cold() {
        let rec = planting_recommendation(&[]);
        assert!(rec.contains("too low"));
    }

    #[test]
    fn test_boundary_precipitation() {
        // Exactly 5mm is moderate, not heavy
        let rec = planting_recommendation(&[day(20, 5.0)]);
        assert!(rec.contains("Moderate rainfall"));
    }
}
