use anyhow::Result;

use farmdash_core::Config;
use farmdash_weather::{
    icon_category, planting_recommendation, ForecastCache, LocationDefaults, LocationQuery,
    OpenWeatherClient, WeatherService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    farmdash_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    tracing::info!("Farmdash started");

    let client = OpenWeatherClient::new(
        &config.weather.effective_api_key(),
        config.weather.units.as_query_value(),
    )?;
    let cache = ForecastCache::new(&config.config_dir);
    let defaults = LocationDefaults {
        city: config.weather.default_city.clone(),
        state: config.weather.default_state.clone(),
        country: config.weather.default_country.clone(),
    };
    let service = WeatherService::new(client, cache, defaults);

    // Location comes from the first CLI argument (city or postal code)
    let query = match std::env::args().nth(1) {
        Some(arg) if arg.chars().all(|c| c.is_ascii_digit()) => LocationQuery::postal(arg),
        Some(arg) => LocationQuery {
            city: Some(arg),
            ..LocationQuery::default()
        },
        None => LocationQuery::default(),
    };

    let snapshot = match service.get_forecast(&query, false).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };

    println!("Weather for {}, {}", snapshot.city, snapshot.country);
    println!(
        "Now: {}°  {}  ({}% humidity, {} m/s wind)",
        snapshot.current.temperature,
        snapshot.current.description,
        snapshot.current.humidity,
        snapshot.current.wind_speed
    );

    println!("\n5-day outlook:");
    for day in &snapshot.forecast {
        println!(
            "  {}  {:>3}°  [{}]  {}  ({:.1} mm)",
            day.date,
            day.temperature,
            icon_category(&day.condition_code).name(),
            day.description,
            day.precipitation
        );
    }

    println!("\nPlanting: {}", planting_recommendation(&snapshot.forecast));

    let info = service.cache_info();
    if info.is_cached {
        println!(
            "\nCache: {}h old{}",
            info.age_hours,
            if info.is_expired { " (expired)" } else { "" }
        );
    }

    Ok(())
}
