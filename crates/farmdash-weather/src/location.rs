//! Location normalization: canonical cache keys and provider query
//! parameters from heterogeneous location input.

use serde::{Deserialize, Serialize};

/// Location input as the UI collects it: free-text city/state/country,
/// or a postal code. A non-blank postal code takes precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

impl LocationQuery {
    pub fn city_state(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            state: Some(state.into()),
            ..Self::default()
        }
    }

    pub fn postal(postal_code: impl Into<String>) -> Self {
        Self {
            postal_code: Some(postal_code.into()),
            ..Self::default()
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Fallback location applied when a query carries no usable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDefaults {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Default for LocationDefaults {
    fn default() -> Self {
        Self {
            city: "Columbia".to_string(),
            state: "MO".to_string(),
            country: "US".to_string(),
        }
    }
}

/// Query parameters for the provider's location lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderParams {
    /// Free-text lookup: `q=City,State,Country`
    Query(String),
    /// Postal lookup: `zip=12345,Country`
    Zip(String),
}

impl ProviderParams {
    /// The provider query-string pair for this lookup.
    pub fn as_pair(&self) -> (&'static str, &str) {
        match self {
            ProviderParams::Query(q) => ("q", q),
            ProviderParams::Zip(z) => ("zip", z),
        }
    }
}

/// A normalized location: canonical cache key plus provider params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// Case-insensitive cache key, prefixed `postal:` or `city:`
    pub key: String,
    pub params: ProviderParams,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Normalize a location query into a canonical cache key and the
/// provider lookup parameters. Pure and infallible: an empty query
/// resolves to the configured defaults.
pub fn resolve(query: &LocationQuery, defaults: &LocationDefaults) -> ResolvedLocation {
    let country = non_blank(query.country.as_ref())
        .unwrap_or(defaults.country.trim())
        .to_string();

    if let Some(zip) = non_blank(query.postal_code.as_ref()) {
        let mut key = format!("postal:{}", zip.to_lowercase());
        let mut zip_param = zip.to_string();
        if !country.is_empty() {
            key.push_str(&format!(",{}", country.to_lowercase()));
            zip_param.push_str(&format!(",{}", country));
        }
        return ResolvedLocation {
            key,
            params: ProviderParams::Zip(zip_param),
        };
    }

    // Only fall back to the default city/state when the query names
    // neither; a caller-provided city must not inherit the default state.
    let (city, state) = match (
        non_blank(query.city.as_ref()),
        non_blank(query.state.as_ref()),
    ) {
        (None, None) => (defaults.city.trim().to_string(), defaults.state.trim().to_string()),
        (city, state) => (
            city.unwrap_or_default().to_string(),
            state.unwrap_or_default().to_string(),
        ),
    };

    let parts: Vec<&str> = [city.as_str(), state.as_str(), country.as_str()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();

    let key = format!(
        "city:{}",
        parts
            .iter()
            .map(|p| p.to_lowercase())
            .collect::<Vec<_>>()
            .join(",")
    );

    ResolvedLocation {
        key,
        params: ProviderParams::Query(parts.join(",")),
    }
}
