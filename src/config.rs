use std::env;
use std::str::FromStr;

use chrono::Duration;

const PLACEHOLDER_API_KEY: &str = "YOUR_GOOGLE_PLACES_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} is out of range, got '{value}'")]
    OutOfRange { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub location: LocationSearchConfig,
}

#[derive(Debug, Clone)]
pub struct LocationSearchConfig {
    /// `None` disables the Google Places provider.
    pub google_api_key: Option<String>,
    pub google_base_url: String,
    pub nominatim_base_url: String,
    pub country_code: String,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub default_limit: usize,
}

impl Default for LocationSearchConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            google_base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            nominatim_base_url: "https://nominatim.openstreetmap.org".to_string(),
            country_code: "my".to_string(),
            cache_ttl: Duration::minutes(5),
            cache_capacity: 100,
            default_limit: 5,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LocationSearchConfig::default();
        let text = |name: &str, default: String| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };

        let google_api_key = lookup("GOOGLE_PLACES_API_KEY")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty() && value != PLACEHOLDER_API_KEY);

        let cache_ttl_secs: i64 = parse_positive(&lookup, "LOCATION_CACHE_TTL_SECS", 300)?;
        let cache_ttl =
            Duration::try_seconds(cache_ttl_secs).ok_or_else(|| ConfigError::OutOfRange {
                name: "LOCATION_CACHE_TTL_SECS",
                value: cache_ttl_secs.to_string(),
            })?;
        let cache_capacity =
            parse_positive(&lookup, "LOCATION_CACHE_MAX", defaults.cache_capacity)?;
        let default_limit =
            parse_positive(&lookup, "LOCATION_SEARCH_LIMIT", defaults.default_limit)?;

        Ok(Self {
            log_level: text("ROADSOL_LOG_LEVEL", "info".to_string()),
            location: LocationSearchConfig {
                google_api_key,
                google_base_url: text("GOOGLE_PLACES_BASE_URL", defaults.google_base_url),
                nominatim_base_url: text("NOMINATIM_BASE_URL", defaults.nominatim_base_url),
                country_code: text("LOCATION_COUNTRY_CODE", defaults.country_code),
                cache_ttl,
                cache_capacity,
                default_limit,
            },
        })
    }
}

fn parse_positive<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}
