use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::{Coordinates, LocationSuggestion, SearchSource};

pub const USER_AGENT: &str = "RoadSolSafe/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A geocoding backend that turns free text into suggestions.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    fn source(&self) -> SearchSource;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationSuggestion>>;
}

pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("failed to build http client")
}

#[derive(Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    description: String,
    place_id: String,
}

#[derive(Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<PlaceDetails>,
}

#[derive(Deserialize)]
struct PlaceDetails {
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Google Places autocomplete followed by a details lookup per prediction.
pub struct GooglePlacesProvider {
    client: Client,
    base_url: String,
    api_key: String,
    country_code: String,
}

impl GooglePlacesProvider {
    pub fn new(client: Client, base_url: &str, api_key: &str, country_code: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            country_code: country_code.to_string(),
        }
    }

    async fn details(&self, prediction: &Prediction) -> Result<Option<LocationSuggestion>> {
        let url = format!("{}/details/json", self.base_url);
        let details = self
            .client
            .get(&url)
            .query(&[
                ("place_id", prediction.place_id.as_str()),
                ("key", self.api_key.as_str()),
                ("fields", "geometry,formatted_address"),
            ])
            .send()
            .await
            .context("place details request failed")?
            .error_for_status()
            .context("place details bad status")?
            .json::<DetailsResponse>()
            .await
            .context("place details invalid json")?;

        if details.status != "OK" {
            return Ok(None);
        }

        let Some(PlaceDetails {
            formatted_address,
            geometry: Some(geometry),
        }) = details.result
        else {
            return Ok(None);
        };

        Ok(Some(LocationSuggestion {
            id: prediction.place_id.clone(),
            address: prediction.description.clone(),
            formatted_address: formatted_address.unwrap_or_else(|| prediction.description.clone()),
            coordinates: Coordinates {
                latitude: geometry.location.lat,
                longitude: geometry.location.lng,
            },
            place_id: Some(prediction.place_id.clone()),
        }))
    }
}

#[async_trait]
impl GeocodingProvider for GooglePlacesProvider {
    fn source(&self) -> SearchSource {
        SearchSource::Google
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationSuggestion>> {
        let url = format!("{}/autocomplete/json", self.base_url);
        let components = format!("country:{}", self.country_code);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("input", query),
                ("key", self.api_key.as_str()),
                ("types", "geocode"),
                ("components", components.as_str()),
            ])
            .send()
            .await
            .context("places autocomplete request failed")?
            .error_for_status()
            .context("places autocomplete bad status")?
            .json::<AutocompleteResponse>()
            .await
            .context("places autocomplete invalid json")?;

        if response.status != "OK" && response.status != "ZERO_RESULTS" {
            bail!("places autocomplete returned status {}", response.status);
        }

        let mut suggestions = Vec::new();
        for prediction in response.predictions.iter().take(limit) {
            match self.details(prediction).await {
                Ok(Some(suggestion)) => suggestions.push(suggestion),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        place_id = %prediction.place_id,
                        error = %format!("{err:#}"),
                        "skipping place without details"
                    );
                }
            }
        }

        Ok(suggestions)
    }
}

#[derive(Deserialize)]
struct NominatimPlace {
    place_id: Option<u64>,
    display_name: String,
    lat: String,
    lon: String,
}

/// OpenStreetMap Nominatim free-text search.
pub struct NominatimProvider {
    client: Client,
    base_url: String,
    country_code: String,
}

impl NominatimProvider {
    pub fn new(client: Client, base_url: &str, country_code: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            country_code: country_code.to_string(),
        }
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    fn source(&self) -> SearchSource {
        SearchSource::Nominatim
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationSuggestion>> {
        let url = format!("{}/search", self.base_url);
        let limit_param = limit.to_string();
        let places = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", limit_param.as_str()),
                ("countrycodes", self.country_code.as_str()),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .context("nominatim request failed")?
            .error_for_status()
            .context("nominatim bad status")?
            .json::<Vec<NominatimPlace>>()
            .await
            .context("nominatim invalid json")?;

        Ok(nominatim_suggestions(places))
    }
}

fn nominatim_suggestions(places: Vec<NominatimPlace>) -> Vec<LocationSuggestion> {
    places
        .into_iter()
        .enumerate()
        .filter_map(|(index, place)| {
            let coordinates = match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
                (Ok(latitude), Ok(longitude)) => Coordinates {
                    latitude,
                    longitude,
                },
                _ => {
                    tracing::warn!(
                        name = %place.display_name,
                        "nominatim place has invalid coordinates"
                    );
                    return None;
                }
            };
            let id = match place.place_id {
                Some(place_id) => format!("nominatim-{place_id}"),
                None => format!("nominatim-{index}"),
            };
            Some(LocationSuggestion {
                id,
                address: place.display_name.clone(),
                formatted_address: place.display_name,
                coordinates,
                place_id: None,
            })
        })
        .collect()
}

struct KnownPlace {
    name: &'static str,
    latitude: f64,
    longitude: f64,
}

const fn known(name: &'static str, latitude: f64, longitude: f64) -> KnownPlace {
    KnownPlace {
        name,
        latitude,
        longitude,
    }
}

const KNOWN_PLACES: [KnownPlace; 15] = [
    known("Kuala Lumpur City Centre", 3.1390, 101.6869),
    known("Petaling Jaya", 3.1073, 101.6085),
    known("Subang Jaya", 3.0438, 101.5806),
    known("Shah Alam", 3.0733, 101.5185),
    known("Klang", 3.0333, 101.4500),
    known("Kajang", 2.9927, 101.7909),
    known("Ampang", 3.1478, 101.7003),
    known("Cheras", 3.0833, 101.7500),
    known("Kepong", 3.2100, 101.6400),
    known("Wangsa Maju", 3.2000, 101.7300),
    known("Setapak", 3.2000, 101.7000),
    known("Gombak", 3.2500, 101.6500),
    known("Batu Caves", 3.2386, 101.6839),
    known("Selayang", 3.2500, 101.6500),
    known("Rawang", 3.3167, 101.5833),
];

/// Offline lookup over a fixed table of well-known places.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticFallbackProvider;

impl StaticFallbackProvider {
    pub fn lookup(&self, query: &str, limit: usize) -> Vec<LocationSuggestion> {
        let needle = query.trim().to_lowercase();
        KNOWN_PLACES
            .iter()
            .filter(|place| place.name.to_lowercase().contains(&needle))
            .take(limit)
            .enumerate()
            .map(|(index, place)| LocationSuggestion {
                id: format!("fallback-{index}"),
                address: place.name.to_string(),
                formatted_address: place.name.to_string(),
                coordinates: Coordinates {
                    latitude: place.latitude,
                    longitude: place.longitude,
                },
                place_id: None,
            })
            .collect()
    }
}

#[async_trait]
impl GeocodingProvider for StaticFallbackProvider {
    fn source(&self) -> SearchSource {
        SearchSource::Fallback
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LocationSuggestion>> {
        Ok(self.lookup(query, limit))
    }
}
