//! Free-text location search across several geocoding backends.
//!
//! Providers are tried in priority order; failures and empty answers fall
//! through to the next one and finally to a built-in table of known places.

mod cache;
mod providers;

use chrono::{DateTime, Utc};

use crate::config::LocationSearchConfig;
use crate::models::{SearchResult, SearchSource};

pub use cache::SearchCache;
pub use providers::{
    http_client, GeocodingProvider, GooglePlacesProvider, NominatimProvider,
    StaticFallbackProvider, USER_AGENT,
};

const MIN_QUERY_CHARS: usize = 2;

pub struct LocationSearch {
    providers: Vec<Box<dyn GeocodingProvider>>,
    fallback: StaticFallbackProvider,
    cache: SearchCache,
}

impl LocationSearch {
    pub fn new(providers: Vec<Box<dyn GeocodingProvider>>, cache: SearchCache) -> Self {
        Self {
            providers,
            fallback: StaticFallbackProvider,
            cache,
        }
    }

    /// Google (when a key is configured) then Nominatim.
    pub fn from_config(config: &LocationSearchConfig) -> anyhow::Result<Self> {
        let client = http_client()?;
        let mut providers: Vec<Box<dyn GeocodingProvider>> = Vec::new();

        if let Some(api_key) = &config.google_api_key {
            providers.push(Box::new(GooglePlacesProvider::new(
                client.clone(),
                &config.google_base_url,
                api_key,
                &config.country_code,
            )));
        }
        providers.push(Box::new(NominatimProvider::new(
            client,
            &config.nominatim_base_url,
            &config.country_code,
        )));

        tracing::debug!(providers = providers.len(), "location search configured");
        Ok(Self::new(
            providers,
            SearchCache::new(config.cache_ttl, config.cache_capacity),
        ))
    }

    pub async fn search(&mut self, query: &str, limit: usize) -> SearchResult {
        self.search_at(query, limit, Utc::now()).await
    }

    pub async fn search_at(
        &mut self,
        query: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> SearchResult {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return SearchResult::empty(SearchSource::Fallback);
        }

        // Keyed on the limit too, so a short answer never serves a longer request.
        let key = format!("{}|{limit}", trimmed.to_lowercase());
        if let Some(cached) = self.cache.get(&key, now) {
            tracing::debug!(query = %key, source = cached.source.as_str(), "location cache hit");
            return cached;
        }

        let result = self.query_providers(trimmed, limit).await;
        self.cache.insert(key, result.clone(), now);
        result
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    async fn query_providers(&self, query: &str, limit: usize) -> SearchResult {
        for provider in &self.providers {
            let source = provider.source();
            match provider.search(query, limit).await {
                Ok(mut suggestions) if !suggestions.is_empty() => {
                    suggestions.truncate(limit);
                    tracing::info!(
                        source = source.as_str(),
                        count = suggestions.len(),
                        "location search answered"
                    );
                    return SearchResult {
                        suggestions,
                        source,
                    };
                }
                Ok(_) => {
                    tracing::debug!(
                        source = source.as_str(),
                        "location provider returned nothing"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        source = source.as_str(),
                        error = %format!("{err:#}"),
                        "location provider failed"
                    );
                }
            }
        }

        SearchResult {
            suggestions: self.fallback.lookup(query, limit),
            source: SearchSource::Fallback,
        }
    }
}
