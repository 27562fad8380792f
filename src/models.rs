use serde::{Deserialize, Serialize};

/// Risky-behavior counters observed during one trip.
///
/// `speeding_severity` is a 0-5 bucket rather than an occurrence count, but
/// it is compared on the same scale as the other counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripEventTally {
    pub hard_brake_count: u32,
    pub hard_accel_count: u32,
    pub harsh_turn_count: u32,
    pub phone_use_count: u32,
    pub speeding_severity: u32,
}

/// Synthetic trip summary used as placeholder data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockTripRecord {
    pub safety_score: f64,
    pub reward_points: u32,
    pub duration_minutes: u32,
    pub distance_km: f64,
    pub events: TripEventTally,
}

impl MockTripRecord {
    pub fn duration_label(&self) -> String {
        format!("{} min", self.duration_minutes)
    }

    pub fn distance_label(&self) -> String {
        format!("{:.1} km", self.distance_km)
    }

    pub fn coaching(&self) -> String {
        crate::coach::coaching_message(&self.events, self.safety_score)
    }
}

/// A tally paired with the score it was recorded under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTally {
    pub events: TripEventTally,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct EventSummary {
    pub label: &'static str,
    pub total: u32,
    pub flagged_trips: usize,
    pub avg_per_trip: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    /// Google Places.
    Google,
    /// OpenStreetMap Nominatim.
    Nominatim,
    /// A geocoder running on the host device.
    Device,
    /// Built-in table of well-known places.
    Fallback,
}

impl SearchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSource::Google => "google",
            SearchSource::Nominatim => "nominatim",
            SearchSource::Device => "device",
            SearchSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub id: String,
    pub address: String,
    pub formatted_address: String,
    pub coordinates: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub suggestions: Vec<LocationSuggestion>,
    pub source: SearchSource,
}

impl SearchResult {
    pub fn empty(source: SearchSource) -> Self {
        Self {
            suggestions: Vec::new(),
            source,
        }
    }
}
