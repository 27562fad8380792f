pub mod coach;
pub mod config;
pub mod location;
pub mod models;
pub mod report;
pub mod tally_csv;
pub mod telemetry;
pub mod trip_mock;

pub use coach::coaching_message;
pub use models::{MockTripRecord, TripEventTally};
pub use trip_mock::{generate_mock_trip, generate_random_trip};
