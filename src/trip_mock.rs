use rand::Rng;

use crate::models::{MockTripRecord, TripEventTally};

const BASE_SCORE: f64 = 9.5;
const MIN_SCORE: f64 = 2.5;
const MAX_SCORE: f64 = 10.0;
const SCORE_NOISE: f64 = 0.3;

pub const MIN_DURATION_MINUTES: u32 = 8;
pub const MAX_DURATION_MINUTES: u32 = 46;
pub const MIN_DISTANCE_KM: f64 = 2.0;
pub const MAX_DISTANCE_KM: f64 = 20.0;

/// Draws an integer in `[min, max]` by raising a uniform sample to `bias`
/// before rescaling. Exponents above 1 push mass toward `min`, below 1
/// toward `max`. The exponent is clamped to `[0.01, 3]`; swapped bounds
/// are reordered.
pub fn sample_skewed_int<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32, bias: f64) -> u32 {
    let (low, high) = (min.min(max), min.max(max));
    let bias = if bias.is_nan() { 1.0 } else { bias.clamp(0.01, 3.0) };
    let u: f64 = rng.gen();
    let value = low as f64 + (high - low) as f64 * u.powf(bias);
    (value.round() as u32).clamp(low, high)
}

pub fn sample_events<R: Rng + ?Sized>(rng: &mut R) -> TripEventTally {
    let hard_brake_count = sample_skewed_int(rng, 0, 4, 0.65);
    let hard_accel_count = sample_skewed_int(rng, 0, 4, 0.65);
    let harsh_turn_count = sample_skewed_int(rng, 0, 4, 0.70);
    let phone_use_count = sample_skewed_int(rng, 0, 4, 0.70);
    let speeding_severity = sample_skewed_int(rng, 0, 5, 0.60).clamp(0, 5);

    TripEventTally {
        hard_brake_count,
        hard_accel_count,
        harsh_turn_count,
        phone_use_count,
        speeding_severity,
    }
}

pub fn event_penalty(events: &TripEventTally) -> f64 {
    events.hard_brake_count as f64 * 0.8
        + events.hard_accel_count as f64 * 0.6
        + events.harsh_turn_count as f64 * 0.5
        + events.phone_use_count as f64 * 0.7
        + events.speeding_severity as f64 * 0.9
}

pub fn reward_points(safety_score: f64, distance_km: f64) -> u32 {
    (safety_score * (distance_km / 2.0)).round().max(0.0) as u32
}

pub fn generate_mock_trip<R: Rng + ?Sized>(rng: &mut R) -> MockTripRecord {
    let duration_minutes = rng.gen_range(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES);
    let raw_distance = MIN_DISTANCE_KM + rng.gen::<f64>() * (MAX_DISTANCE_KM - MIN_DISTANCE_KM);
    // Rounding 19.95.. up would reach the exclusive upper bound.
    let distance_km = round_tenth(raw_distance).min(MAX_DISTANCE_KM - 0.1);

    let events = sample_events(rng);
    let noise = rng.gen::<f64>() * (2.0 * SCORE_NOISE) - SCORE_NOISE;
    let raw_score = BASE_SCORE - event_penalty(&events) + noise;
    let safety_score = round_tenth(raw_score.clamp(MIN_SCORE, MAX_SCORE));

    let record = MockTripRecord {
        safety_score,
        reward_points: reward_points(safety_score, distance_km),
        duration_minutes,
        distance_km,
        events,
    };
    tracing::trace!(?record, "mock trip generated");
    record
}

pub fn generate_random_trip() -> MockTripRecord {
    generate_mock_trip(&mut rand::thread_rng())
}

pub fn generate_batch<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<MockTripRecord> {
    (0..count).map(|_| generate_mock_trip(rng)).collect()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_fields_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for trip in generate_batch(&mut rng, 10_000) {
            assert!((8..=46).contains(&trip.duration_minutes));
            assert!(trip.distance_km >= 2.0 && trip.distance_km < 20.0);
            assert!(trip.safety_score >= 2.5 && trip.safety_score <= 10.0);
            assert!(trip.events.hard_brake_count <= 4);
            assert!(trip.events.hard_accel_count <= 4);
            assert!(trip.events.harsh_turn_count <= 4);
            assert!(trip.events.phone_use_count <= 4);
            assert!(trip.events.speeding_severity <= 5);
        }
    }

    #[test]
    fn reward_points_recompute_exactly() {
        let mut rng = StdRng::seed_from_u64(11);
        for trip in generate_batch(&mut rng, 2_000) {
            let expected = (trip.safety_score * trip.distance_km / 2.0).round().max(0.0) as u32;
            assert_eq!(trip.reward_points, expected);
        }
    }

    #[test]
    fn score_and_distance_have_one_decimal() {
        let mut rng = StdRng::seed_from_u64(3);
        for trip in generate_batch(&mut rng, 500) {
            let score_tenths = trip.safety_score * 10.0;
            let distance_tenths = trip.distance_km * 10.0;
            assert!((score_tenths - score_tenths.round()).abs() < 1e-9);
            assert!((distance_tenths - distance_tenths.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let first = generate_batch(&mut StdRng::seed_from_u64(42), 20);
        let second = generate_batch(&mut StdRng::seed_from_u64(42), 20);
        assert_eq!(first, second);
    }

    #[test]
    fn fields_show_variance() {
        let trips = generate_batch(&mut StdRng::seed_from_u64(99), 1_000);
        let distinct = |values: Vec<i64>| {
            let mut values = values;
            values.sort_unstable();
            values.dedup();
            values.len()
        };

        assert!(distinct(trips.iter().map(|t| t.duration_minutes as i64).collect()) > 20);
        assert!(distinct(trips.iter().map(|t| (t.distance_km * 10.0) as i64).collect()) > 50);
        assert!(distinct(trips.iter().map(|t| (t.safety_score * 10.0) as i64).collect()) > 10);
        assert_eq!(distinct(trips.iter().map(|t| t.events.hard_brake_count as i64).collect()), 5);
        assert_eq!(distinct(trips.iter().map(|t| t.events.speeding_severity as i64).collect()), 6);
    }

    #[test]
    fn skewed_sampler_respects_bounds_and_exponent_clamp() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1_000 {
            assert!(sample_skewed_int(&mut rng, 0, 4, 0.0) <= 4);
            assert!(sample_skewed_int(&mut rng, 0, 4, 100.0) <= 4);
            let value = sample_skewed_int(&mut rng, 3, 7, 0.7);
            assert!((3..=7).contains(&value));
        }
    }

    #[test]
    fn swapped_bounds_and_nan_exponent_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..1_000 {
            let value = sample_skewed_int(&mut rng, 7, 3, 0.7);
            assert!((3..=7).contains(&value));
            let value = sample_skewed_int(&mut rng, 3, 7, f64::NAN);
            assert!((3..=7).contains(&value));
        }
        assert_eq!(sample_skewed_int(&mut rng, 5, 5, 2.0), 5);
    }

    #[test]
    fn heavy_exponent_favours_minimum() {
        let mut rng = StdRng::seed_from_u64(8);
        let samples: Vec<u32> = (0..2_000)
            .map(|_| sample_skewed_int(&mut rng, 0, 4, 3.0))
            .collect();
        let zeros = samples.iter().filter(|&&v| v == 0).count();
        let fours = samples.iter().filter(|&&v| v == 4).count();
        assert!(zeros > 4 * fours);
    }

    #[test]
    fn penalty_weights_sum_per_field() {
        let events = TripEventTally {
            hard_brake_count: 1,
            hard_accel_count: 1,
            harsh_turn_count: 1,
            phone_use_count: 1,
            speeding_severity: 1,
        };
        assert!((event_penalty(&events) - 3.5).abs() < 1e-9);
        assert_eq!(reward_points(8.0, 10.0), 40);
        assert_eq!(reward_points(2.5, 2.0), 3);
    }
}
