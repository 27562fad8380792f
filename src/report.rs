use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::coach::ISSUE_RULES;
use crate::models::{EventSummary, MockTripRecord};

pub fn summarize_events(trips: &[MockTripRecord]) -> Vec<EventSummary> {
    let mut summaries: Vec<EventSummary> = ISSUE_RULES
        .iter()
        .map(|rule| {
            let total: u32 = trips.iter().map(|trip| (rule.reading)(&trip.events)).sum();
            let flagged_trips = trips
                .iter()
                .filter(|trip| rule.triggered(&trip.events))
                .count();
            EventSummary {
                label: rule.label,
                total,
                flagged_trips,
                avg_per_trip: if trips.is_empty() {
                    0.0
                } else {
                    total as f64 / trips.len() as f64
                },
            }
        })
        .collect();

    // Stable sort keeps table order for equal totals.
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

pub fn average_score(trips: &[MockTripRecord]) -> f64 {
    if trips.is_empty() {
        return 0.0;
    }
    trips.iter().map(|trip| trip.safety_score).sum::<f64>() / trips.len() as f64
}

pub fn build_report(trips: &[MockTripRecord], generated_at: DateTime<Utc>) -> String {
    let summaries = summarize_events(trips);
    let mut output = String::new();

    let _ = writeln!(output, "# Trip Safety Report");
    let _ = writeln!(
        output,
        "Generated {} for {} trips",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        trips.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");

    if trips.is_empty() {
        let _ = writeln!(output, "No trips recorded.");
    } else {
        let total_points: u64 = trips.iter().map(|trip| trip.reward_points as u64).sum();
        let total_distance: f64 = trips.iter().map(|trip| trip.distance_km).sum();
        let total_minutes: u32 = trips.iter().map(|trip| trip.duration_minutes).sum();
        let _ = writeln!(output, "- Average score: {:.1}", average_score(trips));
        let _ = writeln!(output, "- Reward points: {total_points}");
        let _ = writeln!(output, "- Distance: {total_distance:.1} km");
        let _ = writeln!(output, "- Time on the road: {total_minutes} min");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Event Mix");

    if trips.is_empty() {
        let _ = writeln!(output, "No trips recorded.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} total, flagged on {} trips (avg {:.1} per trip)",
                summary.label, summary.total, summary.flagged_trips, summary.avg_per_trip
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Trips");

    if trips.is_empty() {
        let _ = writeln!(output, "No trips recorded.");
    } else {
        for (index, trip) in trips.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. score {:.1}, {} points, {}, {}: {}",
                index + 1,
                trip.safety_score,
                trip.reward_points,
                trip.duration_label(),
                trip.distance_label(),
                trip.coaching()
            );
        }
    }

    let mut safest: Vec<(usize, &MockTripRecord)> = trips.iter().enumerate().collect();
    safest.sort_by(|a, b| {
        b.1.safety_score
            .partial_cmp(&a.1.safety_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let _ = writeln!(output);
    let _ = writeln!(output, "## Safest Trips");

    if safest.is_empty() {
        let _ = writeln!(output, "No trips recorded.");
    } else {
        for (index, trip) in safest.iter().take(3) {
            let _ = writeln!(
                output,
                "- Trip {} scored {:.1} over {}",
                index + 1,
                trip.safety_score,
                trip.distance_label()
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TripEventTally;
    use chrono::TimeZone;

    fn sample_trip(score: f64, brakes: u32, speeding: u32) -> MockTripRecord {
        MockTripRecord {
            safety_score: score,
            reward_points: crate::trip_mock::reward_points(score, 10.0),
            duration_minutes: 20,
            distance_km: 10.0,
            events: TripEventTally {
                hard_brake_count: brakes,
                speeding_severity: speeding,
                ..TripEventTally::default()
            },
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn summaries_sort_by_total_and_count_flagged_trips() {
        let trips = vec![sample_trip(6.0, 3, 1), sample_trip(8.5, 1, 0)];
        let summaries = summarize_events(&trips);

        assert_eq!(summaries[0].label, "hard braking");
        assert_eq!(summaries[0].total, 4);
        assert_eq!(summaries[0].flagged_trips, 1);
        assert!((summaries[0].avg_per_trip - 2.0).abs() < 1e-9);
        assert_eq!(summaries[1].label, "speeding");
        assert_eq!(summaries[1].flagged_trips, 0);
    }

    #[test]
    fn equal_totals_keep_issue_order() {
        let summaries = summarize_events(&[]);
        let labels: Vec<&str> = summaries.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec!["speeding", "hard braking", "hard acceleration", "phone use", "harsh turning"]
        );
    }

    #[test]
    fn report_lists_trips_with_coaching() {
        let trips = vec![sample_trip(6.0, 3, 0), sample_trip(9.0, 0, 0)];
        let report = build_report(&trips, generated_at());

        assert!(report
            .starts_with("# Trip Safety Report\nGenerated 2026-03-14 09:30 UTC for 2 trips"));
        assert!(report.contains("- Average score: 7.5"));
        assert!(report.contains(
            "1. score 6.0, 30 points, 20 min, 10.0 km: You're on the right track. \
             Avoid sudden braking by increasing following distance."
        ));
        assert!(report.contains("## Safest Trips\n- Trip 2 scored 9.0 over 10.0 km"));
    }

    #[test]
    fn empty_report_explains_missing_data() {
        let report = build_report(&[], generated_at());
        assert_eq!(report.matches("No trips recorded.").count(), 4);
    }
}
