use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::models::{ScoredTally, TripEventTally};

#[derive(Deserialize)]
struct CsvRow {
    hard_brake_count: u32,
    hard_accel_count: u32,
    harsh_turn_count: u32,
    phone_use_count: u32,
    speeding_severity: u32,
    score: f64,
}

pub fn read_scored_tallies<R: Read>(reader: R) -> anyhow::Result<Vec<ScoredTally>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut tallies = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let row = result.with_context(|| format!("invalid tally on line {}", index + 2))?;
        tallies.push(ScoredTally {
            events: TripEventTally {
                hard_brake_count: row.hard_brake_count,
                hard_accel_count: row.hard_accel_count,
                harsh_turn_count: row.harsh_turn_count,
                phone_use_count: row.phone_use_count,
                speeding_severity: row.speeding_severity,
            },
            score: row.score,
        });
    }

    tracing::debug!(rows = tallies.len(), "tallies imported");
    Ok(tallies)
}

pub fn read_scored_tallies_from_path(path: &Path) -> anyhow::Result<Vec<ScoredTally>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_scored_tallies(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "hard_brake_count,hard_accel_count,harsh_turn_count,phone_use_count,speeding_severity,score\n";

    #[test]
    fn parses_rows_in_order() {
        let data = format!("{HEADER}3,0,0,0,0,6.0\n0, 1, 0, 2, 4, 3.5\n");
        let tallies = read_scored_tallies(data.as_bytes()).unwrap();

        assert_eq!(tallies.len(), 2);
        assert_eq!(tallies[0].events.hard_brake_count, 3);
        assert_eq!(tallies[0].score, 6.0);
        assert_eq!(tallies[1].events.phone_use_count, 2);
        assert_eq!(tallies[1].events.speeding_severity, 4);
    }

    #[test]
    fn rejects_negative_counts_with_line_number() {
        let data = format!("{HEADER}0,0,0,0,0,9.0\n-1,0,0,0,0,9.0\n");
        let err = read_scored_tallies(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn header_only_yields_nothing() {
        let tallies = read_scored_tallies(HEADER.as_bytes()).unwrap();
        assert!(tallies.is_empty());
    }
}
