use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use roadsol_coach::config::AppConfig;
use roadsol_coach::location::LocationSearch;
use roadsol_coach::models::{MockTripRecord, TripEventTally};
use roadsol_coach::{coaching_message, report, tally_csv, telemetry, trip_mock};

#[derive(Parser)]
#[command(name = "roadsol-coach")]
#[command(about = "Driving safety coaching and demo trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Coach a single trip from its event tally and score
    Coach {
        #[arg(long, default_value_t = 0)]
        hard_brake: u32,
        #[arg(long, default_value_t = 0)]
        hard_accel: u32,
        #[arg(long, default_value_t = 0)]
        harsh_turn: u32,
        #[arg(long, default_value_t = 0)]
        phone_use: u32,
        #[arg(long, default_value_t = 0)]
        speeding: u32,
        #[arg(long)]
        score: f64,
    },
    /// Coach every row of a tally CSV
    CoachCsv {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Generate synthetic trips
    Mock {
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Generate synthetic trips and write a markdown report
    Report {
        #[arg(long, default_value_t = 10)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "trip-report.md")]
        out: PathBuf,
    },
    /// Look up locations by free text
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init(&config.log_level)?;

    match cli.command {
        Commands::Coach {
            hard_brake,
            hard_accel,
            harsh_turn,
            phone_use,
            speeding,
            score,
        } => {
            let events = TripEventTally {
                hard_brake_count: hard_brake,
                hard_accel_count: hard_accel,
                harsh_turn_count: harsh_turn,
                phone_use_count: phone_use,
                speeding_severity: speeding,
            };
            println!("{}", coaching_message(&events, score));
        }
        Commands::CoachCsv { csv } => {
            let tallies = tally_csv::read_scored_tallies_from_path(&csv)?;
            if tallies.is_empty() {
                println!("No tallies found in {}.", csv.display());
                return Ok(());
            }
            for (index, tally) in tallies.iter().enumerate() {
                println!(
                    "{}. score {:.1}: {}",
                    index + 1,
                    tally.score,
                    coaching_message(&tally.events, tally.score)
                );
            }
        }
        Commands::Mock { count, seed, json } => {
            let trips = generate(count, seed);
            if json {
                println!("{}", serde_json::to_string_pretty(&trips)?);
            } else {
                for trip in &trips {
                    println!(
                        "- score {:.1}, {} points, {}, {} | brakes {} accel {} turns {} phone {} speeding {}",
                        trip.safety_score,
                        trip.reward_points,
                        trip.duration_label(),
                        trip.distance_label(),
                        trip.events.hard_brake_count,
                        trip.events.hard_accel_count,
                        trip.events.harsh_turn_count,
                        trip.events.phone_use_count,
                        trip.events.speeding_severity
                    );
                }
            }
        }
        Commands::Report { count, seed, out } => {
            let trips = generate(count, seed);
            let report = report::build_report(&trips, chrono::Utc::now());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Search { query, limit } => {
            let limit = limit.unwrap_or(config.location.default_limit);
            let mut search = LocationSearch::from_config(&config.location)?;
            let result = search.search(&query, limit).await;

            if result.suggestions.is_empty() {
                println!("No locations matched '{query}'.");
                return Ok(());
            }

            println!("Results from {}:", result.source.as_str());
            for suggestion in &result.suggestions {
                println!(
                    "- {} ({:.4}, {:.4})",
                    suggestion.formatted_address,
                    suggestion.coordinates.latitude,
                    suggestion.coordinates.longitude
                );
            }
        }
    }

    Ok(())
}

fn generate(count: usize, seed: Option<u64>) -> Vec<MockTripRecord> {
    match seed {
        Some(seed) => trip_mock::generate_batch(&mut StdRng::seed_from_u64(seed), count),
        None => trip_mock::generate_batch(&mut rand::thread_rng(), count),
    }
}
