//! The optimal Metro-North station to depart from: driving time to each
//! station plus the scheduled train ride, ranked by the total. Writes
//! optimal_metro_north_trip.csv and prints the recommendation.

use anyhow::Context;
use chrono::NaiveDate;

use mnr_optimizer::drive::RoutingClient;
use mnr_optimizer::output::{self, RankedTripRecord};
use mnr_optimizer::time::TimeOfDay;
use mnr_optimizer::{feeds, prompt, ranking, schedule, DESTINATION_NAME};

const OUTPUT_FILE: &str = "optimal_metro_north_trip.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let address = prompt("Enter your starting address")?;
    let date_str = prompt("Enter target date (YYYY-MM-DD)")?;
    let time_str = prompt("Enter target arrival time at Grand Central (HH:MM, 24-hour)")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").context("parsing target date")?;
    let target_arrival = TimeOfDay::parse_hhmm(&time_str)
        .with_context(|| format!("invalid time of day {time_str:?}"))?;

    println!("\nCalculating best Metro-North station for arrival by {time_str} on {date_str}...");
    println!("Geocoding your address and computing driving times...\n");

    let router = RoutingClient::new()?;
    let origin = router.geocode(&address)?;

    let tables = feeds::fetch_schedule()?;
    let legs = schedule::best_trains(&tables, date, target_arrival, DESTINATION_NAME)?;
    let ranking = ranking::rank_stations(&legs, &tables, origin, &router);

    println!("Recommended routes (sorted by total travel time):");
    for trip in ranking.trips.iter().take(10) {
        println!(
            "{:<28} {:<12} drive {:>5.1} min  train {:>5.1} min  total {:>6.1} min",
            trip.station, trip.line, trip.drive_minutes, trip.train_minutes, trip.total_minutes
        );
    }
    if !ranking.dropped.is_empty() {
        println!(
            "\n{} station(s) dropped (no driving route or missing coordinates).",
            ranking.dropped.len()
        );
    }

    let records: Vec<RankedTripRecord> = ranking.trips.iter().map(RankedTripRecord::from).collect();
    output::write_csv(OUTPUT_FILE, &records)?;
    println!("\nSaved full results to {OUTPUT_FILE}");

    if let Some(best) = ranking.recommended() {
        println!("\nBest Option:");
        println!("  Station: {} ({})", best.station, best.line);
        println!("  Drive time: {:.1} min", best.drive_minutes);
        println!("  Train time: {:.1} min", best.train_minutes);
        println!("  Total travel: {:.1} min", best.total_minutes);
        println!(
            "  Depart station by: {} -> Arrive Grand Central at {}",
            best.scheduled_departure, best.scheduled_arrival
        );
    }
    Ok(())
}
