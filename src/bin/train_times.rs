//! Scheduled Metro-North travel times to Grand Central for a target
//! arrival date and time. Writes metro_north_train_times_for_arrival.csv.

use anyhow::Context;
use chrono::NaiveDate;

use mnr_optimizer::output::{self, TrainTimeRecord};
use mnr_optimizer::time::TimeOfDay;
use mnr_optimizer::{feeds, prompt, schedule, DESTINATION_NAME};

const OUTPUT_FILE: &str = "metro_north_train_times_for_arrival.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let date_str = prompt("Enter target date (YYYY-MM-DD)")?;
    let time_str = prompt("Enter target arrival time at Grand Central (HH:MM, 24-hour)")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").context("parsing target date")?;
    let target_arrival = TimeOfDay::parse_hhmm(&time_str)
        .with_context(|| format!("invalid time of day {time_str:?}"))?;

    println!(
        "\nAnalyzing Metro-North schedules for trains arriving by {time_str} on {}...",
        date.format("%A %Y-%m-%d")
    );

    let tables = feeds::fetch_schedule()?;
    let legs = schedule::best_trains(&tables, date, target_arrival, DESTINATION_NAME)?;

    println!("\nClosest scheduled trains arriving by target time:");
    for leg in legs.iter().take(15) {
        println!(
            "{:<28} {:<12} dep {}  arr {}  {:.1} min",
            leg.stop_name,
            leg.line,
            leg.departure,
            leg.arrival,
            leg.travel_minutes
        );
    }

    let records: Vec<TrainTimeRecord> = legs.iter().map(TrainTimeRecord::from).collect();
    output::write_csv(OUTPUT_FILE, &records)?;
    println!("\nSaved to {OUTPUT_FILE}");
    Ok(())
}
