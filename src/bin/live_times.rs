//! Live Metro-North travel times to Grand Central from the realtime
//! trip-update feed. Writes metro_north_live_travel_times.csv.

use mnr_optimizer::output::{self, LiveTimeRecord};
use mnr_optimizer::{feeds, live, prompt};

const OUTPUT_FILE: &str = "metro_north_live_travel_times.csv";

/// The realtime feed identifies stops by feed-specific ids, not display
/// names, so the destination is matched against identifiers.
const DEFAULT_DESTINATION_ID: &str = "GCT";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let entered = prompt(&format!(
        "Enter destination stop identifier fragment [{DEFAULT_DESTINATION_ID}]"
    ))?;
    let destination = if entered.is_empty() {
        DEFAULT_DESTINATION_ID.to_string()
    } else {
        entered
    };

    let feed = feeds::fetch_live_feed()?;
    let predictions = live::predictions_from_feed(&feed);
    let rows = live::live_travel_times(&predictions, &destination)?;

    println!("\nLive travel times to {destination}:");
    for row in rows.iter().take(15) {
        println!(
            "{:<12} {:<12} dep {}  arr {}  {:.1} min",
            row.origin_stop_id,
            row.line,
            live::format_local(row.origin_epoch),
            live::format_local(row.arrival_epoch),
            row.travel_minutes
        );
    }

    let records: Vec<LiveTimeRecord> = rows.iter().map(LiveTimeRecord::from).collect();
    output::write_csv(OUTPUT_FILE, &records)?;
    println!("\nSaved to {OUTPUT_FILE}");
    Ok(())
}
