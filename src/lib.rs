//! Look up Metro-North schedules and recommend the best station to depart
//! from: the latest scheduled train that still makes a target arrival at
//! Grand Central, live travel times from the realtime feed, and a combined
//! drive-plus-train ranking.

pub mod calendar;
pub mod drive;
pub mod error;
pub mod feeds;
pub mod live;
pub mod model;
pub mod output;
pub mod ranking;
pub mod schedule;
pub mod time;

use std::io::Write;

pub const DESTINATION_NAME: &str = "Grand Central Terminal";

/// Read one interactive line from stdin.
pub fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
