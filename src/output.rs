use std::path::Path;

use log::info;
use serde::Serialize;

use crate::live::{self, LiveRow};
use crate::ranking::RankedTrip;
use crate::schedule::ScheduledLeg;

/// Round travel-minute values to one decimal for the output tables.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round mileage values to two decimals for the output tables.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[derive(Serialize)]
pub struct TrainTimeRecord {
    pub stop_name: String,
    pub line: String,
    pub scheduled_departure: String,
    pub scheduled_arrival: String,
    pub travel_minutes: f64,
}

impl From<&ScheduledLeg> for TrainTimeRecord {
    fn from(leg: &ScheduledLeg) -> Self {
        Self {
            stop_name: leg.stop_name.clone(),
            line: leg.line.clone(),
            scheduled_departure: leg.departure.to_string(),
            scheduled_arrival: leg.arrival.to_string(),
            travel_minutes: round1(leg.travel_minutes),
        }
    }
}

#[derive(Serialize)]
pub struct LiveTimeRecord {
    pub origin_stop_id: String,
    pub line: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub live_travel_minutes: f64,
}

impl From<&LiveRow> for LiveTimeRecord {
    fn from(row: &LiveRow) -> Self {
        Self {
            origin_stop_id: row.origin_stop_id.clone(),
            line: row.line.clone(),
            departure_time: live::format_local(row.origin_epoch),
            arrival_time: live::format_local(row.arrival_epoch),
            live_travel_minutes: round1(row.travel_minutes),
        }
    }
}

#[derive(Serialize)]
pub struct StationDistanceRecord {
    pub station: String,
    pub line: String,
    pub distance_mi: f64,
    pub duration_min: f64,
}

#[derive(Serialize)]
pub struct RankedTripRecord {
    pub station: String,
    pub line: String,
    pub drive_minutes: f64,
    pub drive_km: f64,
    pub train_minutes: f64,
    pub scheduled_departure: String,
    pub scheduled_arrival: String,
    pub total_minutes: f64,
}

impl From<&RankedTrip> for RankedTripRecord {
    fn from(trip: &RankedTrip) -> Self {
        Self {
            station: trip.station.clone(),
            line: trip.line.clone(),
            drive_minutes: round1(trip.drive_minutes),
            drive_km: round1(trip.drive_km),
            train_minutes: round1(trip.train_minutes),
            scheduled_departure: trip.scheduled_departure.to_string(),
            scheduled_arrival: trip.scheduled_arrival.to_string(),
            total_minutes: round1(trip.total_minutes),
        }
    }
}

/// Write one header row plus one record per row, comma-separated, UTF-8.
pub fn write_csv<P: AsRef<Path>, T: Serialize>(path: P, rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Saved {} rows to {}", rows.len(), path.as_ref().display());
    Ok(())
}
