use chrono::NaiveDate;
use log::info;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::error::DataError;
use crate::model::ScheduleTables;
use crate::time::TimeOfDay;

/// The best scheduled leg from one origin station: the latest train that
/// still arrives at the destination by the target time.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledLeg {
    pub stop_id: String,
    pub stop_name: String,
    pub line: String,
    pub trip_id: String,
    pub departure: TimeOfDay,
    pub arrival: TimeOfDay,
    pub travel_minutes: f64,
}

/// One row per origin station, sorted ascending by travel time.
///
/// Policy: within a station group the leg with the latest destination
/// arrival wins ("don't depart earlier than necessary"); equal arrivals
/// resolve to the lowest trip id. Stations with no qualifying trip on the
/// date are absent, and the destination never appears as its own origin.
pub fn best_trains(
    tables: &ScheduleTables,
    date: NaiveDate,
    target_arrival: TimeOfDay,
    destination: &str,
) -> Result<Vec<ScheduledLeg>, DataError> {
    let dest_stops = tables.stops_matching_name(destination);
    if dest_stops.is_empty() {
        return Err(DataError::DestinationNotFound(destination.to_string()));
    }
    let dest_ids: FxHashSet<&str> = dest_stops.iter().map(|s| s.id.as_str()).collect();

    let active = tables.calendar.active_services(date);
    info!(
        "{} of {} services active on {date}",
        active.len(),
        tables.calendar.services.len()
    );

    let is_active_trip = |trip_id: &str| {
        tables
            .trips
            .get(trip_id)
            .is_some_and(|t| active.contains(&t.service_id))
    };

    // Latest qualifying destination arrival per trip.
    let mut dest_arrivals: FxHashMap<&str, TimeOfDay> = FxHashMap::default();
    for event in &tables.events {
        if !dest_ids.contains(event.stop_id.as_str()) || !is_active_trip(&event.trip_id) {
            continue;
        }
        let Some(arrival) = event.arrival else {
            continue;
        };
        if arrival > target_arrival {
            continue;
        }
        dest_arrivals
            .entry(event.trip_id.as_str())
            .and_modify(|best| *best = (*best).max(arrival))
            .or_insert(arrival);
    }

    let needle = destination.to_lowercase();
    // Best leg per (origin stop, line) group.
    let mut best: FxHashMap<(String, String), ScheduledLeg> = FxHashMap::default();

    for event in &tables.events {
        let Some(&dest_arrival) = dest_arrivals.get(event.trip_id.as_str()) else {
            continue;
        };
        // Candidate origin legs occur strictly before the destination call.
        let (Some(arrival), Some(departure)) = (event.arrival, event.departure) else {
            continue;
        };
        if arrival >= dest_arrival {
            continue;
        }
        let Some(station) = tables.stations.get(&event.stop_id) else {
            continue;
        };
        if station.name.to_lowercase().contains(&needle) {
            continue;
        }
        let trip = &tables.trips[&event.trip_id];
        let line = tables.line_name(&trip.route_id).to_string();

        let leg = ScheduledLeg {
            stop_id: event.stop_id.clone(),
            stop_name: station.name.clone(),
            line: line.clone(),
            trip_id: event.trip_id.clone(),
            departure,
            arrival: dest_arrival,
            travel_minutes: dest_arrival - departure,
        };

        match best.entry((event.stop_id.clone(), line)) {
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                if later_wins(&leg, slot.get()) {
                    slot.insert(leg);
                }
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(leg);
            }
        }
    }

    let mut legs: Vec<ScheduledLeg> = best.into_values().collect();
    legs.sort_by(|a, b| {
        a.travel_minutes
            .total_cmp(&b.travel_minutes)
            .then_with(|| a.stop_name.cmp(&b.stop_name))
    });
    Ok(legs)
}

fn later_wins(candidate: &ScheduledLeg, incumbent: &ScheduledLeg) -> bool {
    match candidate.arrival.cmp(&incumbent.arrival) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => candidate.trip_id < incumbent.trip_id,
        std::cmp::Ordering::Less => false,
    }
}
