//! Driving distance and duration from an address to every Metro-North
//! station, labelled with each station's most frequent line. Writes
//! metro_north_full_station_distances.csv.

use log::warn;

use mnr_optimizer::drive::{Coordinates, DriveLookup, RoutingClient};
use mnr_optimizer::output::{self, round1, round2, StationDistanceRecord};
use mnr_optimizer::{feeds, prompt};

const OUTPUT_FILE: &str = "metro_north_full_station_distances.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let address = prompt("Enter your starting address")?;

    let router = RoutingClient::new()?;
    let origin = router.geocode(&address)?;
    println!("Origin located at ({:.5}, {:.5})", origin.lat, origin.lon);

    let tables = feeds::fetch_schedule()?;
    let line_per_stop = tables.modal_route_per_stop();

    println!("Calculating distances to {} stations...", tables.stations.len());
    let mut records = Vec::new();
    for station in tables.stations.values() {
        let (Some(lat), Some(lon)) = (station.lat, station.lon) else {
            continue;
        };
        let estimate = match router.drive(origin, Coordinates { lat, lon }) {
            Ok(estimate) => estimate,
            Err(err) => {
                warn!("Error with {}: {err}", station.name);
                continue;
            }
        };
        let line = line_per_stop
            .get(&station.id)
            .map(|route_id| tables.line_name(route_id).to_string())
            .unwrap_or_default();
        records.push(StationDistanceRecord {
            station: station.name.clone(),
            line,
            distance_mi: round2(estimate.distance_miles()),
            duration_min: round1(estimate.duration_min),
        });
    }

    records.sort_by(|a, b| a.distance_mi.total_cmp(&b.distance_mi));

    println!("\nClosest 20 Metro-North stations:");
    for record in records.iter().take(20) {
        println!(
            "{:<28} {:<12} {:>6.2} mi  {:>6.1} min",
            record.station, record.line, record.distance_mi, record.duration_min
        );
    }

    output::write_csv(OUTPUT_FILE, &records)?;
    println!("\nSaved to {OUTPUT_FILE}");
    Ok(())
}
