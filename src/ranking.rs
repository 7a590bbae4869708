use log::warn;

use crate::drive::{Coordinates, DriveLookup};
use crate::error::LookupError;
use crate::model::ScheduleTables;
use crate::schedule::ScheduledLeg;
use crate::time::TimeOfDay;

/// A station ranked by door-to-seat time: drive to the station plus the
/// scheduled train ride.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTrip {
    pub station: String,
    pub line: String,
    pub drive_minutes: f64,
    pub drive_km: f64,
    pub train_minutes: f64,
    pub scheduled_departure: TimeOfDay,
    pub scheduled_arrival: TimeOfDay,
    pub total_minutes: f64,
}

/// A station that fell out of the ranking, with the reason. Lookup misses
/// are per-row outcomes, not errors: the caller decides whether to report
/// them.
#[derive(Debug)]
pub struct DroppedStation {
    pub station: String,
    pub reason: LookupError,
}

#[derive(Debug, Default)]
pub struct Ranking {
    /// Ascending by total_minutes; the first row is the recommendation.
    pub trips: Vec<RankedTrip>,
    pub dropped: Vec<DroppedStation>,
}

impl Ranking {
    pub fn recommended(&self) -> Option<&RankedTrip> {
        self.trips.first()
    }
}

/// Compose the static selector's output with driving estimates from
/// `origin`. Every leg produces either a ranked row or a dropped entry.
pub fn rank_stations(
    legs: &[ScheduledLeg],
    tables: &ScheduleTables,
    origin: Coordinates,
    router: &dyn DriveLookup,
) -> Ranking {
    let mut ranking = Ranking::default();

    for leg in legs {
        let coords = tables
            .stations
            .get(&leg.stop_id)
            .and_then(|s| Some(Coordinates {
                lat: s.lat?,
                lon: s.lon?,
            }))
            .ok_or(LookupError::MissingCoordinates);

        let estimate = coords.and_then(|to| router.drive(origin, to));
        match estimate {
            Ok(drive) => ranking.trips.push(RankedTrip {
                station: leg.stop_name.clone(),
                line: leg.line.clone(),
                drive_minutes: drive.duration_min,
                drive_km: drive.distance_km,
                train_minutes: leg.travel_minutes,
                scheduled_departure: leg.departure,
                scheduled_arrival: leg.arrival,
                total_minutes: drive.duration_min + leg.travel_minutes,
            }),
            Err(reason) => {
                warn!("Dropping {}: {reason}", leg.stop_name);
                ranking.dropped.push(DroppedStation {
                    station: leg.stop_name.clone(),
                    reason,
                });
            }
        }
    }

    ranking
        .trips
        .sort_by(|a, b| a.total_minutes.total_cmp(&b.total_minutes));
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::DriveEstimate;
    use crate::model::Station;

    struct FixedSpeedRouter;

    impl DriveLookup for FixedSpeedRouter {
        fn drive(&self, from: Coordinates, to: Coordinates) -> Result<DriveEstimate, LookupError> {
            // One degree of latitude ~= 100 minutes of driving, for tests.
            let minutes = (to.lat - from.lat).abs() * 100.0;
            if minutes > 500.0 {
                return Err(LookupError::NoRoute);
            }
            Ok(DriveEstimate {
                duration_min: minutes,
                distance_km: minutes * 1.2,
            })
        }
    }

    fn leg(stop_id: &str, name: &str, train_minutes: f64) -> ScheduledLeg {
        ScheduledLeg {
            stop_id: stop_id.to_string(),
            stop_name: name.to_string(),
            line: "Harlem".to_string(),
            trip_id: "T1".to_string(),
            departure: TimeOfDay(480.0),
            arrival: TimeOfDay(480.0 + train_minutes),
            travel_minutes: train_minutes,
        }
    }

    fn station_at(id: &str, name: &str, lat: Option<f64>) -> (String, Station) {
        (
            id.to_string(),
            Station {
                id: id.to_string(),
                name: name.to_string(),
                lat,
                lon: lat.map(|_| -73.7),
            },
        )
    }

    fn origin() -> Coordinates {
        Coordinates { lat: 41.0, lon: -73.7 }
    }

    #[test]
    fn ranks_by_total_minutes() {
        let mut tables = ScheduleTables::default();
        tables.stations.extend([
            station_at("near", "Near", Some(41.1)), // 10 min drive
            station_at("far", "Far", Some(42.0)),   // 100 min drive
        ]);
        // Near has the longer train ride but wins on total.
        let legs = vec![leg("far", "Far", 20.0), leg("near", "Near", 60.0)];

        let ranking = rank_stations(&legs, &tables, origin(), &FixedSpeedRouter);
        assert_eq!(ranking.trips.len(), 2);
        assert_eq!(ranking.recommended().unwrap().station, "Near");
        assert!((ranking.trips[0].total_minutes - 70.0).abs() < 1e-9);
        assert!((ranking.trips[1].total_minutes - 120.0).abs() < 1e-9);
        assert!(ranking.dropped.is_empty());
    }

    #[test]
    fn failed_lookups_are_dropped_and_reported() {
        let mut tables = ScheduleTables::default();
        tables.stations.extend([
            station_at("ok", "Reachable", Some(41.1)),
            station_at("unroutable", "Unroutable", Some(51.0)),
            station_at("nocoords", "No Coordinates", None),
        ]);
        let legs = vec![
            leg("ok", "Reachable", 30.0),
            leg("unroutable", "Unroutable", 30.0),
            leg("nocoords", "No Coordinates", 30.0),
            leg("missing", "Not In Stop Table", 30.0),
        ];

        let ranking = rank_stations(&legs, &tables, origin(), &FixedSpeedRouter);
        assert_eq!(ranking.trips.len(), 1);
        assert_eq!(ranking.trips[0].station, "Reachable");
        assert_eq!(ranking.dropped.len(), 3);
        assert!(ranking
            .dropped
            .iter()
            .any(|d| matches!(d.reason, LookupError::NoRoute)));
        assert!(ranking
            .dropped
            .iter()
            .any(|d| matches!(d.reason, LookupError::MissingCoordinates)));
    }

    #[test]
    fn empty_input_gives_empty_ranking() {
        let tables = ScheduleTables::default();
        let ranking = rank_stations(&[], &tables, origin(), &FixedSpeedRouter);
        assert!(ranking.trips.is_empty());
        assert!(ranking.recommended().is_none());
    }
}
