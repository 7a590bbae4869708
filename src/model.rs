use gtfs_structures::Gtfs;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::calendar::{Exception, Service, ServiceCalendar};
use crate::time::TimeOfDay;

/// A physical stop. One terminal may appear under several GTFS stop ids.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// One scheduled run of a vehicle.
#[derive(Debug, Clone)]
pub struct TripRec {
    pub id: String,
    pub service_id: String,
    pub route_id: String,
}

/// A scheduled visit of a trip to a stop.
#[derive(Debug, Clone)]
pub struct StopEvent {
    pub trip_id: String,
    pub stop_id: String,
    pub arrival: Option<TimeOfDay>,
    pub departure: Option<TimeOfDay>,
}

/// The relational snapshot every computation reads from. Built once per run,
/// never mutated afterwards.
#[derive(Debug, Default, Clone)]
pub struct ScheduleTables {
    pub stations: FxHashMap<String, Station>,
    pub trips: FxHashMap<String, TripRec>,
    pub events: Vec<StopEvent>,
    /// route_id -> display name of the line.
    pub routes: FxHashMap<String, String>,
    pub calendar: ServiceCalendar,
}

impl ScheduleTables {
    pub fn from_gtfs(gtfs: &Gtfs) -> Self {
        let mut tables = ScheduleTables::default();

        for (id, stop) in &gtfs.stops {
            tables.stations.insert(
                id.clone(),
                Station {
                    id: id.clone(),
                    name: stop.name.clone().unwrap_or_default(),
                    lat: stop.latitude,
                    lon: stop.longitude,
                },
            );
        }

        for (id, route) in &gtfs.routes {
            let name = route
                .long_name
                .clone()
                .or_else(|| route.short_name.clone())
                .unwrap_or_else(|| id.clone());
            tables.routes.insert(id.clone(), name);
        }

        for (id, trip) in &gtfs.trips {
            tables.trips.insert(
                id.clone(),
                TripRec {
                    id: id.clone(),
                    service_id: trip.service_id.clone(),
                    route_id: trip.route_id.clone(),
                },
            );
            for st in &trip.stop_times {
                tables.events.push(StopEvent {
                    trip_id: id.clone(),
                    stop_id: st.stop.id.clone(),
                    arrival: st.arrival_time.map(TimeOfDay::from_gtfs_seconds),
                    departure: st.departure_time.map(TimeOfDay::from_gtfs_seconds),
                });
            }
        }

        let services = gtfs
            .calendar
            .values()
            .map(|c| Service {
                id: c.id.clone(),
                monday: c.monday,
                tuesday: c.tuesday,
                wednesday: c.wednesday,
                thursday: c.thursday,
                friday: c.friday,
                saturday: c.saturday,
                sunday: c.sunday,
                start_date: c.start_date,
                end_date: c.end_date,
            })
            .collect();

        let exceptions = gtfs
            .calendar_dates
            .iter()
            .flat_map(|(service_id, dates)| {
                dates.iter().map(|d| {
                    (
                        service_id.clone(),
                        d.date,
                        Exception::from(d.exception_type),
                    )
                })
            })
            .collect();

        tables.calendar = ServiceCalendar::new(services, exceptions);
        tables
    }

    /// Display name of the line a route belongs to.
    pub fn line_name<'a>(&'a self, route_id: &'a str) -> &'a str {
        self.routes
            .get(route_id)
            .map(String::as_str)
            .unwrap_or(route_id)
    }

    /// Stop ids whose station name contains `needle`, case-insensitively.
    pub fn stops_matching_name(&self, needle: &str) -> Vec<&Station> {
        let needle = needle.to_lowercase();
        self.stations
            .values()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// The most frequent route serving each stop, counted over all stop-time
    /// events. Ties resolve to the lexicographically smallest route id.
    pub fn modal_route_per_stop(&self) -> FxHashMap<String, String> {
        let mut counts: FxHashMap<(&str, &str), usize> = FxHashMap::default();
        for event in &self.events {
            let Some(trip) = self.trips.get(&event.trip_id) else {
                continue;
            };
            *counts
                .entry((event.stop_id.as_str(), trip.route_id.as_str()))
                .or_default() += 1;
        }

        counts
            .into_iter()
            .map(|((stop_id, route_id), n)| (stop_id, (route_id, n)))
            .into_group_map()
            .into_iter()
            .filter_map(|(stop_id, routes)| {
                routes
                    .into_iter()
                    .max_by(|(ra, na), (rb, nb)| na.cmp(nb).then_with(|| rb.cmp(ra)))
                    .map(|(route_id, _)| (stop_id.to_string(), route_id.to_string()))
            })
            .collect()
    }
}
