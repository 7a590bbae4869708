use chrono::DateTime;
use chrono_tz::America::New_York;
use itertools::Itertools;
use log::info;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::error::DataError;

/// One predicted visit of a trip to a stop, flattened out of the
/// trip-update entities of a GTFS-realtime feed.
#[derive(Debug, Clone)]
pub struct StopTimePrediction {
    pub trip_id: String,
    pub route_id: String,
    pub stop_id: String,
    pub arrival_epoch: Option<i64>,
    pub departure_epoch: Option<i64>,
}

/// Minimum live travel duration for one (origin stop, line) group.
///
/// The three fields are independent column minima over the group (origin
/// time, destination arrival, travel minutes) and may come from different
/// trips. The live feed has always been reduced this way; keep it until the
/// upstream intent is settled.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveRow {
    pub origin_stop_id: String,
    pub line: String,
    pub origin_epoch: i64,
    pub arrival_epoch: i64,
    pub travel_minutes: f64,
}

pub fn predictions_from_feed(feed: &gtfs_realtime::FeedMessage) -> Vec<StopTimePrediction> {
    let mut predictions = Vec::new();
    for entity in &feed.entity {
        let Some(trip_update) = &entity.trip_update else {
            continue;
        };
        let Some(trip_id) = trip_update.trip.trip_id.clone() else {
            continue;
        };
        let route_id = trip_update.trip.route_id.clone().unwrap_or_default();
        for stu in &trip_update.stop_time_update {
            let Some(stop_id) = stu.stop_id.clone() else {
                continue;
            };
            predictions.push(StopTimePrediction {
                trip_id: trip_id.clone(),
                route_id: route_id.clone(),
                stop_id,
                arrival_epoch: stu.arrival.as_ref().and_then(|e| e.time),
                departure_epoch: stu.departure.as_ref().and_then(|e| e.time),
            });
        }
    }
    predictions
}

/// Per (origin stop, line): the minimum predicted travel duration to the
/// destination, sorted ascending.
///
/// Destination stops are matched by case-sensitive substring on the stop
/// *identifier*, per the live feed's id scheme. This deliberately differs
/// from the static selector, which matches against the stop name column.
pub fn live_travel_times(
    predictions: &[StopTimePrediction],
    destination: &str,
) -> Result<Vec<LiveRow>, DataError> {
    if predictions.is_empty() {
        return Err(DataError::EmptyFeed);
    }

    let dest_ids: FxHashSet<&str> = predictions
        .iter()
        .filter(|p| p.stop_id.contains(destination))
        .map(|p| p.stop_id.as_str())
        .collect();
    if dest_ids.is_empty() {
        return Err(DataError::LiveDestinationNotFound(destination.to_string()));
    }

    // Soonest predicted destination arrival per trip.
    let mut dest_arrivals: FxHashMap<&str, i64> = FxHashMap::default();
    for p in predictions {
        if !dest_ids.contains(p.stop_id.as_str()) {
            continue;
        }
        let Some(arrival) = p.arrival_epoch else {
            continue;
        };
        dest_arrivals
            .entry(p.trip_id.as_str())
            .and_modify(|best| *best = (*best).min(arrival))
            .or_insert(arrival);
    }
    info!("{} trips predict a destination arrival", dest_arrivals.len());

    let legs = predictions
        .iter()
        .filter(|p| !dest_ids.contains(p.stop_id.as_str()))
        .filter_map(|p| {
            let &dest_arrival = dest_arrivals.get(p.trip_id.as_str())?;
            let origin_time = p.departure_epoch.or(p.arrival_epoch)?;
            // Origin calls strictly precede the destination arrival.
            if p.arrival_epoch.unwrap_or(origin_time) >= dest_arrival {
                return None;
            }
            let travel_minutes = (dest_arrival - origin_time) as f64 / 60.0;
            Some((
                (p.stop_id.clone(), p.route_id.clone()),
                (origin_time, dest_arrival, travel_minutes),
            ))
        })
        .into_group_map();

    let mut rows: Vec<LiveRow> = legs
        .into_iter()
        .map(|((origin_stop_id, line), group)| LiveRow {
            origin_stop_id,
            line,
            // Independent minima per column, not a single selected row.
            origin_epoch: group.iter().map(|g| g.0).min().unwrap_or(0),
            arrival_epoch: group.iter().map(|g| g.1).min().unwrap_or(0),
            travel_minutes: group
                .iter()
                .map(|g| g.2)
                .fold(f64::INFINITY, f64::min),
        })
        .collect();

    rows.sort_by(|a, b| {
        a.travel_minutes
            .total_cmp(&b.travel_minutes)
            .then_with(|| a.origin_stop_id.cmp(&b.origin_stop_id))
    });
    Ok(rows)
}

/// Epoch seconds rendered as New York civil time, for the output tables.
pub fn format_local(epoch: i64) -> String {
    match DateTime::from_timestamp(epoch, 0) {
        Some(dt) => dt.with_timezone(&New_York).format("%H:%M:%S").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(
        trip_id: &str,
        stop_id: &str,
        arrival: Option<i64>,
        departure: Option<i64>,
    ) -> StopTimePrediction {
        StopTimePrediction {
            trip_id: trip_id.to_string(),
            route_id: "hudson".to_string(),
            stop_id: stop_id.to_string(),
            arrival_epoch: arrival,
            departure_epoch: departure,
        }
    }

    #[test]
    fn ten_minute_ride_to_terminal() {
        let predictions = vec![
            prediction("T2", "stopB", Some(1000), Some(1000)),
            prediction("T2", "GCT", Some(1600), None),
        ];
        let rows = live_travel_times(&predictions, "GCT").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].origin_stop_id, "stopB");
        assert_eq!(rows[0].travel_minutes, 10.0);
        assert_eq!(rows[0].origin_epoch, 1000);
        assert_eq!(rows[0].arrival_epoch, 1600);
    }

    #[test]
    fn empty_feed_is_a_data_error() {
        let err = live_travel_times(&[], "GCT").unwrap_err();
        assert!(matches!(err, DataError::EmptyFeed));
    }

    #[test]
    fn no_destination_match_is_a_data_error() {
        let predictions = vec![prediction("T2", "stopB", Some(1000), Some(1000))];
        let err = live_travel_times(&predictions, "GCT").unwrap_err();
        assert!(matches!(err, DataError::LiveDestinationNotFound(_)));
    }

    #[test]
    fn identifier_matching_is_case_sensitive() {
        let predictions = vec![
            prediction("T2", "stopB", Some(1000), Some(1000)),
            prediction("T2", "gct", Some(1600), None),
        ];
        assert!(live_travel_times(&predictions, "GCT").is_err());
    }

    #[test]
    fn travel_time_is_non_negative_for_preceding_origins() {
        let predictions = vec![
            prediction("T2", "stopB", Some(1000), Some(1100)),
            prediction("T2", "stopC", Some(1300), Some(1350)),
            prediction("T2", "GCT", Some(1600), None),
        ];
        let rows = live_travel_times(&predictions, "GCT").unwrap();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert!(row.travel_minutes >= 0.0);
        }
    }

    #[test]
    fn stops_after_destination_are_excluded() {
        let predictions = vec![
            prediction("T2", "stopB", Some(1000), Some(1000)),
            prediction("T2", "GCT", Some(1600), None),
            prediction("T2", "stopZ", Some(1900), Some(1900)),
        ];
        let rows = live_travel_times(&predictions, "GCT").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].origin_stop_id, "stopB");
    }

    #[test]
    fn group_reduction_takes_independent_column_minima() {
        // Two trips through the same stop: T1 departs earlier but is slower,
        // T2 departs later but is faster.
        let predictions = vec![
            prediction("T1", "stopB", Some(900), Some(900)),
            prediction("T1", "GCT", Some(2100), None),
            prediction("T2", "stopB", Some(1200), Some(1200)),
            prediction("T2", "GCT", Some(1800), None),
        ];
        let rows = live_travel_times(&predictions, "GCT").unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        // min origin from T1, min arrival from T2, min travel from T2
        assert_eq!(row.origin_epoch, 900);
        assert_eq!(row.arrival_epoch, 1800);
        assert_eq!(row.travel_minutes, 10.0);
    }

    #[test]
    fn rows_sort_ascending_by_travel_minutes() {
        let predictions = vec![
            prediction("T1", "far", Some(100), Some(100)),
            prediction("T1", "near", Some(1000), Some(1000)),
            prediction("T1", "GCT", Some(1600), None),
        ];
        let rows = live_travel_times(&predictions, "GCT").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].origin_stop_id, "near");
        assert_eq!(rows[1].origin_stop_id, "far");
    }

    #[test]
    fn feed_flattening_extracts_predictions() {
        use gtfs_realtime::trip_update::{StopTimeEvent, StopTimeUpdate};
        use gtfs_realtime::{FeedEntity, FeedMessage, TripDescriptor, TripUpdate};

        let feed = FeedMessage {
            entity: vec![FeedEntity {
                id: "e1".to_string(),
                trip_update: Some(TripUpdate {
                    trip: TripDescriptor {
                        trip_id: Some("T2".to_string()),
                        route_id: Some("hudson".to_string()),
                        ..Default::default()
                    },
                    stop_time_update: vec![
                        StopTimeUpdate {
                            stop_id: Some("stopB".to_string()),
                            departure: Some(StopTimeEvent {
                                time: Some(1000),
                                ..Default::default()
                            }),
                            ..Default::default()
                        },
                        StopTimeUpdate {
                            stop_id: Some("GCT".to_string()),
                            arrival: Some(StopTimeEvent {
                                time: Some(1600),
                                ..Default::default()
                            }),
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        };

        let predictions = predictions_from_feed(&feed);
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].trip_id, "T2");
        assert_eq!(predictions[0].route_id, "hudson");
        assert_eq!(predictions[0].departure_epoch, Some(1000));
        assert_eq!(predictions[1].arrival_epoch, Some(1600));

        let rows = live_travel_times(&predictions, "GCT").unwrap();
        assert_eq!(rows[0].travel_minutes, 10.0);
    }

    #[test]
    fn local_time_formatting() {
        // 2024-06-03 12:00:00 UTC == 08:00:00 in New York (EDT)
        assert_eq!(format_local(1717416000), "08:00:00");
    }
}
