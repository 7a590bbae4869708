use anyhow::Context;
use gtfs_structures::Gtfs;
use log::info;
use prost::Message;

use crate::error::DataError;
use crate::model::ScheduleTables;

/// Metro-North static GTFS feed (zip of schedule tables).
pub const GTFS_URL: &str = "https://rrgtfsfeeds.s3.amazonaws.com/gtfsmnr.zip";

/// Metro-North GTFS-realtime trip updates.
pub const LIVE_FEED_URL: &str =
    "https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds/mnr%2Fgtfs-mnr";

/// Download the static feed and build the in-memory snapshot. The
/// gtfs-structures reader handles the zip and table parsing.
pub fn fetch_schedule() -> anyhow::Result<ScheduleTables> {
    info!("Downloading static schedule from {GTFS_URL}");
    let gtfs = Gtfs::from_url(GTFS_URL).context("fetching static GTFS feed")?;
    info!(
        "Loaded {} stops, {} trips, {} routes",
        gtfs.stops.len(),
        gtfs.trips.len(),
        gtfs.routes.len()
    );
    Ok(ScheduleTables::from_gtfs(&gtfs))
}

/// Download and decode the realtime trip-update feed.
pub fn fetch_live_feed() -> anyhow::Result<gtfs_realtime::FeedMessage> {
    info!("Downloading realtime feed from {LIVE_FEED_URL}");
    let bytes = reqwest::blocking::get(LIVE_FEED_URL)
        .and_then(|r| r.error_for_status())
        .context("fetching realtime feed")?
        .bytes()?;
    let feed = gtfs_realtime::FeedMessage::decode(bytes.as_ref()).map_err(DataError::FeedDecode)?;
    info!("Realtime feed has {} entities", feed.entity.len());
    Ok(feed)
}
