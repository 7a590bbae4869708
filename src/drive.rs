use std::thread;
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;

use crate::error::{DataError, LookupError};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const OSRM_URL: &str = "https://router.project-osrm.org/route/v1/driving";
const USER_AGENT: &str = "MetroNorthMapper/1.0";

/// Courtesy pause after every external call. Not real backpressure, just
/// politeness toward the public Nominatim/OSRM instances.
const CALL_DELAY: Duration = Duration::from_millis(200);
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A driving estimate between two coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveEstimate {
    pub duration_min: f64,
    pub distance_km: f64,
}

impl DriveEstimate {
    pub fn distance_miles(&self) -> f64 {
        self.distance_km * 1000.0 / 1609.34
    }
}

/// Seam for the per-station routing lookup, so the ranker can be exercised
/// without the network.
pub trait DriveLookup {
    fn drive(&self, from: Coordinates, to: Coordinates) -> Result<DriveEstimate, LookupError>;
}

pub struct RoutingClient {
    http: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

#[derive(Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    /// Seconds.
    duration: f64,
    /// Meters.
    distance: f64,
}

impl RoutingClient {
    pub fn new() -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(CALL_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    /// Resolve a free-text address to coordinates via Nominatim.
    pub fn geocode(&self, address: &str) -> anyhow::Result<Coordinates> {
        let hits: Vec<NominatimHit> = self
            .http
            .get(NOMINATIM_URL)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .json()?;
        thread::sleep(CALL_DELAY);

        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| DataError::AddressNotFound(address.to_string()))?;
        let coords = Coordinates {
            lat: hit.lat.parse()?,
            lon: hit.lon.parse()?,
        };
        info!("Geocoded {address:?} to ({:.5}, {:.5})", coords.lat, coords.lon);
        Ok(coords)
    }
}

impl DriveLookup for RoutingClient {
    fn drive(&self, from: Coordinates, to: Coordinates) -> Result<DriveEstimate, LookupError> {
        // OSRM wants lon,lat pairs.
        let url = format!(
            "{OSRM_URL}/{},{};{},{}",
            from.lon, from.lat, to.lon, to.lat
        );
        let response: OsrmResponse = self
            .http
            .get(&url)
            .query(&[("overview", "false")])
            .send()?
            .error_for_status()?
            .json()?;
        thread::sleep(CALL_DELAY);

        let Some(route) = response.routes.into_iter().next() else {
            warn!("No driving route between ({},{}) and ({},{})", from.lat, from.lon, to.lat, to.lon);
            return Err(LookupError::NoRoute);
        };
        Ok(DriveEstimate {
            duration_min: route.duration / 60.0,
            distance_km: route.distance / 1000.0,
        })
    }
}
