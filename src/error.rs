use thiserror::Error;

/// Data-shape failures: the feed was fetched but does not contain what the
/// computation needs. These abort the run with a descriptive message.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("no stop name matches destination {0:?} in the stop table")]
    DestinationNotFound(String),

    #[error("realtime feed contains no stop-time predictions")]
    EmptyFeed,

    #[error("no realtime stop id matches destination {0:?}")]
    LiveDestinationNotFound(String),

    #[error("could not decode realtime feed: {0}")]
    FeedDecode(#[from] prost::DecodeError),

    #[error("could not geocode address: {0:?}")]
    AddressNotFound(String),
}

/// Per-row routing failures. Recovered locally: the station is dropped from
/// the ranking and reported in the outcome, never escalated to a crate error.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no driving route found")]
    NoRoute,

    #[error("station has no coordinates in the stop table")]
    MissingCoordinates,
}
