use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Sub;

/// Minutes since midnight on the service date. Fractional minutes come from
/// the seconds field of GTFS times. Values past 24:00 belong to overnight
/// trips and must stay un-wrapped.
#[derive(PartialOrd, PartialEq, Copy, Clone, Debug, Serialize)]
pub struct TimeOfDay(pub f64);

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Eq for TimeOfDay {}

impl TimeOfDay {
    pub fn from_gtfs_seconds(secs: u32) -> Self {
        TimeOfDay(secs as f64 / 60.0)
    }

    /// Parse "HH:MM" (24-hour, hours may exceed 23 for overnight trips).
    pub fn parse_hhmm(s: &str) -> Option<Self> {
        let (h, m) = s.trim().split_once(':')?;
        let h: u32 = h.parse().ok()?;
        let m: u32 = m.parse().ok()?;
        if m >= 60 {
            return None;
        }
        let minutes = h.checked_mul(60)?.checked_add(m)?;
        Some(TimeOfDay(minutes as f64))
    }

    pub fn whole_minutes(&self) -> u32 {
        self.0 as u32
    }
}

impl Sub for TimeOfDay {
    type Output = f64;

    fn sub(self, rhs: Self) -> f64 {
        self.0 - rhs.0
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let minutes = self.whole_minutes();
        f.write_fmt(format_args!("{:02}:{:02}", minutes / 60, minutes % 60))
    }
}
