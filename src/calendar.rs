use chrono::{Datelike, NaiveDate, Weekday};
use rustc_hash::{FxHashMap, FxHashSet};

/// One calendar.txt row: a weekday pattern valid over a date range.
#[derive(Debug, Clone)]
pub struct Service {
    pub id: String,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Service {
    pub fn runs_on_date(&self, date: NaiveDate) -> bool {
        if date < self.start_date || date > self.end_date {
            return false;
        }
        match date.weekday() {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exception {
    Added,
    Removed,
}

impl From<gtfs_structures::Exception> for Exception {
    fn from(value: gtfs_structures::Exception) -> Self {
        match value {
            gtfs_structures::Exception::Added => Self::Added,
            gtfs_structures::Exception::Deleted => Self::Removed,
        }
    }
}

/// Which services operate on which dates, combining calendar.txt with the
/// single-date exceptions of calendar_dates.txt.
#[derive(Debug, Default, Clone)]
pub struct ServiceCalendar {
    pub services: FxHashMap<String, Service>,
    pub exceptions: FxHashMap<String, FxHashMap<NaiveDate, Exception>>,
}

impl ServiceCalendar {
    pub fn new(services: Vec<Service>, exceptions: Vec<(String, NaiveDate, Exception)>) -> Self {
        let mut calendar = ServiceCalendar::default();
        for service in services {
            calendar.services.insert(service.id.clone(), service);
        }
        for (service_id, date, exception) in exceptions {
            calendar
                .exceptions
                .entry(service_id)
                .or_default()
                .insert(date, exception);
        }
        calendar
    }

    pub fn runs_on_date(&self, service_id: &str, date: NaiveDate) -> bool {
        let exception = self
            .exceptions
            .get(service_id)
            .and_then(|by_date| by_date.get(&date));

        match exception {
            Some(Exception::Added) => true,
            Some(Exception::Removed) => false,
            None => self
                .services
                .get(service_id)
                .map(|s| s.runs_on_date(date))
                .unwrap_or(false),
        }
    }

    /// The service ids active on `date`.
    pub fn active_services(&self, date: NaiveDate) -> FxHashSet<String> {
        let mut active: FxHashSet<String> = self
            .services
            .values()
            .filter(|s| s.runs_on_date(date))
            .map(|s| s.id.clone())
            .collect();

        for (service_id, by_date) in &self.exceptions {
            match by_date.get(&date) {
                Some(Exception::Added) => {
                    active.insert(service_id.clone());
                }
                Some(Exception::Removed) => {
                    active.remove(service_id);
                }
                None => {}
            }
        }
        active
    }
}
