use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::America::Santiago;

/// Wire format for travel dates.
pub const TRAVEL_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_travel_date(date: NaiveDate) -> String {
    date.format(TRAVEL_DATE_FORMAT).to_string()
}

/// The operator's calendar day in the fixed reference timezone. Date-picker
/// disablement uses this, never the host timezone, so a browser in another
/// zone cannot shift the cutoff by a day.
pub fn current_travel_day(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Santiago).date_naive()
}

pub fn is_past_travel_date(date: NaiveDate, now: DateTime<Utc>) -> bool {
    date < current_travel_day(now)
}
