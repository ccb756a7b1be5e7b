// libs/appointment-cell/src/services/schedule.rs
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::debug;

use crate::models::{AppointmentError, Chamber, WeekdayName};

/// The clinic runs on Bangladesh time. UTC+06:00, no daylight saving.
const CLINIC_UTC_OFFSET_SECS: i32 = 6 * 3600;

fn clinic_offset() -> FixedOffset {
    FixedOffset::east_opt(CLINIC_UTC_OFFSET_SECS).unwrap()
}

/// Midnight of the given calendar day in clinic time, as a UTC instant.
/// All duplicate and capacity queries key on this instant, so bookings made
/// near midnight always bucket to the day the patient picked.
pub fn clinic_day_start(date: NaiveDate) -> DateTime<Utc> {
    let local_midnight = date.and_time(NaiveTime::MIN);
    clinic_offset()
        .from_local_datetime(&local_midnight)
        .unwrap()
        .with_timezone(&Utc)
}

/// Validates the submitted weekday label against the date's actual
/// day-of-week and returns the normalized booking instant.
pub fn resolve_booking_date(
    date: NaiveDate,
    weekday: WeekdayName,
) -> Result<DateTime<Utc>, AppointmentError> {
    let actual = WeekdayName::from_chrono(date.weekday());
    if actual != weekday {
        debug!("Weekday label {} does not match date {} ({})", weekday, date, actual);
        return Err(AppointmentError::WeekdayMismatch);
    }

    Ok(clinic_day_start(date))
}

/// Formats a stored booking instant as the clinic-local "20 Jun 2024"
/// label used in confirmation emails. Formatting in UTC would shift the
/// label to the previous evening.
pub fn clinic_date_label(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&clinic_offset())
        .format("%d %b %Y")
        .to_string()
}

/// The chamber's open window for the given weekday, or `NoVisitingHours`
/// when the day is closed.
pub fn visiting_window(
    chamber: &Chamber,
    weekday: WeekdayName,
) -> Result<(NaiveTime, NaiveTime), AppointmentError> {
    chamber
        .visiting_hours
        .day(weekday)
        .window()
        .ok_or(AppointmentError::NoVisitingHours)
}
