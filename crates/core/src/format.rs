//! Date formatting for console views (day-first, as the shop's staff read it).

use chrono::{DateTime, TimeZone};

/// `15/10/2026`
#[must_use]
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%d/%m/%Y").to_string()
}

/// `15/10/2026 14:03:00`
#[must_use]
pub fn format_date_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// `01/10/2026 - 15/10/2026`
#[must_use]
pub fn format_date_range<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} - {}", format_date(start), format_date(end))
}
