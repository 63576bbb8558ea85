use std::fmt::Display;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Fecha del backend → `dd/mm/aaaa`. Si no se reconoce, se devuelve tal cual.
pub fn format_date(raw: &str) -> String {
    if let Some(dt) = parse_datetime(raw) {
        return dt.format("%d/%m/%Y").to_string();
    }
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Fecha y hora del backend → `dd/mm/aaaa HH:MM`
pub fn format_datetime(raw: &str) -> String {
    match parse_datetime(raw) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        None => format_date(raw),
    }
}

/// Instante del dispositivo (p. ej. la hora del escaneo) en hora local
pub fn format_local_time(at: &DateTime<Utc>) -> String {
    format_in_zone(at, &Local)
}

fn format_in_zone<Tz>(at: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(zone).format("%d/%m/%Y %H:%M").to_string()
}
