use chrono::{DateTime, NaiveDateTime, Utc};

pub fn from_rfc3339(s: &str) -> chrono::ParseResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// Parses a date as entered in a scheduling form. Accepts full RFC 3339 as
/// well as the zone-less `YYYY-MM-DDTHH:MM[:SS]` form, which is read as UTC.
pub fn parse_form_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = from_rfc3339(raw) {
        return Some(dt);
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
