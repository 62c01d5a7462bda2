use chrono::{DateTime, NaiveDate, Utc};

/// Parses a shipping date given either as an RFC 3339 timestamp or as a
/// plain `YYYY-MM-DD` day, which is read as midnight UTC.
pub fn parse_shipment_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// garde rule for a required shipping date.
pub fn shipment_date(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("is required"));
    }
    match parse_shipment_date(value) {
        Some(_) => Ok(()),
        None => Err(garde::Error::new(
            "must be an RFC 3339 timestamp or a YYYY-MM-DD date",
        )),
    }
}

/// garde rule for a shipping date that may be left out.
pub fn optional_shipment_date(value: &Option<String>, ctx: &()) -> garde::Result {
    match value {
        Some(date) => shipment_date(date, ctx),
        None => Ok(()),
    }
}
