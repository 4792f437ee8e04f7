use crate::value::DateParts;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// Parse a wire date-time into UTC date and time-of-day parts.
///
/// Accepts RFC 3339 (any offset), the minute-precision `YYYY-MM-DDTHH:MMZ`
/// form the editor writes, and a bare `YYYY-MM-DD`.
pub(crate) fn parse(s: &str) -> Option<DateParts> {
    let s = s.trim();

    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        let utc = dt.to_offset(UtcOffset::UTC);
        return split(utc.date(), Some(utc.time()));
    }

    let minutes = PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day]T[hour]:[minute]Z"))
        .or_else(|_| {
            PrimitiveDateTime::parse(s, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        });
    if let Ok(dt) = minutes {
        return split(dt.date(), Some(dt.time()));
    }

    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .ok()
        .and_then(|date| split(date, None))
}

/// Compose `YYYY-MM-DDTHH:MMZ`, defaulting the time of day to midnight.
/// Nothing is produced without a date part.
pub(crate) fn compose(parts: &DateParts) -> Option<String> {
    let date = parts.date.as_deref().filter(|d| !d.is_empty())?;
    let time = parts
        .time
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("00:00");

    Some(format!("{date}T{time}Z"))
}

fn split(date: Date, time: Option<Time>) -> Option<DateParts> {
    let date = date.format(format_description!("[year]-[month]-[day]")).ok()?;

    let time = match time {
        None => None,
        Some(t) if t.second() == 0 && t.nanosecond() == 0 => {
            Some(t.format(format_description!("[hour]:[minute]")).ok()?)
        }
        Some(t) if t.nanosecond() == 0 => {
            Some(t.format(format_description!("[hour]:[minute]:[second]")).ok()?)
        }
        Some(t) => Some(
            t.format(format_description!("[hour]:[minute]:[second].[subsecond]"))
                .ok()?,
        ),
    };

    Some(DateParts {
        date: Some(date),
        time,
    })
}

///
/// TESTS
///
