use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quakeflux_parser::RawRecord;

use crate::model::{Field, NormalizedRecord};

/// Cell values that mean "no value" in any column, matched exactly.
pub const NULL_SENTINELS: [&str; 5] = ["", "null", "NULL", "NaN", "nan"];

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn is_null_sentinel(value: &str) -> bool {
    NULL_SENTINELS.contains(&value)
}

/// Coerces a raw record into typed fields. Never fails: sentinels and values that cannot
/// be coerced become `None`, and the latter are listed in `unparseable`.
pub fn normalize_record(raw: &RawRecord) -> NormalizedRecord {
    let mut unparseable = Vec::new();

    let id = present(raw, Field::Id).map(str::to_string);
    let place = present(raw, Field::Place).map(str::to_string);
    let time = coerce(raw, Field::Time, parse_timestamp, &mut unparseable);
    let latitude = coerce(raw, Field::Latitude, parse_real, &mut unparseable);
    let longitude = coerce(raw, Field::Longitude, parse_real, &mut unparseable);
    let depth = coerce(raw, Field::Depth, parse_real, &mut unparseable);
    let mag = coerce(raw, Field::Mag, parse_real, &mut unparseable);

    NormalizedRecord {
        id,
        time,
        latitude,
        longitude,
        depth,
        mag,
        place,
        unparseable,
    }
}

fn present(raw: &RawRecord, field: Field) -> Option<&str> {
    raw.get(field.column_name())
        .filter(|value| !is_null_sentinel(value))
}

fn coerce<T>(
    raw: &RawRecord,
    field: Field,
    parse: fn(&str) -> Option<T>,
    unparseable: &mut Vec<Field>,
) -> Option<T> {
    let value = present(raw, field)?;
    let parsed = parse(value);
    if parsed.is_none() {
        unparseable.push(field);
    }
    parsed
}

/// Accepts RFC 3339 (any offset, converted to UTC), naive date-times and bare dates.
/// Naive values are taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn parse_real(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_common_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2025, 4, 1, 6, 12, 44).unwrap();

        assert_eq!(parse_timestamp("2025-04-01T06:12:44Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-04-01T08:12:44+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-04-01T06:12:44"), Some(expected));
        assert_eq!(parse_timestamp(" 2025-04-01 06:12:44 "), Some(expected));
        assert_eq!(
            parse_timestamp("2025-04-01"),
            Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-04-01T06:12:44.120Z").map(|ts| ts.timestamp_millis()),
            Some(expected.timestamp_millis() + 120)
        );
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2025-13-01"), None);
    }

    #[test]
    fn real_parsing_trims_and_drops_nan() {
        assert_eq!(parse_real(" 4.5 "), Some(4.5));
        assert_eq!(parse_real("-12"), Some(-12.0));
        assert_eq!(parse_real("NAN"), None);
        assert_eq!(parse_real("4.5km"), None);
    }
}
