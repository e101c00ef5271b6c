use std::fmt;

use chrono::{DateTime, Utc};

use crate::model::{Field, NormalizedRecord};

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Why a record was dropped before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectionReason {
    /// A required field was absent or held a null sentinel.
    Missing(Field),
    /// A required field held a value that could not be coerced.
    Unparseable(Field),
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl RejectionReason {
    /// Stable key used to bucket rejections in the run report.
    pub fn code(&self) -> String {
        match self {
            RejectionReason::Missing(field) => format!("missing_{field}"),
            RejectionReason::Unparseable(field) => format!("unparseable_{field}"),
            RejectionReason::LatitudeOutOfRange(_) => "latitude_out_of_range".to_string(),
            RejectionReason::LongitudeOutOfRange(_) => "longitude_out_of_range".to_string(),
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Missing(field) => write!(f, "required field '{field}' is missing"),
            RejectionReason::Unparseable(field) => {
                write!(f, "required field '{field}' could not be parsed")
            }
            RejectionReason::LatitudeOutOfRange(value) => {
                write!(f, "latitude {value} outside [-90, 90]")
            }
            RejectionReason::LongitudeOutOfRange(value) => {
                write!(f, "longitude {value} outside [-180, 180]")
            }
        }
    }
}

/// A record whose required fields are present and whose coordinates are in range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecord {
    pub id: Option<String>,
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: Option<f64>,
    pub magnitude: f64,
    pub place: Option<String>,
}

pub fn validate(record: NormalizedRecord) -> Result<ValidRecord, RejectionReason> {
    let time = required(record.time, Field::Time, &record)?;
    let latitude = required(record.latitude, Field::Latitude, &record)?;
    let longitude = required(record.longitude, Field::Longitude, &record)?;
    let magnitude = required(record.mag, Field::Mag, &record)?;

    if !within(latitude, LATITUDE_RANGE) {
        return Err(RejectionReason::LatitudeOutOfRange(latitude));
    }
    if !within(longitude, LONGITUDE_RANGE) {
        return Err(RejectionReason::LongitudeOutOfRange(longitude));
    }

    Ok(ValidRecord {
        id: record.id,
        time,
        latitude,
        longitude,
        depth: record.depth,
        magnitude,
        place: record.place,
    })
}

fn required<T>(
    value: Option<T>,
    field: Field,
    record: &NormalizedRecord,
) -> Result<T, RejectionReason> {
    value.ok_or(if record.is_unparseable(field) {
        RejectionReason::Unparseable(field)
    } else {
        RejectionReason::Missing(field)
    })
}

fn within(value: f64, (min, max): (f64, f64)) -> bool {
    min <= value && value <= max
}
