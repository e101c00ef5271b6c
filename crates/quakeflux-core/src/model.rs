use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::MagnitudeBucket;

/// Typed fields read from a raw record. Every other column of the extract is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Time,
    Latitude,
    Longitude,
    Depth,
    Mag,
    Place,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Id,
        Field::Time,
        Field::Latitude,
        Field::Longitude,
        Field::Depth,
        Field::Mag,
        Field::Place,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Time => "time",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Depth => "depth",
            Field::Mag => "mag",
            Field::Place => "place",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A raw record projected onto the typed fields. `None` means absent: a sentinel, a
/// missing cell, or a value that failed coercion (listed in `unparseable`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    pub id: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub depth: Option<f64>,
    pub mag: Option<f64>,
    pub place: Option<String>,
    pub unparseable: Vec<Field>,
}

impl NormalizedRecord {
    pub fn is_unparseable(&self, field: Field) -> bool {
        self.unparseable.contains(&field)
    }
}

/// A validated, classified and country-resolved seismic event.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeEvent {
    pub id: Option<String>,
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: Option<f64>,
    pub magnitude: f64,
    pub place: Option<String>,
    pub magnitude_bucket: MagnitudeBucket,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}
