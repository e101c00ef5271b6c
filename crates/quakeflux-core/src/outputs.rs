use std::fs::{self, File};
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::{DataFrame, DataType, NamedFrom, PolarsError, Series, TimeUnit};
use thiserror::Error;
use tracing::info;

use crate::model::{CountryCount, DailyCount, EarthquakeEvent};
use crate::pipeline::PipelineOutput;
use crate::report::RunReport;

pub const EVENTS_TABLE: &str = "earthquakes";
pub const DAILY_TABLE: &str = "earthquakes_daily";
pub const TOP_COUNTRIES_TABLE: &str = "earthquakes_top6";
pub const RUN_REPORT_FILE: &str = "run_report.json";

pub const EVENT_COLUMNS: [&str; 9] = [
    "id",
    "time",
    "latitude",
    "longitude",
    "depth",
    "magnitude",
    "place",
    "magnitude_bucket",
    "country",
];

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize run report: {0}")]
    Json(#[from] serde_json::Error),
}

/// The three published tables of a run.
#[derive(Debug, Clone)]
pub struct OutputTables {
    pub events: DataFrame,
    pub daily: DataFrame,
    pub countries: DataFrame,
}

impl OutputTables {
    pub fn from_output(output: &PipelineOutput) -> Result<Self, OutputError> {
        Ok(Self {
            events: events_frame(&output.events)?,
            daily: daily_frame(&output.daily)?,
            countries: countries_frame(&output.countries)?,
        })
    }
}

pub fn events_frame(events: &[EarthquakeEvent]) -> Result<DataFrame, OutputError> {
    let utc_micros = DataType::Datetime(
        TimeUnit::Microseconds,
        Some(polars::prelude::TimeZone::UTC),
    );

    let time = Series::new(
        "time".into(),
        events
            .iter()
            .map(|event| event.time.timestamp_micros())
            .collect::<Vec<i64>>(),
    )
    .cast(&utc_micros)?;

    let df = DataFrame::new(vec![
        Series::new(
            "id".into(),
            events
                .iter()
                .map(|event| event.id.as_deref())
                .collect::<Vec<Option<&str>>>(),
        )
        .into(),
        time.into(),
        Series::new(
            "latitude".into(),
            events.iter().map(|event| event.latitude).collect::<Vec<f64>>(),
        )
        .into(),
        Series::new(
            "longitude".into(),
            events.iter().map(|event| event.longitude).collect::<Vec<f64>>(),
        )
        .into(),
        Series::new(
            "depth".into(),
            events.iter().map(|event| event.depth).collect::<Vec<Option<f64>>>(),
        )
        .into(),
        Series::new(
            "magnitude".into(),
            events.iter().map(|event| event.magnitude).collect::<Vec<f64>>(),
        )
        .into(),
        Series::new(
            "place".into(),
            events
                .iter()
                .map(|event| event.place.as_deref())
                .collect::<Vec<Option<&str>>>(),
        )
        .into(),
        Series::new(
            "magnitude_bucket".into(),
            events
                .iter()
                .map(|event| event.magnitude_bucket.label())
                .collect::<Vec<&str>>(),
        )
        .into(),
        Series::new(
            "country".into(),
            events
                .iter()
                .map(|event| event.country.as_str())
                .collect::<Vec<&str>>(),
        )
        .into(),
    ])?;

    Ok(df)
}

pub fn daily_frame(rows: &[DailyCount]) -> Result<DataFrame, OutputError> {
    let date = Series::new(
        "date".into(),
        rows.iter()
            .map(|row| days_since_epoch(row.date))
            .collect::<Vec<i32>>(),
    )
    .cast(&DataType::Date)?;
    let count = Series::new(
        "count".into(),
        rows.iter().map(|row| row.count).collect::<Vec<u64>>(),
    );

    Ok(DataFrame::new(vec![date.into(), count.into()])?)
}

pub fn countries_frame(rows: &[CountryCount]) -> Result<DataFrame, OutputError> {
    let country = Series::new(
        "country".into(),
        rows.iter()
            .map(|row| row.country.as_str())
            .collect::<Vec<&str>>(),
    );
    let count = Series::new(
        "count".into(),
        rows.iter().map(|row| row.count).collect::<Vec<u64>>(),
    );

    Ok(DataFrame::new(vec![country.into(), count.into()])?)
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    // Polars dates are i32 day offsets from 1970-01-01.
    date.signed_duration_since(DateTime::<Utc>::UNIX_EPOCH.date_naive())
        .num_days() as i32
}

/// Storage capability the pipeline publishes through. Implementations own the format
/// and the layout.
pub trait TableSink {
    fn write_table(&self, name: &str, table: &mut DataFrame) -> Result<(), OutputError>;
    fn write_report(&self, report: &RunReport) -> Result<(), OutputError>;
}

/// Writes each table as `<root>/<name>/part-00000.parquet`, replacing whatever the
/// table directory held before.
#[derive(Debug, Clone)]
pub struct ParquetDirectorySink {
    root: PathBuf,
}

impl ParquetDirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn table_path(&self, name: &str) -> PathBuf {
        self.root.join(name).join("part-00000.parquet")
    }
}

impl TableSink for ParquetDirectorySink {
    fn write_table(&self, name: &str, table: &mut DataFrame) -> Result<(), OutputError> {
        let dir = self.root.join(name);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|source| OutputError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&dir).map_err(|source| OutputError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = self.table_path(name);
        let file = File::create(&path).map_err(|source| OutputError::Io {
            path: path.clone(),
            source,
        })?;
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Zstd(None))
            .with_statistics(StatisticsOptions::default())
            .finish(table)?;

        info!(table = name, rows = table.height(), path = %path.display(), "table written");
        Ok(())
    }

    fn write_report(&self, report: &RunReport) -> Result<(), OutputError> {
        fs::create_dir_all(&self.root).map_err(|source| OutputError::Io {
            path: self.root.clone(),
            source,
        })?;
        let path = self.root.join(RUN_REPORT_FILE);
        let bytes = serde_json::to_vec_pretty(report)?;
        fs::write(&path, bytes).map_err(|source| OutputError::Io { path, source })?;
        Ok(())
    }
}

/// Publishes all three tables and the run report through `sink`.
pub fn publish(sink: &dyn TableSink, output: &PipelineOutput) -> Result<(), OutputError> {
    let mut tables = OutputTables::from_output(output)?;
    sink.write_table(EVENTS_TABLE, &mut tables.events)?;
    sink.write_table(DAILY_TABLE, &mut tables.daily)?;
    sink.write_table(TOP_COUNTRIES_TABLE, &mut tables.countries)?;
    sink.write_report(&output.report)?;
    Ok(())
}
