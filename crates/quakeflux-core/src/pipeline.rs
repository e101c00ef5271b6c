use std::num::NonZeroUsize;
use std::thread;

use chrono_tz::Tz;
use quakeflux_parser::{RawRecord, RawTable};
use tracing::{debug, info, trace, warn};

use crate::aggregator::{PartialCounts, DEFAULT_TOP_COUNTRIES};
use crate::classifier::classify_magnitude;
use crate::error::{PipelineError, Result};
use crate::model::{CountryCount, DailyCount, EarthquakeEvent};
use crate::normalizer::normalize_record;
use crate::report::{InputSummary, RunReport};
use crate::resolver::{resolve_country, UNKNOWN_COUNTRY};
use crate::validity::{validate, RejectionReason};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Zone whose calendar dates bucket the daily counts.
    pub timezone: Tz,
    pub top_countries: usize,
    pub partitions: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            top_countries: DEFAULT_TOP_COUNTRIES,
            partitions: default_partitions(),
        }
    }
}

impl PipelineOptions {
    pub fn validate(&self) -> Result<()> {
        if self.top_countries == 0 {
            return Err(PipelineError::InvalidOptions(
                "top_countries must be at least 1".to_string(),
            ));
        }
        if self.partitions == 0 {
            return Err(PipelineError::InvalidOptions(
                "partitions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn default_partitions() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// What happened to a single raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Accepted(EarthquakeEvent),
    /// Valid, but no tier could name a country. Excluded from every output.
    Unresolved(EarthquakeEvent),
    Rejected(RejectionReason),
}

/// Normalizes, validates, classifies and resolves one record. Pure: depends only on
/// the record and the static gazetteers.
pub fn process_record(raw: &RawRecord) -> RecordOutcome {
    let valid = match validate(normalize_record(raw)) {
        Ok(valid) => valid,
        Err(reason) => return RecordOutcome::Rejected(reason),
    };

    let magnitude_bucket = classify_magnitude(valid.magnitude);
    let country = resolve_country(valid.latitude, valid.longitude, valid.place.as_deref());

    let event = EarthquakeEvent {
        id: valid.id,
        time: valid.time,
        latitude: valid.latitude,
        longitude: valid.longitude,
        depth: valid.depth,
        magnitude: valid.magnitude,
        place: valid.place,
        magnitude_bucket,
        country,
    };

    if event.country == UNKNOWN_COUNTRY {
        RecordOutcome::Unresolved(event)
    } else {
        RecordOutcome::Accepted(event)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Reportable events in input order.
    pub events: Vec<EarthquakeEvent>,
    pub daily: Vec<DailyCount>,
    pub countries: Vec<CountryCount>,
    pub report: RunReport,
}

struct PartitionResult {
    events: Vec<EarthquakeEvent>,
    counts: PartialCounts,
    report: RunReport,
}

pub fn run_pipeline(table: &RawTable, options: &PipelineOptions) -> Result<PipelineOutput> {
    let mut output = run_records(&table.records, options)?;
    output.report.input = table.metadata.as_ref().map(|metadata| InputSummary {
        path: metadata
            .path
            .as_ref()
            .map(|path| path.display().to_string()),
        file_hash: metadata.file_hash.clone(),
    });
    Ok(output)
}

/// Runs the per-record stages over contiguous partitions on scoped worker threads, then
/// merges the partition-local counts. Output is identical for any partition count.
pub fn run_records(records: &[RawRecord], options: &PipelineOptions) -> Result<PipelineOutput> {
    options.validate()?;

    let chunk_size = records.len().div_ceil(options.partitions).max(1);
    let timezone = options.timezone;

    let partitions = thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk_size)
            .enumerate()
            .map(|(index, chunk)| scope.spawn(move || process_partition(index, chunk, timezone)))
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| {
                handle
                    .join()
                    .map_err(|_| PipelineError::WorkerPanicked(index))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let mut report = RunReport {
        timezone: timezone.name().to_string(),
        partitions: partitions.len(),
        ..RunReport::default()
    };
    let mut counts = PartialCounts::default();
    let mut events = Vec::with_capacity(records.len());

    for partition in partitions {
        report.merge_counts(&partition.report);
        counts.merge(partition.counts);
        events.extend(partition.events);
    }

    let daily = counts.daily_counts();
    let countries = counts.top_countries(options.top_countries);
    report.daily_rows = daily.len();
    report.country_rows = countries.len();

    info!(
        input_rows = report.input_rows,
        emitted = report.emitted,
        unresolved = report.unresolved,
        rejected = report.rejected,
        partitions = report.partitions,
        "pipeline run complete"
    );
    if report.emitted == 0 && report.input_rows > 0 {
        warn!("no reportable events survived validation and country resolution");
    }

    Ok(PipelineOutput {
        events,
        daily,
        countries,
        report,
    })
}

fn process_partition(index: usize, records: &[RawRecord], timezone: Tz) -> PartitionResult {
    let mut events = Vec::with_capacity(records.len());
    let mut counts = PartialCounts::default();
    let mut report = RunReport {
        input_rows: records.len(),
        ..RunReport::default()
    };

    for (offset, raw) in records.iter().enumerate() {
        match process_record(raw) {
            RecordOutcome::Accepted(event) => {
                counts.observe(&event, timezone);
                events.push(event);
            }
            RecordOutcome::Unresolved(event) => {
                trace!(partition = index, offset, id = ?event.id, "country unresolved");
                report.unresolved += 1;
            }
            RecordOutcome::Rejected(reason) => {
                trace!(partition = index, offset, %reason, "record rejected");
                report.record_rejection(&reason);
            }
        }
    }
    report.emitted = events.len();

    debug!(
        partition = index,
        rows = records.len(),
        emitted = report.emitted,
        rejected = report.rejected,
        "partition processed"
    );

    PartitionResult {
        events,
        counts,
        report,
    }
}
