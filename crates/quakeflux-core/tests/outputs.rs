use std::fs;

use anyhow::Result;
use quakeflux_core::outputs::{
    publish, OutputTables, ParquetDirectorySink, TableSink, DAILY_TABLE, EVENTS_TABLE,
    EVENT_COLUMNS, RUN_REPORT_FILE, TOP_COUNTRIES_TABLE,
};
use quakeflux_core::pipeline::{run_records, PipelineOptions, PipelineOutput};
use quakeflux_core::report::RunReport;
use quakeflux_parser::RawRecord;

fn sample_output(partitions: usize) -> Result<PipelineOutput> {
    let rows = [
        ("a", "2025-04-01T06:00:00Z", "27.7", "85.3", "4.6", "10 km SE of Kathmandu, Nepal"),
        ("b", "2025-04-01T09:00:00Z", "38.2", "142.1", "5.2", "offshore Japan trench"),
        ("c", "2025-04-02T00:00:00Z", "0.0", "0.0", "2.1", ""),
        ("d", "2025-04-03T12:00:00Z", "28.0", "85.0", "6.1", ""),
        ("e", "2025-04-03T13:00:00Z", "-33.4", "-70.6", "2.4", "near Santiago, Chile"),
    ];
    let records: Vec<RawRecord> = rows
        .iter()
        .map(|(id, time, lat, lon, mag, place)| {
            RawRecord::from_pairs([
                ("id", *id),
                ("time", *time),
                ("latitude", *lat),
                ("longitude", *lon),
                ("depth", "NaN"),
                ("mag", *mag),
                ("place", *place),
            ])
        })
        .collect();

    Ok(run_records(
        &records,
        &PipelineOptions {
            partitions,
            ..PipelineOptions::default()
        },
    )?)
}

#[test]
fn tables_have_fixed_schemas() -> Result<()> {
    let output = sample_output(2)?;
    let tables = OutputTables::from_output(&output)?;

    assert_eq!(tables.events.get_column_names(), EVENT_COLUMNS);
    assert_eq!(tables.events.height(), 4);
    assert_eq!(tables.daily.get_column_names(), ["date", "count"]);
    assert_eq!(tables.daily.height(), 2);
    assert_eq!(tables.countries.get_column_names(), ["country", "count"]);

    let countries = tables.countries.column("country")?.str()?;
    assert_eq!(countries.get(0), Some("Nepal"));
    assert_eq!(countries.get(1), Some("Chile"));
    assert_eq!(countries.get(2), Some("Japan"));

    let buckets = tables.events.column("magnitude_bucket")?.str()?;
    assert_eq!(buckets.get(0), Some("4–5"));
    assert_eq!(buckets.get(2), Some("6+"));

    let depth = tables.events.column("depth")?.f64()?;
    assert_eq!(depth.null_count(), 4);
    Ok(())
}

#[test]
fn parquet_sink_publishes_every_table_and_report() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let sink = ParquetDirectorySink::new(dir.path());
    let output = sample_output(3)?;

    publish(&sink, &output)?;

    for table in [EVENTS_TABLE, DAILY_TABLE, TOP_COUNTRIES_TABLE] {
        assert!(sink.table_path(table).is_file(), "{table} missing");
    }
    let report: RunReport =
        serde_json::from_slice(&fs::read(dir.path().join(RUN_REPORT_FILE))?)?;
    assert_eq!(report.emitted, 4);
    assert_eq!(report.unresolved, 1);
    Ok(())
}

#[test]
fn parquet_sink_overwrites_previous_runs() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let sink = ParquetDirectorySink::new(dir.path());
    let stale = dir.path().join(EVENTS_TABLE).join("part-00007.parquet");
    fs::create_dir_all(stale.parent().expect("parent"))?;
    fs::write(&stale, b"stale")?;

    let mut tables = OutputTables::from_output(&sample_output(1)?)?;
    sink.write_table(EVENTS_TABLE, &mut tables.events)?;

    assert!(!stale.exists());
    let entries = fs::read_dir(dir.path().join(EVENTS_TABLE))?.count();
    assert_eq!(entries, 1);
    Ok(())
}

#[test]
fn reruns_produce_identical_bytes() -> Result<()> {
    let first = tempfile::tempdir()?;
    let second = tempfile::tempdir()?;
    let first_sink = ParquetDirectorySink::new(first.path());
    let second_sink = ParquetDirectorySink::new(second.path());

    publish(&first_sink, &sample_output(1)?)?;
    publish(&second_sink, &sample_output(4)?)?;

    for table in [EVENTS_TABLE, DAILY_TABLE, TOP_COUNTRIES_TABLE] {
        assert_eq!(
            fs::read(first_sink.table_path(table))?,
            fs::read(second_sink.table_path(table))?,
            "{table} differs between runs"
        );
    }
    Ok(())
}
