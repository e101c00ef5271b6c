use chrono::{TimeZone, Utc};
use quakeflux_core::model::Field;
use quakeflux_core::normalizer::{normalize_record, NULL_SENTINELS};
use quakeflux_core::validity::{validate, RejectionReason};
use quakeflux_parser::RawRecord;

fn raw(latitude: &str, longitude: &str) -> RawRecord {
    RawRecord::from_pairs([
        ("id", "us1"),
        ("time", "2025-04-01T06:12:44Z"),
        ("latitude", latitude),
        ("longitude", longitude),
        ("depth", "10.0"),
        ("mag", "4.2"),
        ("place", "10 km SE of Kathmandu, Nepal"),
        ("magType", "mb"),
    ])
}

fn check(latitude: &str, longitude: &str) -> Result<(), RejectionReason> {
    validate(normalize_record(&raw(latitude, longitude))).map(|_| ())
}

#[test]
fn normalizer_projects_typed_fields() {
    let record = normalize_record(&raw("27.7", "85.3"));

    assert_eq!(record.id.as_deref(), Some("us1"));
    assert_eq!(
        record.time,
        Some(Utc.with_ymd_and_hms(2025, 4, 1, 6, 12, 44).unwrap())
    );
    assert_eq!(record.latitude, Some(27.7));
    assert_eq!(record.longitude, Some(85.3));
    assert_eq!(record.depth, Some(10.0));
    assert_eq!(record.mag, Some(4.2));
    assert_eq!(record.place.as_deref(), Some("10 km SE of Kathmandu, Nepal"));
    assert!(record.unparseable.is_empty());
}

#[test]
fn sentinels_are_absent_in_every_field() {
    for sentinel in NULL_SENTINELS {
        let pairs: Vec<(&str, &str)> = Field::ALL
            .iter()
            .map(|field| (field.column_name(), sentinel))
            .collect();
        let record = normalize_record(&RawRecord::from_pairs(pairs));

        assert_eq!(record.id, None, "sentinel {sentinel:?}");
        assert_eq!(record.time, None);
        assert_eq!(record.latitude, None);
        assert_eq!(record.longitude, None);
        assert_eq!(record.depth, None);
        assert_eq!(record.mag, None);
        assert_eq!(record.place, None);
        assert!(record.unparseable.is_empty(), "sentinel {sentinel:?} counted as unparseable");
    }
}

#[test]
fn sentinel_matching_is_exact() {
    let mut record = raw("27.7", "85.3");
    record.insert("place", "Null");
    record.insert("id", " null");

    let normalized = normalize_record(&record);
    assert_eq!(normalized.place.as_deref(), Some("Null"));
    assert_eq!(normalized.id.as_deref(), Some(" null"));
}

#[test]
fn optional_fields_never_cause_rejection() {
    let mut record = raw("27.7", "85.3");
    record.insert("depth", "NaN");
    record.insert("place", "");
    record.insert("id", "null");

    let valid = validate(normalize_record(&record)).expect("depth/place/id are optional");
    assert_eq!(valid.depth, None);
    assert_eq!(valid.place, None);
    assert_eq!(valid.id, None);
}

#[test]
fn unparseable_depth_is_dropped_not_rejected() {
    let mut record = raw("27.7", "85.3");
    record.insert("depth", "deep");

    let normalized = normalize_record(&record);
    assert_eq!(normalized.unparseable, vec![Field::Depth]);
    assert!(validate(normalized).is_ok());
}

#[test]
fn missing_and_unparseable_required_fields_are_distinguished() {
    let mut record = raw("27.7", "85.3");
    record.insert("time", "NULL");
    assert_eq!(
        validate(normalize_record(&record)),
        Err(RejectionReason::Missing(Field::Time))
    );

    let mut record = raw("27.7", "85.3");
    record.insert("time", "last tuesday");
    assert_eq!(
        validate(normalize_record(&record)),
        Err(RejectionReason::Unparseable(Field::Time))
    );

    let mut record = raw("27.7", "85.3");
    record.insert("mag", "strong");
    assert_eq!(
        validate(normalize_record(&record)),
        Err(RejectionReason::Unparseable(Field::Mag))
    );

    let record = RawRecord::from_pairs([
        ("time", "2025-04-01T06:12:44Z"),
        ("latitude", "27.7"),
        ("longitude", "85.3"),
    ]);
    assert_eq!(
        validate(normalize_record(&record)),
        Err(RejectionReason::Missing(Field::Mag))
    );
}

#[test]
fn coordinate_boundaries_are_inclusive() {
    assert!(check("90.0", "0").is_ok());
    assert!(check("-90.0", "0").is_ok());
    assert!(check("0", "180.0").is_ok());
    assert!(check("0", "-180.0").is_ok());

    assert_eq!(
        check("90.0001", "0"),
        Err(RejectionReason::LatitudeOutOfRange(90.0001))
    );
    assert_eq!(
        check("-90.0001", "0"),
        Err(RejectionReason::LatitudeOutOfRange(-90.0001))
    );
    assert_eq!(
        check("0", "180.0001"),
        Err(RejectionReason::LongitudeOutOfRange(180.0001))
    );
    assert_eq!(
        check("0", "-180.0001"),
        Err(RejectionReason::LongitudeOutOfRange(-180.0001))
    );
}

#[test]
fn infinite_coordinates_are_out_of_range() {
    assert!(matches!(
        check("inf", "0"),
        Err(RejectionReason::LatitudeOutOfRange(_))
    ));
}

#[test]
fn rejection_codes_are_stable() {
    assert_eq!(RejectionReason::Missing(Field::Latitude).code(), "missing_latitude");
    assert_eq!(RejectionReason::Unparseable(Field::Mag).code(), "unparseable_mag");
    assert_eq!(
        RejectionReason::LongitudeOutOfRange(200.0).code(),
        "longitude_out_of_range"
    );
}
