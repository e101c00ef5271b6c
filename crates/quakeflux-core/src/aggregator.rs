use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::model::{CountryCount, DailyCount, EarthquakeEvent};

pub const DEFAULT_TOP_COUNTRIES: usize = 6;

/// Per-partition event counts. Partials combine by summation, so the merged result does
/// not depend on how the input was split or in which order partials arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialCounts {
    pub by_date: BTreeMap<NaiveDate, u64>,
    pub by_country: HashMap<String, u64>,
}

impl PartialCounts {
    /// Counts one reportable event. The calendar date is taken in `timezone`.
    pub fn observe(&mut self, event: &EarthquakeEvent, timezone: Tz) {
        let date = event.time.with_timezone(&timezone).date_naive();
        *self.by_date.entry(date).or_insert(0) += 1;
        *self.by_country.entry(event.country.clone()).or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: PartialCounts) {
        for (date, count) in other.by_date {
            *self.by_date.entry(date).or_insert(0) += count;
        }
        for (country, count) in other.by_country {
            *self.by_country.entry(country).or_insert(0) += count;
        }
    }

    pub fn total(&self) -> u64 {
        self.by_date.values().sum()
    }

    /// One row per date, ascending.
    pub fn daily_counts(&self) -> Vec<DailyCount> {
        self.by_date
            .iter()
            .map(|(date, count)| DailyCount {
                date: *date,
                count: *count,
            })
            .collect()
    }

    /// The `limit` busiest countries, by count descending. Equal counts are ordered by
    /// country name so the cut at `limit` is deterministic.
    pub fn top_countries(&self, limit: usize) -> Vec<CountryCount> {
        let mut rows: Vec<CountryCount> = self
            .by_country
            .iter()
            .map(|(country, count)| CountryCount {
                country: country.clone(),
                count: *count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));
        rows.truncate(limit);
        rows
    }
}

pub fn aggregate<'a, I>(events: I, timezone: Tz) -> PartialCounts
where
    I: IntoIterator<Item = &'a EarthquakeEvent>,
{
    let mut counts = PartialCounts::default();
    for event in events {
        counts.observe(event, timezone);
    }
    counts
}
