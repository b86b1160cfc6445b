use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::debug;

use super::descriptor::{FilterDescriptor, FilterState};
use super::normalize::{normalize, record_day, record_text};

/// A fetched row, kept as the backend returned it.
pub type Record = Map<String, Value>;

/// How filter keys map onto record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Filter key to record field, for keys whose names differ.
    pub field_keys: BTreeMap<String, String>,
    /// Record field the date bounds compare against.
    pub date_field: String,
}

impl FilterConfig {
    pub fn new(date_field: impl Into<String>) -> Self {
        Self {
            field_keys: BTreeMap::new(),
            date_field: date_field.into(),
        }
    }

    pub fn with_key(
        mut self,
        filter_key: impl Into<String>,
        record_field: impl Into<String>,
    ) -> Self {
        self.field_keys.insert(filter_key.into(), record_field.into());
        self
    }

    /// Record field read for `filter_key`.
    pub fn record_field<'a>(&'a self, filter_key: &'a str) -> &'a str {
        self.field_keys
            .get(filter_key)
            .map(String::as_str)
            .unwrap_or(filter_key)
    }
}

/// Records satisfying every active filter, in their original order.
pub fn apply_filters(
    records: &[Record],
    filters: &FilterState,
    config: &FilterConfig,
) -> Vec<Record> {
    let terms: Vec<(&str, String)> = filters
        .active_terms()
        .map(|(key, value)| (config.record_field(key), normalize(value)))
        .collect();

    records
        .iter()
        .filter(|record| {
            terms
                .iter()
                .all(|(field, term)| matches_prefix(record, field, term))
                && within_bounds(record, &config.date_field, filters.start_date, filters.end_date)
        })
        .cloned()
        .collect()
}

fn matches_prefix(record: &Record, field: &str, term: &str) -> bool {
    record
        .get(field)
        .and_then(record_text)
        .map(|text| normalize(&text).starts_with(term))
        .unwrap_or(false)
}

fn within_bounds(
    record: &Record,
    date_field: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(day) = record.get(date_field).and_then(record_day) else {
        return false;
    };
    start.map_or(true, |start| day >= start) && end.map_or(true, |end| day <= end)
}

/// The full fetched set, the filter controls' values, and the derived rows a
/// table renders.
#[derive(Debug, Clone)]
pub struct FilterView {
    all: Vec<Record>,
    filtered: Vec<Record>,
    filters: FilterState,
    config: FilterConfig,
}

impl FilterView {
    pub fn new(descriptors: &[FilterDescriptor], config: FilterConfig) -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            filters: FilterState::from_descriptors(descriptors),
            config,
        }
    }

    /// Replaces the fetched set. The view shows every row until the next
    /// [`apply`](Self::apply).
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.filtered = records.clone();
        self.all = records;
    }

    pub fn all(&self) -> &[Record] {
        &self.all
    }

    pub fn filtered(&self) -> &[Record] {
        &self.filtered
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn apply(&mut self) -> &[Record] {
        self.filtered = apply_filters(&self.all, &self.filters, &self.config);
        debug!(
            total = self.all.len(),
            shown = self.filtered.len(),
            "filters applied"
        );
        &self.filtered
    }

    /// Blanks every filter and shows the full set again.
    pub fn reset(&mut self) -> &[Record] {
        self.filters.clear();
        self.filtered = self.all.clone();
        &self.filtered
    }
}
