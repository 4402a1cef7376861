// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

use crate::model::{FieldRef, FieldValue, FilterKind, Record, Schema};

/// Parameters for one filter entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    Text(String),
    DateRange {
        start: Option<Date>,
        end: Option<Date>,
    },
    NumberRange {
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub const fn date_range(start: Option<Date>, end: Option<Date>) -> Self {
        Self::DateRange { start, end }
    }

    pub const fn number_range(min: Option<f64>, max: Option<f64>) -> Self {
        Self::NumberRange { min, max }
    }

    /// An inert value matches everything; it is the same as not filtering.
    pub fn is_inert(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::DateRange { start, end } => start.is_none() && end.is_none(),
            Self::NumberRange { min, max } => min.is_none() && max.is_none(),
        }
    }

    /// Inverted ranges can never match.
    pub fn is_inverted(&self) -> bool {
        match self {
            Self::Text(_) => false,
            Self::DateRange {
                start: Some(start),
                end: Some(end),
            } => start > end,
            Self::DateRange { .. } => false,
            Self::NumberRange {
                min: Some(min),
                max: Some(max),
            } => min > max,
            Self::NumberRange { .. } => false,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.trim().to_owned(),
            Self::DateRange { start, end } => format!(
                "{}..{}",
                start.map(|date| date.to_string()).unwrap_or_default(),
                end.map(|date| date.to_string()).unwrap_or_default()
            ),
            Self::NumberRange { min, max } => format!(
                "{}..{}",
                min.map(|value| FieldRef::Number(value).display())
                    .unwrap_or_default(),
                max.map(|value| FieldRef::Number(value).display())
                    .unwrap_or_default()
            ),
        }
    }
}

/// Filter name to parameters. Inert values are dropped on insert and on
/// decode, so an entry in here is always active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FilterEntries")]
pub struct FilterState {
    entries: BTreeMap<String, FilterValue>,
}

#[derive(Deserialize)]
struct FilterEntries {
    #[serde(default)]
    entries: BTreeMap<String, FilterValue>,
}

impl From<FilterEntries> for FilterState {
    fn from(raw: FilterEntries) -> Self {
        raw.entries
            .into_iter()
            .fold(Self::default(), |state, (name, value)| state.with(name, value))
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: FilterValue) -> Self {
        self.set(name, value);
        self
    }

    /// Returns whether the observable filter set changed.
    pub fn set(&mut self, name: impl Into<String>, value: FilterValue) -> bool {
        let name = name.into();
        if value.is_inert() {
            return self.entries.remove(&name).is_some();
        }
        match self.entries.get(&name) {
            Some(existing) if *existing == value => false,
            _ => {
                self.entries.insert(name, value);
                true
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FilterValue> {
        self.entries.remove(name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.entries.get(name)
    }

    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Predicate<'s> {
    Contains { field: &'s str, needle: String },
    Exact { field: &'s str, expected: String },
    DateRange {
        field: &'s str,
        start: Option<Date>,
        end: Option<Date>,
    },
    NumberRange {
        field: &'s str,
        min: Option<f64>,
        max: Option<f64>,
    },
    Never,
}

impl Predicate<'_> {
    fn test<R: Record>(&self, record: &R) -> bool {
        match self {
            Self::Contains { field, needle } => record
                .field(field)
                .and_then(|value| value.as_text())
                .is_some_and(|value| value.to_lowercase().contains(needle.as_str())),
            Self::Exact { field, expected } => record
                .field(field)
                .and_then(|value| value.as_text())
                .is_some_and(|value| value.trim().to_lowercase() == *expected),
            Self::DateRange { field, start, end } => match record.field(field) {
                Some(FieldRef::Date(date)) => {
                    start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
                }
                _ => false,
            },
            Self::NumberRange { field, min, max } => match record.field(field) {
                Some(FieldRef::Number(value)) => {
                    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
                }
                _ => false,
            },
            Self::Never => false,
        }
    }
}

/// Filter names missing from the schema are skipped on purpose: callers may
/// carry filter keys for fields a given record type does not have yet.
fn compile<'s>(filters: &FilterState, schema: &'s Schema) -> Vec<Predicate<'s>> {
    let mut predicates = Vec::with_capacity(filters.len());
    for (name, value) in filters.active() {
        let Some(descriptor) = schema.resolve_filter(name) else {
            tracing::debug!(filter = name, "ignoring unknown filter");
            continue;
        };
        let field = descriptor.field;
        let predicate = match (descriptor.kind, value) {
            (_, value) if value.is_inverted() => {
                tracing::debug!(filter = name, "inverted range filter matches nothing");
                Predicate::Never
            }
            (FilterKind::Contains, FilterValue::Text(needle)) => Predicate::Contains {
                field,
                needle: needle.trim().to_lowercase(),
            },
            (FilterKind::Exact, FilterValue::Text(expected)) => Predicate::Exact {
                field,
                expected: expected.trim().to_lowercase(),
            },
            (FilterKind::DateRange, FilterValue::DateRange { start, end }) => {
                Predicate::DateRange {
                    field,
                    start: *start,
                    end: *end,
                }
            }
            (FilterKind::NumberRange, FilterValue::NumberRange { min, max }) => {
                Predicate::NumberRange {
                    field,
                    min: *min,
                    max: *max,
                }
            }
            (kind, _) => {
                tracing::debug!(filter = name, ?kind, "filter value does not fit filter kind");
                Predicate::Never
            }
        };
        predicates.push(predicate);
    }
    predicates
}

/// True when the record satisfies every active filter.
pub fn matches<R: Record>(record: &R, filters: &FilterState, schema: &Schema) -> bool {
    compile(filters, schema)
        .iter()
        .all(|predicate| predicate.test(record))
}

/// Keeps the records that satisfy every active filter, in input order.
pub fn filter_records<'r, R: Record>(
    records: &'r [R],
    filters: &FilterState,
    schema: &Schema,
) -> Vec<&'r R> {
    let predicates = compile(filters, schema);
    records
        .iter()
        .filter(|record| predicates.iter().all(|predicate| predicate.test(*record)))
        .collect()
}

/// Sorted, de-duplicated values present for `field`, for dropdown options.
pub fn distinct_values<R: Record>(records: &[R], field: &str) -> Vec<FieldValue> {
    let mut values: Vec<FieldRef<'_>> = records
        .iter()
        .filter_map(|record| record.field(field))
        .collect();
    values.sort_by(|left, right| {
        left.cmp_same_kind(right)
            .unwrap_or_else(|| left.kind().as_str().cmp(right.kind().as_str()))
    });
    values.dedup();
    values.into_iter().map(FieldRef::to_value).collect()
}
