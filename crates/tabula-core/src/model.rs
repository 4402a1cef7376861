// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::Date;

use crate::ids::RecordId;

/// Anything the engine can put in a table: a stable id plus named fields.
pub trait Record {
    fn id(&self) -> RecordId;

    /// Resolves a named field. `None` means the record has no value for it.
    fn field(&self, name: &str) -> Option<FieldRef<'_>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Category,
}

impl FieldKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Category => "category",
        }
    }

    pub const fn default_filter(self) -> FilterKind {
        match self {
            Self::Text => FilterKind::Contains,
            Self::Number => FilterKind::NumberRange,
            Self::Date => FilterKind::DateRange,
            Self::Category => FilterKind::Exact,
        }
    }
}

/// Borrowed view of one field value. Filtering and sorting only ever look
/// at these, so record contents are never cloned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Text(&'a str),
    Number(f64),
    Date(Date),
    Category(&'a str),
}

impl<'a> FieldRef<'a> {
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Number(_) => FieldKind::Number,
            Self::Date(_) => FieldKind::Date,
            Self::Category(_) => FieldKind::Category,
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Self::Text(value) | Self::Category(value) => Some(*value),
            Self::Number(_) | Self::Date(_) => None,
        }
    }

    pub fn to_value(self) -> FieldValue {
        match self {
            Self::Text(value) => FieldValue::Text(value.to_owned()),
            Self::Number(value) => FieldValue::Number(value),
            Self::Date(value) => FieldValue::Date(value),
            Self::Category(value) => FieldValue::Category(value.to_owned()),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Text(value) | Self::Category(value) => (*value).to_owned(),
            Self::Number(value) => format_number(*value),
            Self::Date(value) => value.to_string(),
        }
    }

    /// Ordering between two values of the same kind. Strings compare
    /// byte-wise and case-sensitively; mismatched kinds are `None`.
    pub fn cmp_same_kind(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(left), Self::Text(right))
            | (Self::Category(left), Self::Category(right)) => Some(left.cmp(right)),
            (Self::Number(left), Self::Number(right)) => Some(left.total_cmp(right)),
            (Self::Date(left), Self::Date(right)) => Some(left.cmp(right)),
            _ => None,
        }
    }
}

/// Owned field value, used where values outlive the records they came from
/// (filter dropdown options, for one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(Date),
    Category(String),
}

impl FieldValue {
    pub fn as_field_ref(&self) -> FieldRef<'_> {
        match self {
            Self::Text(value) => FieldRef::Text(value),
            Self::Number(value) => FieldRef::Number(*value),
            Self::Date(value) => FieldRef::Date(*value),
            Self::Category(value) => FieldRef::Category(value),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.as_field_ref().kind()
    }

    pub fn display(&self) -> String {
        self.as_field_ref().display()
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    /// Case-insensitive substring.
    Contains,
    /// Case-insensitive equality.
    Exact,
    DateRange,
    NumberRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind }
    }
}

/// A named filter that targets a field under a different name, such as
/// `dateRange` over `opened`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDescriptor {
    pub name: &'static str,
    pub field: &'static str,
    pub kind: FilterKind,
}

impl FilterDescriptor {
    pub const fn new(name: &'static str, field: &'static str, kind: FilterKind) -> Self {
        Self { name, field, kind }
    }
}

/// Field descriptor table. Every sort key and filter name is resolved
/// against it once per recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    fields: &'static [FieldDescriptor],
    filters: &'static [FilterDescriptor],
}

impl Schema {
    pub const fn new(
        fields: &'static [FieldDescriptor],
        filters: &'static [FilterDescriptor],
    ) -> Self {
        Self { fields, filters }
    }

    pub const fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    pub const fn filters(&self) -> &'static [FilterDescriptor] {
        self.filters
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Explicit filter descriptors win; otherwise a filter named after a
    /// field gets that field's default predicate.
    pub fn resolve_filter(&self, name: &str) -> Option<FilterDescriptor> {
        if let Some(filter) = self.filters.iter().find(|filter| filter.name == name) {
            return Some(*filter);
        }
        self.field(name)
            .map(|field| FilterDescriptor::new(field.name, field.name, field.kind.default_filter()))
    }

    /// Every filter name the schema answers to, explicit ones first.
    pub fn filter_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.filters.iter().map(|filter| filter.name).collect();
        for field in self.fields {
            if !names.contains(&field.name) {
                names.push(field.name);
            }
        }
        names
    }
}
