// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Turns user-typed filter, sort and page input into typed view state.
//!
//! Parsing is strict about syntax but not about meaning: an inverted range
//! such as `2025-02-01..2025-01-01` parses fine and simply matches nothing
//! once applied.

use time::Date;
use time::macros::format_description;

use crate::filter::FilterValue;
use crate::model::{FilterKind, Schema};
use crate::sort::{SortDirection, SortState};

pub const DATE_LAYOUT: &str = "YYYY-MM-DD";
pub const RANGE_SEPARATOR: &str = "..";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid date {0:?}; expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid amount {0:?}")]
    InvalidNumber(String),
    #[error("invalid range {0:?}; use <from>..<to> with either side optional")]
    InvalidRange(String),
    #[error("invalid sort {0:?}; use <field> or <field>:asc|desc with a known field")]
    InvalidSort(String),
    #[error("invalid filter {0:?}; use <name>=<value>")]
    InvalidFilter(String),
    #[error("invalid page {0:?}; expected a positive integer")]
    InvalidPage(String),
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

pub fn parse_date(input: &str) -> ValidationResult<Date> {
    let trimmed = input.trim();
    Date::parse(trimmed, &format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_owned()))
}

/// Accepts `$1,234.50`-style amounts and returns them in whole units.
pub fn parse_amount(input: &str) -> ValidationResult<f64> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidNumber(trimmed.to_owned());

    let clean = trimmed.replace(',', "");
    let (negative, clean) = match clean.strip_prefix('-') {
        Some(rest) => (true, rest.to_owned()),
        None => (false, clean),
    };
    let clean = clean.strip_prefix('$').unwrap_or(&clean);
    if clean.is_empty() || !clean.chars().all(|ch| ch.is_ascii_digit() || ch == '.') {
        return Err(invalid());
    }
    let value: f64 = clean.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(if negative { -value } else { value })
}

/// `123456` -> `$1,234.56`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{:02}", cents % 100)
}

fn split_range(input: &str) -> ValidationResult<(Option<&str>, Option<&str>)> {
    let trimmed = input.trim();
    let Some((start, end)) = trimmed.split_once(RANGE_SEPARATOR) else {
        return Ok((Some(trimmed).filter(|value| !value.is_empty()), None));
    };
    if end.contains(RANGE_SEPARATOR) {
        return Err(ValidationError::InvalidRange(trimmed.to_owned()));
    }
    Ok((range_side(start), range_side(end)))
}

fn range_side(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// `2025-01-01..2025-01-31`, `2025-01-01..`, `..2025-01-31`, or a single
/// day `2025-01-01` (start and end both that day).
pub fn parse_date_range(input: &str) -> ValidationResult<FilterValue> {
    if !input.contains(RANGE_SEPARATOR) {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(FilterValue::date_range(None, None));
        }
        let day = parse_date(trimmed)?;
        return Ok(FilterValue::date_range(Some(day), Some(day)));
    }
    let (start, end) = split_range(input)?;
    Ok(FilterValue::date_range(
        start.map(parse_date).transpose()?,
        end.map(parse_date).transpose()?,
    ))
}

/// `100..500`, `100..`, `..500`. A bare amount is a lower bound.
pub fn parse_amount_range(input: &str) -> ValidationResult<FilterValue> {
    let (min, max) = split_range(input)?;
    Ok(FilterValue::number_range(
        min.map(parse_amount).transpose()?,
        max.map(parse_amount).transpose()?,
    ))
}

/// Parses the raw value for filter `name` according to the schema. Names
/// the schema does not know stay text; the engine ignores them later.
pub fn parse_filter_value(schema: &Schema, name: &str, raw: &str) -> ValidationResult<FilterValue> {
    match schema.resolve_filter(name).map(|filter| filter.kind) {
        Some(FilterKind::DateRange) => parse_date_range(raw),
        Some(FilterKind::NumberRange) => parse_amount_range(raw),
        Some(FilterKind::Contains | FilterKind::Exact) | None => Ok(FilterValue::text(raw.trim())),
    }
}

/// `name=value`.
pub fn parse_filter_arg(schema: &Schema, input: &str) -> ValidationResult<(String, FilterValue)> {
    let Some((name, raw)) = input.split_once('=') else {
        return Err(ValidationError::InvalidFilter(input.to_owned()));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::InvalidFilter(input.to_owned()));
    }
    Ok((name.to_owned(), parse_filter_value(schema, name, raw)?))
}

/// `field`, `field:asc` or `field:desc`; the field must be in the schema.
pub fn parse_sort(schema: &Schema, input: &str) -> ValidationResult<SortState> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidSort(trimmed.to_owned());
    let (field, direction) = match trimmed.split_once(':') {
        Some((field, direction)) => (
            field.trim(),
            SortDirection::parse(&direction.trim().to_ascii_lowercase()).ok_or_else(invalid)?,
        ),
        None => (trimmed, SortDirection::Asc),
    };
    if schema.field(field).is_none() {
        return Err(invalid());
    }
    Ok(SortState::by(field, direction))
}

pub fn parse_page(input: &str) -> ValidationResult<usize> {
    let trimmed = input.trim();
    match trimmed.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ValidationError::InvalidPage(trimmed.to_owned())),
    }
}
