//! Normalisation of raw sheet rows into [`CourseRecord`]s.
//!
//! Nothing in here fails: values that cannot be understood become missing and
//! are skipped by the aggregates downstream.

use crate::domain::model::{columns, AgeRange, CourseRecord, Record};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static AGE_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*(?:(\+)|-\s*(\d+))").expect("age group pattern is valid")
});

/// Spreadsheet markers for a missing cell, matched exactly after trimming.
/// `NA` is additionally matched in any case.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing_marker(text: &str) -> bool {
    text.is_empty() || text.eq_ignore_ascii_case("NA") || MISSING_MARKERS.contains(&text)
}

/// Drop the rows at the given 0-based positions. Positions past the end are
/// ignored.
pub fn drop_rows(records: Vec<Record>, positions: &[usize]) -> Vec<Record> {
    let total = records.len();
    for &position in positions {
        if position >= total {
            tracing::warn!(
                "Outlier row {} is out of range for a table of {} rows, ignoring",
                position,
                total
            );
        }
    }

    records
        .into_iter()
        .enumerate()
        .filter(|(position, _)| !positions.contains(position))
        .map(|(_, record)| record)
        .collect()
}

/// Clean every record, numbering the results from 1.
pub fn clean_records(records: &[Record]) -> Vec<CourseRecord> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| clean_record(index + 1, record))
        .collect()
}

pub fn clean_record(number: usize, record: &Record) -> CourseRecord {
    let name = text_value(record.get(columns::COURSE_NAME)).unwrap_or_default();

    let age_group = text_value(record.get(columns::AGE_GROUP)).and_then(|raw| {
        let parsed = parse_age_group(&raw);
        if parsed.is_none() {
            tracing::debug!("Course {} ('{}'): unreadable age group '{}'", number, name, raw);
        }
        parsed
    });

    let features = text_value(record.get(columns::FEATURES))
        .map(|raw| split_features(&raw))
        .unwrap_or_default();

    CourseRecord {
        number,
        age_group,
        features,
        duration_hours: numeric_field(record, columns::DURATION, number),
        registration_fee: numeric_field(record, columns::REGISTRATION_FEE, number),
        course_fee: numeric_field(record, columns::COURSE_FEE, number),
        payment_method: text_value(record.get(columns::PAYMENT_METHOD)),
        delivery_method: text_value(record.get(columns::DELIVERY_METHOD)),
        name,
    }
}

fn numeric_field(record: &Record, column: &str, number: usize) -> Option<f64> {
    let value = record.get(column);
    let coerced = coerce_number(value);
    if coerced.is_none() && !is_missing(value) {
        tracing::debug!("Course {}: non-numeric {} {}", number, column, value);
    }
    coerced
}

/// Parse `"A+"` into an open range and `"A-B"` into a closed one. Trailing
/// text such as `" years"` is tolerated; anything else is missing.
pub fn parse_age_group(raw: &str) -> Option<AgeRange> {
    let caps = AGE_GROUP.captures(raw.trim())?;
    let min: u32 = caps.get(1)?.as_str().parse().ok()?;

    if caps.get(2).is_some() {
        return Some(AgeRange { min, max: None });
    }

    let max: u32 = caps.get(3)?.as_str().parse().ok()?;
    if min > max {
        return None;
    }
    Some(AgeRange {
        min,
        max: Some(max),
    })
}

/// Numbers pass through; strings are parsed as decimals. Anything that is
/// not a finite number is missing.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

pub fn split_features(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trimmed text of a cell, `None` for empty cells and missing markers.
pub fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if is_missing_marker(&text) {
        None
    } else {
        Some(text)
    }
}

fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => is_missing_marker(s.trim()),
        _ => false,
    }
}
