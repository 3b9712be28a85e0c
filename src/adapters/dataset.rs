//! Readers turning the raw dataset bytes into header-keyed [`Record`]s.

use crate::config::settings::is_csv;
use crate::domain::model::{columns, Record};
use crate::utils::error::{AnalysisError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Cursor;

/// Parse the dataset, picking the reader from the file extension of `path`.
pub fn read_records(path: &str, sheet: &str, bytes: Vec<u8>) -> Result<Vec<Record>> {
    let rows = if is_csv(path) {
        read_csv_rows(&bytes)?
    } else {
        read_sheet_rows(sheet, bytes)?
    };
    records_from_rows(rows)
}

fn read_csv_rows(bytes: &[u8]) -> Result<Vec<Vec<Value>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        rows.push(row.iter().map(csv_value).collect());
    }
    Ok(rows)
}

fn csv_value(field: &str) -> Value {
    if field.trim().is_empty() {
        Value::Null
    } else {
        Value::String(field.to_string())
    }
}

fn read_sheet_rows(sheet: &str, bytes: Vec<u8>) -> Result<Vec<Vec<Value>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook.worksheet_range(sheet)?;
    tracing::debug!(
        "Sheet '{}' spans {} rows x {} columns",
        sheet,
        range.height(),
        range.width()
    );
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect())
}

/// Spreadsheet cell as JSON. Error cells are treated as empty.
pub fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Data::Bool(b) => Value::Bool(*b),
        other => Value::String(other.to_string()),
    }
}

/// First row is the header; fully empty rows are skipped.
fn records_from_rows(rows: Vec<Vec<Value>>) -> Result<Vec<Record>> {
    let mut rows = rows.into_iter();
    let header: Vec<String> = rows
        .next()
        .map(|cells| {
            cells
                .iter()
                .map(|cell| match cell {
                    Value::String(s) => s.trim().to_string(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    for column in columns::REQUIRED {
        if !header.iter().any(|h| h == column) {
            return Err(AnalysisError::MissingColumnError {
                column: column.to_string(),
            });
        }
    }

    let records = rows
        .filter(|cells| cells.iter().any(|cell| !cell.is_null()))
        .map(|cells| {
            let mut data: HashMap<String, Value> = HashMap::new();
            // A repeated header keeps its first column.
            for (name, cell) in header
                .iter()
                .zip(cells.into_iter().chain(std::iter::repeat(Value::Null)))
                .filter(|(name, _)| columns::REQUIRED.contains(&name.as_str()))
            {
                data.entry(name.clone()).or_insert(cell);
            }
            Record { data }
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HEADER: &str = "Course name,Age Group,Features,Duration,Registration fee,Course fee,Payment Method for course fee,Delivery method,Notes";

    #[test]
    fn test_read_csv_records() {
        let csv = format!(
            "{}\nPython Kids,8-12,\"Certificate, Projects\",24,NA,18000,Monthly,Online,ignored\n,,,,,,,,\nWeb Teens,13+,Projects,,1000,,Full payment,Physical\n",
            HEADER
        );

        let records = read_records("courses.csv", "", csv.into_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(columns::COURSE_NAME), &json!("Python Kids"));
        assert_eq!(records[0].get(columns::FEATURES), &json!("Certificate, Projects"));
        assert_eq!(records[0].get(columns::REGISTRATION_FEE), &json!("NA"));
        assert!(!records[0].data.contains_key("Notes"));
        // Empty cells are null; the short row simply lacks the ignored Notes column.
        assert!(records[1].get(columns::DURATION).is_null());
        assert!(records[1].get(columns::DELIVERY_METHOD).is_string());
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "Course name,Age Group\nPython Kids,8-12\n";
        let err = read_records("courses.csv", "", csv.as_bytes().to_vec()).unwrap_err();
        match err {
            AnalysisError::MissingColumnError { column } => assert_eq!(column, "Features"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeated_header_keeps_first_column() {
        let csv = format!("{},Course fee\nPython Kids,8-12,Projects,24,500,1000,Monthly,Online,,999999\n", HEADER);

        let records = read_records("courses.csv", "", csv.into_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get(columns::COURSE_FEE), &json!("1000"));
    }

    #[test]
    fn test_empty_input_reports_first_column() {
        let err = read_records("courses.csv", "", Vec::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumnError { .. }));
    }

    #[test]
    fn test_invalid_workbook_is_spreadsheet_error() {
        let err = read_records("courses.xlsx", "Cleaned dataset", b"not a workbook".to_vec())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SpreadsheetError(_)));
    }

    #[test]
    fn test_cell_value_conversion() {
        assert_eq!(cell_value(&Data::Float(40.0)), json!(40.0));
        assert_eq!(cell_value(&Data::Int(12)), json!(12));
        assert_eq!(cell_value(&Data::String("Online".into())), json!("Online"));
        assert!(cell_value(&Data::String("  ".into())).is_null());
        assert!(cell_value(&Data::Empty).is_null());
        assert!(cell_value(&Data::Error(calamine::CellErrorType::Div0)).is_null());
        assert_eq!(cell_value(&Data::Float(f64::NAN)), Value::Null);
    }
}
