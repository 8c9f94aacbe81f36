//! Row loading for newline-delimited JSON datasets.
//!
//! Each line is one JSON object: a `wkt` column with the cell polygon plus
//! attribute columns. Timestamp-like values in the dataset's date columns
//! are normalized to calendar dates; enumerated columns are checked against
//! their code lists.

use flood_common::dataset::{GEOMETRY_COLUMN, STEP_COLUMN};
use flood_common::time::{date_from_epoch_millis, date_from_timestamp_str};
use flood_common::{DatasetKind, FloodError, FloodResult, GridSpec};
use flood_query::{AttributeValue, Cell, Dataset};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::wkt::parse_polygon;

/// Parse raw dataset bytes into an indexed [`Dataset`].
///
/// Blank lines are skipped. Any malformed row fails the whole dataset, so a
/// partially written file never replaces a complete one.
#[instrument(skip(raw, grid), fields(dataset = %kind, size = raw.len()))]
pub fn parse_dataset(kind: DatasetKind, grid: GridSpec, raw: &[u8]) -> FloodResult<Dataset> {
    let text = std::str::from_utf8(raw).map_err(|e| FloodError::Parse {
        row: 0,
        message: format!("dataset is not valid UTF-8: {}", e),
    })?;

    let mut cells = Vec::new();
    for (line_index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = line_index + 1;
        let cell = parse_row(kind, cells.len(), line).map_err(|message| FloodError::Parse {
            row: line_number,
            message,
        })?;
        cells.push(cell);
    }

    debug!(rows = cells.len(), "Parsed dataset");
    Ok(Dataset::new(kind, grid, cells))
}

fn parse_row(kind: DatasetKind, row: usize, line: &str) -> Result<Cell, String> {
    let record: Map<String, Value> =
        serde_json::from_str(line).map_err(|e| format!("invalid JSON record: {}", e))?;

    let wkt = record
        .get(GEOMETRY_COLUMN)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing '{}' geometry column", GEOMETRY_COLUMN))?;
    let geometry = parse_polygon(wkt).map_err(|e| e.to_string())?;

    let mut cell = Cell::new(row, geometry);
    for (column, value) in record {
        if column == GEOMETRY_COLUMN {
            continue;
        }
        let value = if kind.date_columns().contains(&column.as_str()) {
            date_value(&column, value)?
        } else {
            attribute_value(value)
        };
        cell = cell.with_attribute(column, value);
    }

    for (column, codes) in kind.enum_columns() {
        if let Some(AttributeValue::Text(code)) = cell.attribute(column) {
            if !codes.contains(&code.as_str()) {
                return Err(format!(
                    "'{}' is not a valid {} code (expected one of {:?})",
                    code, column, codes
                ));
            }
        }
    }

    if let Some(column) = kind.valid_date_column() {
        if let Some(date) = cell.attribute(column).and_then(AttributeValue::as_date) {
            cell = cell.with_valid_date(date);
        }
    }

    if let Some(step) = cell.attribute(STEP_COLUMN).and_then(AttributeValue::as_i64) {
        let step = u32::try_from(step).map_err(|_| format!("step {} is out of range", step))?;
        cell = cell.with_step(step);
    }

    Ok(cell)
}

fn date_value(column: &str, value: Value) -> Result<AttributeValue, String> {
    let date = match &value {
        Value::Null => return Ok(AttributeValue::Null),
        Value::String(s) => date_from_timestamp_str(s),
        Value::Number(n) => match n.as_i64() {
            Some(millis) => date_from_epoch_millis(millis),
            None => return Err(format!("{} value {} is not a timestamp", column, n)),
        },
        other => return Err(format!("{} value {} is not a timestamp", column, other)),
    };

    date.map(AttributeValue::Date)
        .map_err(|e| format!("{}: {}", column, e))
}

fn attribute_value(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => AttributeValue::Int(i),
            None => n.as_f64().map_or(AttributeValue::Null, AttributeValue::Float),
        },
        Value::String(s) => AttributeValue::Text(s),
        other => AttributeValue::Other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const WKT: &str = "POLYGON ((39.05 6.2, 39.05 6.25, 39.1 6.25, 39.1 6.2, 39.05 6.2))";

    fn line(fields: &str) -> String {
        format!(r#"{{"wkt": "{}", {}}}"#, WKT, fields)
    }

    #[test]
    fn test_detailed_row() {
        let raw = line(
            r#""issued_on": "2023-11-07T00:00:00", "valid_for": 1699401600000, "step": 1, "median_dis": 12.5"#,
        );
        let dataset = parse_dataset(DatasetKind::Detailed, GridSpec::default(), raw.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 1);
        let cell = &dataset.cells()[0];
        let nov8 = NaiveDate::from_ymd_opt(2023, 11, 8).unwrap();

        assert_eq!(cell.valid_date, Some(nov8));
        assert_eq!(cell.step, Some(1));
        assert_eq!(
            cell.attribute("issued_on"),
            Some(&AttributeValue::Date(NaiveDate::from_ymd_opt(2023, 11, 7).unwrap()))
        );
        assert_eq!(cell.attribute("median_dis"), Some(&AttributeValue::Float(12.5)));
        assert!(cell.attribute("wkt").is_none());
    }

    #[test]
    fn test_blank_lines_and_empty_input() {
        let raw = format!("\n{}\n\n{}\n", line(r#""threshold_2y": 1"#), line(r#""threshold_2y": 2"#));
        let dataset = parse_dataset(DatasetKind::Threshold, GridSpec::default(), raw.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.cells()[1].row, 1);

        let empty = parse_dataset(DatasetKind::Threshold, GridSpec::default(), b"").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_invalid_enum_code() {
        let raw = line(r#""tendency": "X""#);
        let result = parse_dataset(DatasetKind::Summary, GridSpec::default(), raw.as_bytes());
        assert!(matches!(result, Err(FloodError::Parse { row: 1, .. })));
    }

    #[test]
    fn test_error_reports_line_number() {
        let raw = format!("{}\n{{\"wkt\": \"POINT (1 2)\"}}\n", line(r#""threshold_2y": 1"#));
        let result = parse_dataset(DatasetKind::Threshold, GridSpec::default(), raw.as_bytes());
        assert!(matches!(result, Err(FloodError::Parse { row: 2, .. })));
    }

    #[test]
    fn test_bad_date() {
        let raw = line(r#""peak_day": "not a date""#);
        let result = parse_dataset(DatasetKind::Summary, GridSpec::default(), raw.as_bytes());
        assert!(matches!(result, Err(FloodError::Parse { .. })));
    }
}
