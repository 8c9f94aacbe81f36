//! Stable attribute sort for query results.

use std::cmp::Ordering;

use crate::cell::{AttributeValue, Cell};

/// Sort cells by the named attribute columns, in order of precedence.
///
/// The sort is stable: rows comparing equal on every column keep
/// their relative order. Missing and null values sort last.
pub fn sort_cells(cells: &mut [&Cell], columns: &[&str]) {
    if columns.is_empty() {
        return;
    }

    cells.sort_by(|a, b| {
        columns
            .iter()
            .map(|column| compare_column(a, b, column))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

fn compare_column(a: &Cell, b: &Cell, column: &str) -> Ordering {
    let missing = AttributeValue::Null;

    let left = a.attribute(column).unwrap_or(&missing);
    let right = b.attribute(column).unwrap_or(&missing);
    left.sort_cmp(right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon};

    fn cell(row: usize, lat: Option<f64>, step: i64) -> Cell {
        let geometry = Polygon::new(LineString::new(vec![]), vec![]);
        let mut cell = Cell::new(row, geometry).with_attribute("step", AttributeValue::Int(step));
        if let Some(lat) = lat {
            cell = cell.with_attribute("latitude", AttributeValue::Float(lat));
        }
        cell
    }

    #[test]
    fn test_multi_column_sort() {
        let cells = vec![cell(0, Some(2.0), 1), cell(1, Some(1.0), 2), cell(2, Some(1.0), 1)];
        let mut refs: Vec<&Cell> = cells.iter().collect();

        sort_cells(&mut refs, &["latitude", "step"]);

        let rows: Vec<usize> = refs.iter().map(|c| c.row).collect();
        assert_eq!(rows, vec![2, 1, 0]);
    }

    #[test]
    fn test_sort_is_stable_and_missing_last() {
        let cells = vec![cell(0, None, 1), cell(1, Some(5.0), 1), cell(2, Some(5.0), 1)];
        let mut refs: Vec<&Cell> = cells.iter().collect();

        sort_cells(&mut refs, &["latitude"]);

        let rows: Vec<usize> = refs.iter().map(|c| c.row).collect();
        assert_eq!(rows, vec![1, 2, 0]);
    }

    #[test]
    fn test_no_columns_keeps_order() {
        let cells = vec![cell(0, Some(3.0), 1), cell(1, Some(1.0), 1)];
        let mut refs: Vec<&Cell> = cells.iter().collect();

        sort_cells(&mut refs, &[]);

        assert_eq!(refs[0].row, 0);
    }
}
