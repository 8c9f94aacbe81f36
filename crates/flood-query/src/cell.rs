//! Grid cells and their attribute values.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use geo::{BoundingRect, Polygon, Rect};

/// A single attribute value of a dataset row.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Date columns are normalized to calendar dates at load time.
    Date(NaiveDate),
    /// Nested raw value (array or object) that has no scalar meaning.
    Other(serde_json::Value),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            AttributeValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            AttributeValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Total order used for attribute sorting.
    ///
    /// Numbers compare numerically across integer and float, NaN and nulls
    /// sort last, and values of unrelated kinds order by kind.
    pub fn sort_cmp(&self, other: &AttributeValue) -> Ordering {
        use AttributeValue::*;

        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Greater,
            (_, Null) => Ordering::Less,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Int(_) | Float(_), Int(_) | Float(_)) => {
                let (a, b) = (self.as_f64().unwrap_or(f64::NAN), other.as_f64().unwrap_or(f64::NAN));
                match (a.is_nan(), b.is_nan()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                }
            }
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            AttributeValue::Bool(_) => 0,
            AttributeValue::Int(_) | AttributeValue::Float(_) => 1,
            AttributeValue::Date(_) => 2,
            AttributeValue::Text(_) => 3,
            AttributeValue::Other(_) => 4,
            AttributeValue::Null => 5,
        }
    }
}

/// One row of a dataset: a grid cell polygon plus its attributes.
///
/// Cells are immutable once a dataset has been built.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Row ordinal in load order.
    pub row: usize,
    /// Closed axis-aligned ring, (lon, lat) coordinates.
    pub geometry: Polygon<f64>,
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Forecast validity date for time-series datasets.
    pub valid_date: Option<NaiveDate>,
    /// Forecast step ordinal for time-series datasets.
    pub step: Option<u32>,
}

impl Cell {
    pub fn new(row: usize, geometry: Polygon<f64>) -> Self {
        Self {
            row,
            geometry,
            attributes: BTreeMap::new(),
            valid_date: None,
            step: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_valid_date(mut self, date: NaiveDate) -> Self {
        self.valid_date = Some(date);
        self
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = Some(step);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Bounding rectangle of the cell geometry, `None` for an empty ring.
    pub fn envelope(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }

    /// Exterior ring as [lon, lat] pairs.
    pub fn ring(&self) -> Vec<[f64; 2]> {
        self.geometry
            .exterior()
            .coords()
            .map(|c| [c.x, c.y])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_sort_across_kinds() {
        let a = AttributeValue::Int(2);
        let b = AttributeValue::Float(2.5);
        assert_eq!(a.sort_cmp(&b), Ordering::Less);
        assert_eq!(b.sort_cmp(&a), Ordering::Greater);
        assert_eq!(AttributeValue::Int(3).sort_cmp(&AttributeValue::Float(3.0)), Ordering::Equal);
    }

    #[test]
    fn test_nulls_and_nan_sort_last() {
        let null = AttributeValue::Null;
        let nan = AttributeValue::Float(f64::NAN);
        let one = AttributeValue::Float(1.0);

        assert_eq!(one.sort_cmp(&null), Ordering::Less);
        assert_eq!(null.sort_cmp(&one), Ordering::Greater);
        assert_eq!(one.sort_cmp(&nan), Ordering::Less);
    }

    #[test]
    fn test_date_accessors() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 7).unwrap();
        assert_eq!(AttributeValue::Date(date).as_date(), Some(date));
        assert_eq!(AttributeValue::Float(7.0).as_i64(), Some(7));
        assert_eq!(AttributeValue::Float(7.5).as_i64(), None);
    }
}
