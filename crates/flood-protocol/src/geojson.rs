//! GeoJSON FeatureCollection encoding of query results.
//!
//! Each matched cell becomes a `Polygon` feature carrying only the columns
//! requested for the endpoint. Feature ids are the sequential position of
//! the row in the (optionally sorted) result, as strings.

use flood_common::{FloodError, FloodResult};
use flood_query::{sort_cells, AttributeValue, Cell};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Always "FeatureCollection".
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature for one cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    pub id: String,

    /// Always "Feature".
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: Geometry,

    pub properties: Map<String, Value>,
}

/// Cell geometry. Only polygons are produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        /// Linear rings of [longitude, latitude] pairs, exterior first.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

impl Geometry {
    pub fn polygon(exterior: Vec<[f64; 2]>) -> Self {
        Geometry::Polygon {
            coordinates: vec![exterior],
        }
    }
}

/// Encode `rows` as a FeatureCollection with only `columns` as properties.
///
/// When `sort_columns` is given, rows are first stably sorted by those
/// attributes. Dates become ISO-8601 strings and non-finite floats become
/// `null`. Nested values cannot be encoded and fail the whole collection.
pub fn to_feature_collection(
    rows: &[&Cell],
    columns: &[&str],
    sort_columns: Option<&[&str]>,
) -> FloodResult<FeatureCollection> {
    let mut rows = rows.to_vec();
    if let Some(sort_columns) = sort_columns {
        sort_cells(&mut rows, sort_columns);
    }

    let features = rows
        .iter()
        .enumerate()
        .map(|(id, cell)| to_feature(id, cell, columns))
        .collect::<FloodResult<Vec<_>>>()?;

    Ok(FeatureCollection::new().with_features(features))
}

fn to_feature(id: usize, cell: &Cell, columns: &[&str]) -> FloodResult<Feature> {
    let mut properties = Map::new();
    for &column in columns {
        let value = match cell.attribute(column) {
            Some(value) => to_json(value).map_err(|kind| {
                FloodError::EncodingFailure(format!(
                    "Type {} in column '{}' is not JSON serializable",
                    kind, column
                ))
            })?,
            None => Value::Null,
        };
        properties.insert(column.to_string(), value);
    }

    Ok(Feature {
        id: id.to_string(),
        type_: "Feature".to_string(),
        geometry: Geometry::polygon(cell.ring()),
        properties,
    })
}

/// Returns the offending value kind on failure.
fn to_json(value: &AttributeValue) -> Result<Value, &'static str> {
    let json = match value {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Int(i) => Value::Number((*i).into()),
        AttributeValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        AttributeValue::Text(s) => Value::String(s.clone()),
        AttributeValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        AttributeValue::Other(Value::Array(_)) => return Err("array"),
        AttributeValue::Other(Value::Object(_)) => return Err("object"),
        AttributeValue::Other(_) => return Err("unknown"),
    };
    Ok(json)
}
