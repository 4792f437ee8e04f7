//! Conversion between wire slot values and [`FieldValue`]s.
//!
//! Two encodings are read, told apart by shape:
//! - the list encoding, an array of strings (`["a", "b"]`);
//! - the structured encoding, an object (`{"Point": {"pos": "lat lon"}}`)
//!   or a bare string (`"true"`).
//!
//! Encoding writes the list encoding for text and dates, the structured
//! encoding for geo values, and a bare string for booleans. A `None` from
//! [`encode`] means the value is incomplete and no slot should exist.

mod date;

use crate::value::{BoundsParts, DateParts, FieldValue, PointParts};
use fedreg_schema::types::ValueType;
use serde_json::{Map, Value, json};

/// `srsName` written on encoded points.
pub const POINT_SRS_NAME: &str = "urn:ogc:def:crs:EPSG::4326";

///
/// SlotEncoding
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotEncoding {
    List,
    Structured,
    Absent,
}

impl SlotEncoding {
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => Self::List,
            Value::Null => Self::Absent,
            _ => Self::Structured,
        }
    }
}

/// Decode a wire slot value. Never fails: a value whose shape does not fit
/// `value_type` decodes to [`FieldValue::Empty`].
#[must_use]
pub fn decode(slot_value: &Value, value_type: ValueType, multi_valued: bool) -> FieldValue {
    match slot_value {
        Value::Null => FieldValue::Empty,
        Value::Array(items) => decode_list(items, value_type, multi_valued),
        Value::Object(map) => decode_structured(slot_value, map, value_type),
        Value::Bool(b) if value_type == ValueType::Boolean => FieldValue::Bool(*b),
        scalar => match scalar_text(scalar) {
            Some(s) if multi_valued && !value_type.is_geo() => FieldValue::List(vec![s]),
            Some(s) => decode_text(&s, value_type),
            None => FieldValue::Empty,
        },
    }
}

/// Encode a field value for a slot. `None` means suppressed.
#[must_use]
pub fn encode(value: &FieldValue, value_type: ValueType, multi_valued: bool) -> Option<Value> {
    if let FieldValue::Opaque(raw) = value {
        return Some(raw.clone());
    }

    match value_type {
        ValueType::Boolean => Some(Value::String(truthy(value).to_string())),
        ValueType::Point => point_parts(value)?.position().map(|pos| {
            json!({
                "Point": {
                    "srsName": POINT_SRS_NAME,
                    "srsDimension": 2,
                    "pos": pos,
                }
            })
        }),
        ValueType::Bounds => bounds_parts(value)?.corners().map(|(upper, lower)| {
            json!({
                "Envelope": {
                    "srsName": "",
                    "lowerCorner": lower,
                    "upperCorner": upper,
                }
            })
        }),
        ValueType::Date if !matches!(value, FieldValue::List(_)) => {
            let parts = date_parts(value)?;
            date::compose(&parts).map(|s| json!([s]))
        }
        _ if multi_valued => {
            let items: Vec<Value> = value
                .texts()
                .into_iter()
                .map(|s| Value::String(s.to_string()))
                .collect();

            (!items.is_empty()).then_some(Value::Array(items))
        }
        _ => value
            .texts()
            .first()
            .map(|s| Value::Array(vec![Value::String((*s).to_string())])),
    }
}

/// Decode a direct (non-slot) attribute value.
#[must_use]
pub fn decode_attribute(value: &Value, value_type: ValueType, multi_valued: bool) -> FieldValue {
    match value {
        Value::Array(items) if !multi_valued && items.iter().all(Value::is_string) => {
            decode_list(items, value_type, false)
        }
        Value::Array(items) if items.iter().all(Value::is_string) => {
            decode_list(items, value_type, true)
        }
        Value::Array(_) | Value::Object(_) => FieldValue::Opaque(value.clone()),
        Value::Bool(b) => FieldValue::Bool(*b),
        other => match scalar_text(other) {
            Some(s) if multi_valued => FieldValue::List(vec![s]),
            Some(s) => FieldValue::Text(s),
            None => FieldValue::Empty,
        },
    }
}

/// Encode a direct attribute value. `None` means the attribute is removed.
#[must_use]
pub fn encode_attribute(value: &FieldValue, multi_valued: bool) -> Option<Value> {
    match value {
        FieldValue::Opaque(raw) => Some(raw.clone()),
        FieldValue::Bool(b) => Some(Value::Bool(*b)),
        FieldValue::Date(parts) => date::compose(parts).map(Value::String),
        FieldValue::Point(parts) => parts.position().map(Value::String),
        _ => {
            let texts = value.texts();
            if texts.is_empty() {
                None
            } else if multi_valued || matches!(value, FieldValue::List(items) if items.len() > 1) {
                Some(Value::Array(
                    texts.into_iter().map(|s| Value::String(s.to_string())).collect(),
                ))
            } else {
                Some(Value::String(texts[0].to_string()))
            }
        }
    }
}

/// Compose a date value's wire text. `None` without a date part.
pub(crate) fn compose_date(parts: &DateParts) -> Option<String> {
    date::compose(parts)
}

// ---- decode helpers ----------------------------------------------------

fn decode_list(items: &[Value], value_type: ValueType, multi_valued: bool) -> FieldValue {
    let texts: Vec<String> = items.iter().filter_map(scalar_text).collect();

    if multi_valued && !value_type.is_geo() {
        return FieldValue::List(texts);
    }

    match texts.into_iter().next() {
        Some(first) => decode_text(&first, value_type),
        None => FieldValue::Empty,
    }
}

fn decode_text(s: &str, value_type: ValueType) -> FieldValue {
    match value_type {
        ValueType::Boolean => FieldValue::Bool(s.trim() == "true"),
        ValueType::Date => match date::parse(s) {
            Some(parts) => FieldValue::Date(parts),
            None => miss(s, value_type),
        },
        ValueType::Point => match coords::<2>(s) {
            Some([lat, lon]) => FieldValue::Point(PointParts::new(lat, lon)),
            None => miss(s, value_type),
        },
        ValueType::Bounds => match coords::<4>(s) {
            Some(c) => FieldValue::Bounds(BoundsParts::from_coords(c)),
            None => miss(s, value_type),
        },
        ValueType::Number | ValueType::String => FieldValue::Text(s.to_string()),
    }
}

fn decode_structured(raw: &Value, map: &Map<String, Value>, value_type: ValueType) -> FieldValue {
    match value_type {
        ValueType::Point => {
            let pos = map.get("Point").and_then(|p| p.get("pos")).and_then(Value::as_str);
            match pos.and_then(coords::<2>) {
                Some([lat, lon]) => FieldValue::Point(PointParts::new(lat, lon)),
                None => miss(&raw.to_string(), value_type),
            }
        }
        ValueType::Bounds => {
            let envelope = map.get("Envelope");
            let corner = |name: &str| {
                envelope
                    .and_then(|e| e.get(name))
                    .and_then(Value::as_str)
                    .and_then(coords::<2>)
            };
            match (corner("upperCorner"), corner("lowerCorner")) {
                (Some([ulat, ulon]), Some([llat, llon])) => {
                    FieldValue::Bounds(BoundsParts::from_coords([ulat, ulon, llat, llon]))
                }
                _ => miss(&raw.to_string(), value_type),
            }
        }
        _ => FieldValue::Opaque(raw.clone()),
    }
}

// Split on whitespace into exactly N coordinates.
fn coords<const N: usize>(s: &str) -> Option<[&str; N]> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    parts.try_into().ok()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn miss(raw: &str, value_type: ValueType) -> FieldValue {
    tracing::warn!(%value_type, raw, "slot value does not decode as its declared type");

    FieldValue::Empty
}

// ---- encode helpers ----------------------------------------------------

fn truthy(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(b) => *b,
        FieldValue::Text(s) => s.trim() == "true",
        FieldValue::List(items) => items.first().is_some_and(|s| s.trim() == "true"),
        _ => false,
    }
}

fn date_parts(value: &FieldValue) -> Option<DateParts> {
    match value {
        FieldValue::Date(parts) => Some(parts.clone()),
        FieldValue::Text(s) => date::parse(s),
        _ => None,
    }
}

fn point_parts(value: &FieldValue) -> Option<PointParts> {
    match value {
        FieldValue::Point(parts) => Some(parts.clone()),
        FieldValue::Text(s) => coords::<2>(s).map(|[lat, lon]| PointParts::new(lat, lon)),
        _ => None,
    }
}

fn bounds_parts(value: &FieldValue) -> Option<BoundsParts> {
    match value {
        FieldValue::Bounds(parts) => Some(parts.clone()),
        FieldValue::Text(s) => coords::<4>(s).map(BoundsParts::from_coords),
        _ => None,
    }
}

///
/// TESTS
///
