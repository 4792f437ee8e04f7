//! In-memory field values.
//!
//! A [`FieldValue`] is what a field node edits. Structured types keep their
//! editable parts (date/time, corner coordinates) as the value itself, so
//! there is no second copy to drift out of sync with the wire encoding.

mod parts;

pub use parts::{BoundsParts, DateParts, PointParts, ValuePart};

use crate::codec;
use derive_more::Display;
use serde_json::Value as JsonValue;

///
/// FieldValue
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    List(Vec<String>),
    Bool(bool),
    Date(DateParts),
    Point(PointParts),
    Bounds(BoundsParts),

    /// A wire value whose shape the codec does not model. Written back as-is.
    Opaque(JsonValue),
}

impl FieldValue {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.iter().all(String::is_empty),
            Self::Bool(_) => false,
            Self::Date(parts) => parts.is_empty(),
            Self::Point(parts) => parts.is_empty(),
            Self::Bounds(parts) => parts.is_empty(),
            Self::Opaque(value) => value.is_null(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FieldValueKind {
        match self {
            Self::Empty => FieldValueKind::Empty,
            Self::Text(_) => FieldValueKind::Text,
            Self::List(_) => FieldValueKind::List,
            Self::Bool(_) => FieldValueKind::Bool,
            Self::Date(_) => FieldValueKind::Date,
            Self::Point(_) => FieldValueKind::Point,
            Self::Bounds(_) => FieldValueKind::Bounds,
            Self::Opaque(_) => FieldValueKind::Opaque,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn date_parts(&self) -> Option<&DateParts> {
        match self {
            Self::Date(parts) => Some(parts),
            _ => None,
        }
    }

    #[must_use]
    pub const fn point_parts(&self) -> Option<&PointParts> {
        match self {
            Self::Point(parts) => Some(parts),
            _ => None,
        }
    }

    #[must_use]
    pub const fn bounds_parts(&self) -> Option<&BoundsParts> {
        match self {
            Self::Bounds(parts) => Some(parts),
            _ => None,
        }
    }

    /// Every non-empty textual value, in order. Structured values yield
    /// their set parts.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        let all: Vec<&str> = match self {
            Self::Empty | Self::Bool(_) | Self::Opaque(_) => Vec::new(),
            Self::Text(s) => vec![s.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
            Self::Date(parts) => parts.iter().collect(),
            Self::Point(parts) => parts.iter().collect(),
            Self::Bounds(parts) => parts.iter().collect(),
        };

        all.into_iter().filter(|s| !s.is_empty()).collect()
    }

    /// Human-readable rendering used for titles.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Opaque(value) => value.to_string(),
            _ => self.texts().join(" "),
        }
    }

    /// Coerce into a sequence, wrapping a scalar as a one-element list.
    /// Structured values become their composed wire text, or nothing while
    /// incomplete.
    #[must_use]
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::Empty | Self::Opaque(_) => Vec::new(),
            Self::Text(s) => vec![s],
            Self::List(items) => items,
            Self::Bool(b) => vec![b.to_string()],
            Self::Date(parts) => codec::compose_date(&parts).into_iter().collect(),
            Self::Point(parts) => parts.position().into_iter().collect(),
            Self::Bounds(parts) => parts
                .corners()
                .map(|(upper, lower)| format!("{upper} {lower}"))
                .into_iter()
                .collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateParts> for FieldValue {
    fn from(parts: DateParts) -> Self {
        Self::Date(parts)
    }
}

impl From<PointParts> for FieldValue {
    fn from(parts: PointParts) -> Self {
        Self::Point(parts)
    }
}

impl From<BoundsParts> for FieldValue {
    fn from(parts: BoundsParts) -> Self {
        Self::Bounds(parts)
    }
}

///
/// FieldValueKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum FieldValueKind {
    Empty,
    Text,
    List,
    Bool,
    Date,
    Point,
    Bounds,
    Opaque,
}

///
/// TESTS
///
