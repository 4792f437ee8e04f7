use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error as ThisError;

/// Wire slot type for plain text values.
pub const SLOT_TYPE_STRING: &str = "xs:string";

/// Wire slot type for ISO-8601 date-time values.
pub const SLOT_TYPE_DATE: &str = "xs:dateTime";

/// Wire slot type for decimal values.
pub const SLOT_TYPE_NUMBER: &str = "xs:decimal";

/// Wire slot type for boolean values.
pub const SLOT_TYPE_BOOLEAN: &str = "xs:boolean";

/// Wire slot type for a GML point.
pub const SLOT_TYPE_POINT: &str = "urn:ogc:def:dataType:ISO-19107:2003:GM_Point";

/// Wire slot type for a GML envelope.
pub const SLOT_TYPE_BOUNDS: &str = "urn:ogc:def:dataType:ISO-19107:2003:GM_Envelope";

///
/// ValueType
///
/// Logical type of a field value. Determines which wire encoding the codec
/// reads and writes for a slot.
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[remain::sorted]
pub enum ValueType {
    #[display("boolean")]
    Boolean,
    #[display("bounds")]
    Bounds,
    #[display("date")]
    Date,
    #[display("number")]
    Number,
    #[display("point")]
    Point,
    #[default]
    #[display("string")]
    String,
}

impl ValueType {
    pub const ALL: [Self; 6] = [
        Self::String,
        Self::Date,
        Self::Number,
        Self::Boolean,
        Self::Point,
        Self::Bounds,
    ];

    /// The `slotType` written on slots created for this value type.
    #[must_use]
    pub const fn slot_type(self) -> &'static str {
        match self {
            Self::Boolean => SLOT_TYPE_BOOLEAN,
            Self::Bounds => SLOT_TYPE_BOUNDS,
            Self::Date => SLOT_TYPE_DATE,
            Self::Number => SLOT_TYPE_NUMBER,
            Self::Point => SLOT_TYPE_POINT,
            Self::String => SLOT_TYPE_STRING,
        }
    }

    /// Reverse lookup of [`Self::slot_type`].
    #[must_use]
    pub fn from_slot_type(slot_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.slot_type() == slot_type)
    }

    /// Geo types are structured on the wire and never multi-valued.
    #[must_use]
    pub const fn is_geo(self) -> bool {
        matches!(self, Self::Point | Self::Bounds)
    }
}

///
/// ParseValueTypeError
///

#[derive(Debug, ThisError)]
#[error("unknown value type '{0}'")]
pub struct ParseValueTypeError(pub String);

impl FromStr for ValueType {
    type Err = ParseValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseValueTypeError(s.to_string()))
    }
}

///
/// TitleKind
///
/// Names the rule used to derive a display label for a populated segment.
/// The schema only references the rule; the tree evaluates it.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum TitleKind {
    Address,
    Email,
    Name,
    NameVersion,
    PersonName,
    Phone,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_types_resolve_both_ways() {
        for ty in ValueType::ALL {
            assert_eq!(ValueType::from_slot_type(ty.slot_type()), Some(ty));
        }
        assert_eq!(ValueType::from_slot_type("xs:int"), None);
    }

    #[test]
    fn value_type_parses_display_names() {
        assert_eq!("point".parse::<ValueType>().ok(), Some(ValueType::Point));
        assert_eq!("Boolean".parse::<ValueType>().ok(), Some(ValueType::Boolean));
        assert!("polygon".parse::<ValueType>().is_err());
    }
}
