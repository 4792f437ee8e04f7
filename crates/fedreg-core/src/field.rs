use crate::{
    codec,
    validate::check_field,
    value::{BoundsParts, DateParts, FieldValue, PointParts, ValuePart},
};
use fedreg_schema::prelude::{Constraint, FieldDef, ValueType};
use serde_json::Value;
use std::{collections::BTreeMap, fmt};

type ChangeListener = Box<dyn FnMut(&FieldChange<'_>)>;

///
/// FieldChange
///
/// Passed to change listeners after every mutation of a field.
///

#[derive(Clone, Copy, Debug)]
pub struct FieldChange<'a> {
    pub key: &'a str,
    pub value: &'a FieldValue,
}

///
/// FieldNode
///
/// The editable unit for one attribute. The node holds the in-memory value
/// and nothing else; it is written back to the record only by its owning
/// segment's `save`, and only when marked dirty.
///

pub struct FieldNode {
    pub key: String,
    pub display_name: String,
    pub description: String,
    pub value_type: ValueType,

    /// `slotType` as read from the record, kept for custom slots whose type
    /// the codec does not know.
    pub slot_type: Option<String>,
    pub is_slot: bool,
    pub is_custom: bool,
    pub multi_valued: bool,
    pub constraints: &'static [Constraint],

    value: FieldValue,
    decode_miss: bool,
    dirty: bool,
    validation_errors: Vec<String>,

    next_listener_id: u64,
    listeners: BTreeMap<u64, ChangeListener>,
}

impl FieldNode {
    /// Field for a schema-declared attribute.
    #[must_use]
    pub fn declared(key: &str, def: &FieldDef, is_slot: bool) -> Self {
        let mut field = Self::bare(key, def.value_type, def.multi_valued);
        field.display_name = def.display_name.to_string();
        field.description = def.description.to_string();
        field.is_slot = is_slot;
        field.constraints = def.constraints;

        field
    }

    /// Slot-backed field with no schema entry.
    #[must_use]
    pub fn custom(key: &str, value_type: ValueType, multi_valued: bool) -> Self {
        let mut field = Self::bare(key, value_type, multi_valued);
        field.is_slot = true;
        field.is_custom = true;

        field
    }

    fn bare(key: &str, value_type: ValueType, multi_valued: bool) -> Self {
        Self {
            key: key.to_string(),
            display_name: key.to_string(),
            description: String::new(),
            value_type,
            slot_type: None,
            is_slot: false,
            is_custom: false,
            multi_valued,
            constraints: &[],
            value: FieldValue::Empty,
            decode_miss: false,
            dirty: false,
            validation_errors: Vec::new(),
            next_listener_id: 1,
            listeners: BTreeMap::new(),
        }
    }

    /// Seed from a wire slot value without marking the field dirty.
    pub(crate) fn load_slot(&mut self, raw: &Value) {
        self.value = codec::decode(raw, self.value_type, self.multi_valued);
        self.decode_miss = !raw.is_null() && self.value.is_empty() && !is_blank_wire(raw);
    }

    /// Seed from a direct attribute value without marking the field dirty.
    pub(crate) fn load_attribute(&mut self, raw: &Value) {
        self.value = codec::decode_attribute(raw, self.value_type, self.multi_valued);
    }

    /// Seed from schema defaults without marking the field dirty.
    pub(crate) fn load_defaults(&mut self, defaults: &[&str]) {
        self.value = match defaults {
            [] => FieldValue::Empty,
            [one] if !self.multi_valued => self.parse_text(one),
            many => FieldValue::List(many.iter().map(|s| (*s).to_string()).collect()),
        };
    }

    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The slot type written when this field creates a new slot.
    #[must_use]
    pub fn slot_type(&self) -> &str {
        self.slot_type
            .as_deref()
            .unwrap_or_else(|| self.value_type.slot_type())
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.constraints.iter().any(Constraint::is_required)
    }

    #[must_use]
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    /// Replace the value. A multi-valued field stores a list and a
    /// single-valued one keeps only the first entry of a list.
    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        let value = value.into();

        self.value = match value {
            FieldValue::Text(s) if self.multi_valued => FieldValue::List(vec![s]),
            FieldValue::Text(s) => self.parse_text(&s),
            FieldValue::List(mut items) if !self.multi_valued => match items.len() {
                0 => FieldValue::Empty,
                _ => self.parse_text(&items.swap_remove(0)),
            },
            other => other,
        };
        self.decode_miss = false;
        self.changed();
    }

    /// Append a value. A scalar becomes a one-element list first, and the
    /// field becomes multi-valued. Geo fields hold one structured value and
    /// refuse, returning false.
    pub fn add_value(&mut self, value: impl Into<String>) -> bool {
        if self.value_type.is_geo() {
            tracing::warn!(key = %self.key, value_type = %self.value_type, "geo fields take a single value");
            return false;
        }

        let mut items = std::mem::take(&mut self.value).into_list();
        items.push(value.into());

        self.value = FieldValue::List(items);
        self.multi_valued = true;
        self.changed();

        true
    }

    /// Remove the value at `index` of a multi-valued field.
    pub fn remove_value(&mut self, index: usize) -> Option<String> {
        let FieldValue::List(items) = &mut self.value else {
            return None;
        };
        if index >= items.len() {
            return None;
        }

        let removed = items.remove(index);
        self.changed();

        Some(removed)
    }

    /// Edit one part of a structured value. Returns false when the part
    /// does not belong to this field's value type.
    pub fn set_part(&mut self, part: ValuePart, value: Option<&str>) -> bool {
        let value = value.map(str::to_string);

        if self.value.is_empty() || !matches!(
            self.value,
            FieldValue::Date(_) | FieldValue::Point(_) | FieldValue::Bounds(_)
        ) {
            self.value = match self.value_type {
                ValueType::Date => FieldValue::Date(DateParts::default()),
                ValueType::Point => FieldValue::Point(PointParts::default()),
                ValueType::Bounds => FieldValue::Bounds(BoundsParts::default()),
                _ => return false,
            };
        }

        let applied = match &mut self.value {
            FieldValue::Date(parts) => parts.set(part, value),
            FieldValue::Point(parts) => parts.set(part, value),
            FieldValue::Bounds(parts) => parts.set(part, value),
            _ => false,
        };

        if applied {
            self.decode_miss = false;
            self.changed();
        }

        applied
    }

    /// Check declared constraints. The outcome is kept on the node.
    pub fn validate(&mut self) -> &[String] {
        self.validation_errors = check_field(&self.value, self.constraints, self.decode_miss);

        &self.validation_errors
    }

    /// Register a listener called after every mutation.
    pub fn on_change<F>(&mut self, listener: F) -> u64
    where
        F: FnMut(&FieldChange<'_>) + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.insert(id, Box::new(listener));

        id
    }

    pub fn off_change(&mut self, listener_id: u64) -> bool {
        self.listeners.remove(&listener_id).is_some()
    }

    pub(crate) const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn changed(&mut self) {
        self.dirty = true;

        let event = FieldChange {
            key: &self.key,
            value: &self.value,
        };
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }

    fn parse_text(&self, s: &str) -> FieldValue {
        match self.value_type {
            ValueType::String | ValueType::Number => FieldValue::Text(s.to_string()),
            ty => codec::decode(&Value::String(s.to_string()), ty, false),
        }
    }
}

impl fmt::Debug for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldNode")
            .field("key", &self.key)
            .field("value_type", &self.value_type)
            .field("is_slot", &self.is_slot)
            .field("is_custom", &self.is_custom)
            .field("multi_valued", &self.multi_valued)
            .field("value", &self.value)
            .field("dirty", &self.dirty)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

// An empty list or blank string is "no value", not a decode miss.
fn is_blank_wire(raw: &Value) -> bool {
    match raw {
        Value::Array(items) => items
            .iter()
            .all(|v| v.as_str().is_some_and(|s| s.trim().is_empty())),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::{cell::RefCell, rc::Rc};

    fn text(multi: bool) -> FieldNode {
        FieldNode::custom("note", ValueType::String, multi)
    }

    #[test]
    fn add_value_coerces_scalar_into_list() {
        let mut field = text(false);
        field.set_value("first");
        field.add_value("second");

        assert!(field.multi_valued);
        assert_eq!(
            field.value(),
            &FieldValue::List(vec!["first".into(), "second".into()])
        );
    }

    #[test]
    fn remove_value_out_of_range_is_none() {
        let mut field = text(true);
        field.add_value("a");
        field.add_value("b");

        assert_eq!(field.remove_value(0).as_deref(), Some("a"));
        assert_eq!(field.remove_value(5), None);
        assert_eq!(field.value(), &FieldValue::List(vec!["b".into()]));
    }

    #[test]
    fn set_value_follows_multiplicity() {
        let mut single = text(false);
        single.set_value(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(single.value(), &FieldValue::Text("x".into()));

        let mut multi = text(true);
        multi.set_value("x");
        assert_eq!(multi.value(), &FieldValue::List(vec!["x".into()]));
    }

    #[test]
    fn add_value_keeps_dates_whole() {
        let mut field = FieldNode::custom("seen", ValueType::Date, false);
        field.load_slot(&json!(["2020-01-01T00:00Z"]));

        assert!(field.add_value("2021-05-05T00:00Z"));
        assert_eq!(
            field.value(),
            &FieldValue::List(vec!["2020-01-01T00:00Z".into(), "2021-05-05T00:00Z".into()])
        );
    }

    #[test]
    fn add_value_is_refused_on_geo_fields() {
        let mut field = FieldNode::custom("where", ValueType::Point, false);
        field.load_slot(&json!({"Point": {"pos": "38.9 -77.0"}}));

        assert!(!field.add_value("1 2"));
        assert!(!field.is_dirty());
        assert!(!field.multi_valued);
        assert_eq!(field.value(), &FieldValue::Point(PointParts::new("38.9", "-77.0")));
    }

    #[test]
    fn set_part_builds_structured_value() {
        let mut field = FieldNode::custom("where", ValueType::Point, false);

        assert!(field.set_part(ValuePart::Lat, Some("38.9")));
        assert!(!field.set_part(ValuePart::Date, Some("2020-01-01")));
        assert_eq!(
            field.value().point_parts().and_then(PointParts::position),
            None
        );

        field.set_part(ValuePart::Lon, Some("-77.0"));
        assert_eq!(
            field.value().point_parts().and_then(PointParts::position),
            Some("38.9 -77.0".to_string())
        );

        let mut plain = text(false);
        assert!(!plain.set_part(ValuePart::Lat, Some("1")));
        assert!(!plain.is_dirty());
    }

    #[test]
    fn mutations_mark_dirty_and_notify() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut field = text(true);

        let sink = Rc::clone(&seen);
        let id = field.on_change(move |change| {
            sink.borrow_mut().push(change.value.display_text());
        });

        assert!(!field.is_dirty());
        field.add_value("a");
        field.add_value("b");
        assert!(field.is_dirty());

        assert!(field.off_change(id));
        field.add_value("c");

        assert_eq!(*seen.borrow(), vec!["a".to_string(), "a b".to_string()]);
    }

    #[test]
    fn decode_miss_only_flags_required_fields() {
        let def = FieldDef::new("Where", "", ValueType::Point).with_constraints(&[Constraint::Required]);
        let mut field = FieldNode::declared("location", &def, true);
        field.load_slot(&json!({"Point": {"pos": "garbage"}}));

        assert!(field.value().is_empty());
        assert_eq!(field.validate().len(), 1);

        let optional = FieldDef::new("Where", "", ValueType::Point);
        let mut field = FieldNode::declared("location", &optional, true);
        field.load_slot(&json!({"Point": {"pos": "garbage"}}));

        assert!(field.validate().is_empty());
    }
}
