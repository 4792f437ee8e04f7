use super::{SegmentNode, SegmentShape, populate::is_falsy};
use crate::{codec, field::FieldNode};
use fedreg_schema::SLOT_COLLECTION;
use serde_json::{Map, Value, json};

impl SegmentNode {
    /// Write edits back into the backing record, depth-first.
    ///
    /// Only dirty fields are encoded, plus fields whose attribute is absent
    /// but which carry a value (schema defaults). Everything else in the
    /// record is left as it was read.
    pub fn save(&mut self) {
        match self.shape {
            SegmentShape::Collection => {
                let items = self
                    .segments
                    .iter_mut()
                    .map(|child| {
                        child.save();
                        child.backing.clone()
                    })
                    .collect();

                self.backing = Value::Array(items);
            }
            SegmentShape::Record => {
                let Value::Object(map) = &mut self.backing else {
                    return;
                };

                for field in &mut self.fields {
                    if field.is_slot {
                        write_slot(map, field);
                    } else {
                        write_attribute(map, field);
                    }
                    field.mark_clean();
                }
                prune_slots(map, &self.fields);

                for child in &mut self.segments {
                    child.save();
                    if let Some(attr) = &child.attribute {
                        map.insert(attr.clone(), child.backing.clone());
                    }
                }
            }
        }

        tracing::debug!(segment_id = %self.segment_id, segment_type = %self.segment_type, "segment saved");
    }
}

// Dirty fields are always written. A clean field is written only when the
// record lacks it and it carries a value, i.e. a schema default.
fn should_write(field: &FieldNode, present: bool) -> bool {
    field.is_dirty() || (!present && !field.value().is_empty())
}

// An empty attribute counts as absent, so a default loaded in its place
// is written.
fn write_attribute(map: &mut Map<String, Value>, field: &FieldNode) {
    let present = map.get(&field.key).is_some_and(|value| !is_falsy(value));
    if !should_write(field, present) {
        return;
    }

    match encode_attribute(field) {
        Some(value) => {
            map.insert(field.key.clone(), value);
        }
        None => {
            map.shift_remove(&field.key);
        }
    }
}

fn write_slot(map: &mut Map<String, Value>, field: &FieldNode) {
    let index = slots(map).and_then(|slots| {
        slots
            .iter()
            .position(|slot| slot.get("name").and_then(Value::as_str) == Some(field.key.as_str()))
    });
    if !should_write(field, index.is_some()) {
        return;
    }

    let encoded = encode_slot(field);
    match (index, encoded) {
        (Some(i), Some(value)) => {
            if let Some(Value::Object(slot)) = slots_mut(map).and_then(|slots| slots.get_mut(i)) {
                slot.insert("value".to_string(), value);
            }
        }
        (Some(i), None) => {
            if let Some(slots) = slots_mut(map) {
                slots.remove(i);
            }
        }
        (None, Some(value)) => {
            let slot = json!({
                "slotType": field.slot_type(),
                "name": field.key,
                "value": value,
            });

            match map
                .entry(SLOT_COLLECTION)
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                Value::Array(slots) => slots.push(slot),
                other => {
                    tracing::warn!(raw = %other, key = %field.key, "slot collection is not an array");
                }
            }
        }
        (None, None) => {}
    }
}

// Cleared fields drop their value unless declared required, in which case
// a multi-valued one keeps an empty list.
fn encode_attribute(field: &FieldNode) -> Option<Value> {
    codec::encode_attribute(field.value(), field.multi_valued)
        .or_else(|| (field.is_required() && field.multi_valued).then(|| Value::Array(Vec::new())))
}

fn encode_slot(field: &FieldNode) -> Option<Value> {
    codec::encode(field.value(), field.value_type, field.multi_valued)
        .or_else(|| (field.is_required() && field.multi_valued).then(|| Value::Array(Vec::new())))
}

// Drop slots whose field was removed. Nameless entries are kept.
fn prune_slots(map: &mut Map<String, Value>, fields: &[FieldNode]) {
    let Some(slots) = slots_mut(map) else {
        return;
    };

    slots.retain(|slot| match slot.get("name").and_then(Value::as_str) {
        Some(name) => fields.iter().any(|f| f.is_slot && f.key == name),
        None => true,
    });
}

fn slots(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    map.get(SLOT_COLLECTION).and_then(Value::as_array)
}

fn slots_mut(map: &mut Map<String, Value>) -> Option<&mut Vec<Value>> {
    map.get_mut(SLOT_COLLECTION).and_then(Value::as_array_mut)
}
