use super::{SegmentNode, SegmentShape, TreeEnv};
use crate::field::FieldNode;
use fedreg_schema::{
    ID_ATTRIBUTE, SLOT_COLLECTION,
    prelude::{Entry, GroupDef, ValueType},
};
use serde_json::{Map, Value};

impl SegmentNode {
    /// Build this node's fields and children from `raw`, which it then
    /// owns. An array makes a collection node and an object a record node.
    pub fn populate(&mut self, raw: Value, env: &mut TreeEnv<'_>) {
        self.schema = env.registry.resolve(&self.segment_type);
        self.fields.clear();
        self.segments.clear();

        match raw {
            Value::Array(items) => self.populate_collection(items, env),
            Value::Object(map) => self.populate_record(map, env),
            Value::Null if self.multi_valued => self.populate_collection(Vec::new(), env),
            Value::Null => self.populate_record(Map::new(), env),
            other => {
                tracing::warn!(
                    segment_type = %self.segment_type,
                    raw = %other,
                    "segment value is neither an object nor an array; kept as is"
                );
                self.populate_opaque(other, env);
            }
        }

        tracing::debug!(
            segment_id = %self.segment_id,
            segment_type = %self.segment_type,
            fields = self.fields.len(),
            segments = self.segments.len(),
            "segment populated"
        );
    }

    fn populate_collection(&mut self, items: Vec<Value>, env: &mut TreeEnv<'_>) {
        self.shape = SegmentShape::Collection;
        if self.segment_id.is_empty() {
            self.segment_id = env.ids.next_id();
        }

        for item in items {
            let item = if item.is_null() {
                Value::Object(Map::new())
            } else {
                item
            };

            let mut child = self.element_node(env);
            child.populate(item, env);
            self.segments.push(child);
        }

        self.backing = Value::Array(self.segments.iter().map(|c| c.backing.clone()).collect());
    }

    // A scalar where a record belongs. It gets no fields, and `save` writes
    // it back unchanged.
    fn populate_opaque(&mut self, raw: Value, env: &mut TreeEnv<'_>) {
        self.shape = SegmentShape::Record;
        if self.segment_id.is_empty() {
            self.segment_id = env.ids.next_id();
        }
        self.backing = raw;
    }

    fn populate_record(&mut self, mut map: Map<String, Value>, env: &mut TreeEnv<'_>) {
        self.shape = SegmentShape::Record;
        let existing = map
            .get(ID_ATTRIBUTE)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        self.segment_id = match existing {
            Some(id) => id,
            None => {
                let id = env.ids.next_id();
                map.insert(ID_ATTRIBUTE.to_string(), Value::String(id.clone()));
                id
            }
        };

        let schema = self.schema;
        for attr in schema.attributes {
            match &attr.entry {
                Entry::Group(def) => {
                    let target = attr.target_type().unwrap_or(attr.name);
                    let sub = self.take_group_value(&mut map, attr.name, target, def, env);

                    let mut child = if def.multi_valued || sub.is_array() {
                        SegmentNode::collection(target, def.display_name)
                    } else {
                        SegmentNode::record(target, def.display_name)
                    };
                    child.parent_id = Some(self.segment_id.clone());
                    child.nested_level = self.nested_level + 1;
                    child.title = def.title;
                    child.container_only = env.registry.is_container_only(target);
                    child.attribute = Some(attr.name.to_string());

                    child.populate(sub, env);
                    map.insert(attr.name.to_string(), child.backing.clone());
                    self.segments.push(child);
                }
                Entry::Plain(def) => {
                    let mut field = FieldNode::declared(attr.name, def, false);
                    match map.get(attr.name) {
                        Some(raw) if !is_falsy(raw) => field.load_attribute(raw),
                        _ => field.load_defaults(def.defaults),
                    }
                    self.fields.push(field);
                }
                Entry::Slot(_) => {}
            }
        }

        self.populate_slots(&map);
        self.backing = Value::Object(map);
    }

    // Declared slots in schema order, then undeclared ones as custom fields
    // in record order.
    fn populate_slots(&mut self, map: &Map<String, Value>) {
        let slots: &[Value] = map
            .get(SLOT_COLLECTION)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for (name, def) in self.schema.slots() {
            let mut field = FieldNode::declared(name, def, true);
            match slots.iter().find(|slot| slot_name(slot) == Some(name)) {
                Some(slot) => field.load_slot(slot.get("value").unwrap_or(&Value::Null)),
                None => field.load_defaults(def.defaults),
            }
            self.fields.push(field);
        }

        for slot in slots {
            let Some(name) = slot_name(slot) else {
                continue;
            };
            let declared = self.schema.slots().any(|(declared, _)| declared == name);
            let seen = self.fields.iter().any(|f| f.is_custom && f.key == name);
            if declared || seen {
                continue;
            }

            let slot_type = slot.get("slotType").and_then(Value::as_str);
            let (value_type, multi_valued) = match slot_type.and_then(ValueType::from_slot_type) {
                Some(ty) => (ty, ty == ValueType::String),
                None => (ValueType::String, true),
            };

            let mut field = FieldNode::custom(name, value_type, multi_valued);
            field.slot_type = slot_type.map(str::to_string);
            field.load_slot(slot.get("value").unwrap_or(&Value::Null));
            tracing::debug!(segment_id = %self.segment_id, name, ?slot_type, "custom slot found");

            self.fields.push(field);
        }
    }

    // Take a group's value out of the record for its child to populate.
    // A missing value becomes an empty placeholder.
    fn take_group_value(
        &self,
        map: &mut Map<String, Value>,
        name: &str,
        target: &str,
        def: &GroupDef,
        env: &TreeEnv<'_>,
    ) -> Value {
        match map.get_mut(name).map(Value::take) {
            Some(value) if !value.is_null() => value,
            _ => {
                let placeholder = if def.multi_valued || env.registry.is_container_only(target) {
                    Value::Array(Vec::new())
                } else {
                    Value::Object(Map::new())
                };
                tracing::debug!(segment_id = %self.segment_id, name, "group placeholder created");

                placeholder
            }
        }
    }
}

fn slot_name(slot: &Value) -> Option<&str> {
    slot.get("name").and_then(Value::as_str)
}

pub(super) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
