//! Editing session over one federation node record.
//!
//! A node record wraps its registry objects in a `RegistryObjectList`:
//!
//! ```json
//! {"id": "...", "objectType": "...", "RegistryObjectList": {
//!     "ExtrinsicObject": [...], "Service": [...], "Organization": [...],
//!     "Person": [...], "Association": [...]}}
//! ```
//!
//! The node's own `ExtrinsicObject` becomes the General section and every
//! other `ExtrinsicObject` a content collection. Each section is a root of
//! one [`SegmentTree`]; associations go to the tree's link table.

use crate::{
    Error,
    store::{RecordStore, StoreError},
};
use derive_more::Display;
use fedreg_core::{
    prelude::*,
    schema::{
        ID_ATTRIBUTE,
        federation::{self, NODE_OBJECT_TYPE},
    },
};
use serde_json::{Map, Value, json};

/// Id of a node record that has not been stored yet.
pub const TEMP_ID: &str = "temp-id";

/// Id given to a synthesized node `ExtrinsicObject`.
pub const NODE_ID: &str = "urn:registry:node";

const OBJECT_LIST: &str = "RegistryObjectList";
const EXTRINSIC_OBJECT: &str = "ExtrinsicObject";
const ASSOCIATION: &str = "Association";
const OBJECT_TYPE: &str = "objectType";

///
/// Section
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Section {
    General,
    Services,
    Organizations,
    Contacts,
    Content,
}

impl Section {
    pub const ALL: [Self; 5] = [
        Self::General,
        Self::Services,
        Self::Organizations,
        Self::Contacts,
        Self::Content,
    ];

    #[must_use]
    pub const fn segment_type(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Services => "Service",
            Self::Organizations => "Organization",
            Self::Contacts => "Person",
            Self::Content => "Content",
        }
    }

    #[must_use]
    pub const fn segment_name(self) -> &'static str {
        match self {
            Self::General => "General Information",
            Self::Services => "Services",
            Self::Organizations => "Organizations",
            Self::Contacts => "Contacts",
            Self::Content => "Content Collections",
        }
    }

    #[must_use]
    pub const fn title(self) -> TitleKind {
        match self {
            Self::Contacts => TitleKind::PersonName,
            _ => TitleKind::Name,
        }
    }

    // Collection of the object list the section is stored in.
    const fn collection(self) -> &'static str {
        match self {
            Self::General | Self::Content => EXTRINSIC_OBJECT,
            Self::Services => "Service",
            Self::Organizations => "Organization",
            Self::Contacts => "Person",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

///
/// NodeEditor
///

pub struct NodeEditor {
    // the record with its object list taken out
    envelope: Map<String, Value>,
    objects: Map<String, Value>,
    tree: SegmentTree<AssociationTable>,
    block_save_on_error: bool,
}

impl NodeEditor {
    /// Open a node record. Missing collections, ids and the node object
    /// itself are filled in.
    #[must_use]
    pub fn open(record: Value, config: &EditorConfig) -> Self {
        let mut envelope = match record {
            Value::Object(map) => map,
            other => {
                tracing::warn!(raw = %other, "node record is not an object; starting empty");
                Map::new()
            }
        };

        let has_id = envelope
            .get(ID_ATTRIBUTE)
            .and_then(Value::as_str)
            .is_some_and(|id| !id.is_empty());
        if !has_id {
            envelope.insert(ID_ATTRIBUTE.to_string(), Value::String(TEMP_ID.to_string()));
        }
        envelope
            .entry(OBJECT_TYPE)
            .or_insert_with(|| Value::String(NODE_OBJECT_TYPE.to_string()));

        let mut objects = match envelope.get_mut(OBJECT_LIST).map(Value::take) {
            Some(Value::Object(map)) => map,
            Some(Value::Null) | None => Map::new(),
            Some(other) => {
                tracing::warn!(raw = %other, "object list is not an object; starting empty");
                Map::new()
            }
        };

        let (mut general, content): (Vec<_>, Vec<_>) = take_array(&mut objects, EXTRINSIC_OBJECT)
            .into_iter()
            .partition(|object| object[OBJECT_TYPE] == json!(NODE_OBJECT_TYPE));
        if general.is_empty() {
            general.push(json!({
                "id": NODE_ID,
                "objectType": NODE_OBJECT_TYPE,
                "Name": "",
            }));
        }

        let links = AssociationTable::from_records(&take_array(&mut objects, ASSOCIATION));
        let mut tree = SegmentTree::from_config(federation::registry(), config, links);

        let raws = [
            general,
            take_array(&mut objects, Section::Services.collection()),
            take_array(&mut objects, Section::Organizations.collection()),
            take_array(&mut objects, Section::Contacts.collection()),
            content,
        ];
        for (section, raw) in Section::ALL.into_iter().zip(raws) {
            let node = SegmentNode::collection(section.segment_type(), section.segment_name())
                .titled(section.title());

            tree.insert_root(node, Value::Array(raw));
        }
        tree.announce_segments();

        let editor = Self {
            envelope,
            objects,
            tree,
            block_save_on_error: config.validation.block_save_on_error,
        };
        tracing::debug!(id = editor.id(), "node record opened");

        editor
    }

    /// Fetch a node record from `store` and open it.
    pub fn load(store: &dyn RecordStore, id: &str, config: &EditorConfig) -> Result<Self, Error> {
        let record = store.fetch(id)?;

        Ok(Self::open(record, config))
    }

    /// The record id, [`TEMP_ID`] until the record is first stored.
    #[must_use]
    pub fn id(&self) -> &str {
        self.envelope
            .get(ID_ATTRIBUTE)
            .and_then(Value::as_str)
            .unwrap_or(TEMP_ID)
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id() == TEMP_ID
    }

    #[must_use]
    pub const fn tree(&self) -> &SegmentTree<AssociationTable> {
        &self.tree
    }

    pub const fn tree_mut(&mut self) -> &mut SegmentTree<AssociationTable> {
        &mut self.tree
    }

    #[must_use]
    pub fn section(&self, section: Section) -> &SegmentNode {
        &self.tree.roots()[section.index()]
    }

    /// Link two segments. Returns false when the link already exists.
    pub fn link(&mut self, source: &str, target: &str) -> bool {
        let id = self.tree.next_id();

        self.tree.links_mut().add_link(id, source, target)
    }

    pub fn validate(&mut self) -> Result<(), ValidateError> {
        self.tree.validate()
    }

    /// Write every section back and reassemble the node record.
    pub fn save(&mut self) -> Value {
        self.tree.save();

        let sections = self.tree.roots();
        let array = |section: Section| {
            sections[section.index()]
                .backing_record()
                .as_array()
                .cloned()
                .unwrap_or_default()
        };

        let mut extrinsic = array(Section::General);
        extrinsic.extend(array(Section::Content));
        self.objects
            .insert(EXTRINSIC_OBJECT.to_string(), Value::Array(extrinsic));

        for section in [Section::Services, Section::Organizations, Section::Contacts] {
            self.objects
                .insert(section.collection().to_string(), Value::Array(array(section)));
        }
        self.objects.insert(
            ASSOCIATION.to_string(),
            Value::Array(self.tree.links().to_records()),
        );

        let mut record = self.envelope.clone();
        record.insert(OBJECT_LIST.to_string(), Value::Object(self.objects.clone()));

        Value::Object(record)
    }

    /// Save, validate, and hand the record to `store`. A new record is
    /// created and takes the id the store assigns; an existing one is
    /// updated. The editor is unchanged by a failed commit, so it can be
    /// retried. Returns the record id.
    pub fn commit(&mut self, store: &mut dyn RecordStore) -> Result<String, Error> {
        let mut record = self.save();

        if let Err(err) = self.tree.validate() {
            if self.block_save_on_error {
                tracing::info!(id = self.id(), "commit blocked by validation errors");
                return Err(err.into());
            }
            tracing::warn!(id = self.id(), %err, "committing a record that fails validation");
        }

        if !self.is_new() {
            let id = self.id().to_string();
            store
                .update(&id, &record)
                .inspect_err(|err| tracing::info!(%id, %err, "node update failed"))?;
            tracing::info!(%id, "node record updated");

            return Ok(id);
        }

        if let Value::Object(map) = &mut record {
            map.shift_remove(ID_ATTRIBUTE);
        }
        let id = store
            .create(&record)
            .inspect_err(|err| tracing::info!(%err, "node create failed"))?;
        self.envelope
            .insert(ID_ATTRIBUTE.to_string(), Value::String(id.clone()));
        tracing::info!(%id, "node record created");

        Ok(id)
    }

    /// Delete node records from `store`.
    pub fn delete(store: &mut dyn RecordStore, ids: &[String]) -> Result<(), Error> {
        store
            .delete(ids)
            .inspect_err(|err: &StoreError| tracing::info!(?ids, %err, "node delete failed"))?;
        tracing::info!(?ids, "node records deleted");

        Ok(())
    }
}

// Take a collection out of the object list, leaving its slot in place.
fn take_array(objects: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match objects.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            tracing::warn!(key, raw = %other, "collection is not an array; starting empty");
            Vec::new()
        }
    }
}

///
/// TESTS
///
