//! Segment nodes: the editable tree built from a registry record.
//!
//! Every node owns the record fragment it was populated from. A parent
//! keeps a copy of each child's fragment, generated ids and placeholders
//! included, and `save` refreshes that copy from the child once field edits
//! are written, so a node only ever writes its own fragment.

mod populate;
mod save;
mod title;


use crate::{
    association::AssociationLinks,
    error::TreeError,
    field::FieldNode,
    id::IdSource,
    template::TemplateBook,
    validate::{Issues, PathSegment, ValidateError},
    value::FieldValue,
};
use fedreg_schema::{
    ID_ATTRIBUTE,
    prelude::{Registry, SegmentSchema, TitleKind, ValueType},
};
use serde_json::{Map, Value};

///
/// TreeEnv
///
/// Collaborators threaded through population and structural mutation.
///

pub struct TreeEnv<'a> {
    pub registry: &'static Registry,
    pub ids: &'a mut dyn IdSource,
    pub links: &'a mut dyn AssociationLinks,
    pub templates: &'a TemplateBook,
}

///
/// SegmentShape
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SegmentShape {
    /// Backed by an array; one record child per element.
    Collection,
    /// Backed by an object; fields and groups come from the schema.
    Record,
}

///
/// SegmentNode
///

#[derive(Debug)]
pub struct SegmentNode {
    pub segment_id: String,
    pub parent_id: Option<String>,
    pub segment_type: String,
    pub segment_name: String,
    pub multi_valued: bool,
    pub container_only: bool,
    pub nested_level: usize,
    pub title: Option<TitleKind>,

    // attribute of the parent record this node is stored under
    attribute: Option<String>,
    shape: SegmentShape,
    fields: Vec<FieldNode>,
    segments: Vec<Self>,
    backing: Value,
    schema: &'static SegmentSchema,
}

impl SegmentNode {
    /// Unpopulated record node.
    #[must_use]
    pub fn record(segment_type: &str, segment_name: &str) -> Self {
        Self {
            segment_id: String::new(),
            parent_id: None,
            segment_type: segment_type.to_string(),
            segment_name: segment_name.to_string(),
            multi_valued: false,
            container_only: false,
            nested_level: 0,
            title: None,
            attribute: None,
            shape: SegmentShape::Record,
            fields: Vec::new(),
            segments: Vec::new(),
            backing: Value::Object(Map::new()),
            schema: &SegmentSchema::EMPTY,
        }
    }

    /// Unpopulated collection node.
    #[must_use]
    pub fn collection(segment_type: &str, segment_name: &str) -> Self {
        let mut node = Self::record(segment_type, segment_name);
        node.multi_valued = true;
        node.shape = SegmentShape::Collection;
        node.backing = Value::Array(Vec::new());

        node
    }

    #[must_use]
    pub const fn titled(mut self, title: TitleKind) -> Self {
        self.title = Some(title);
        self
    }

    #[must_use]
    pub fn with_id(mut self, segment_id: impl Into<String>) -> Self {
        self.segment_id = segment_id.into();
        self
    }

    // ---- accessors ----------------------------------------------------

    #[must_use]
    pub const fn shape(&self) -> SegmentShape {
        self.shape
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self.shape, SegmentShape::Collection)
    }

    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    #[must_use]
    pub const fn schema(&self) -> &'static SegmentSchema {
        self.schema
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldNode] {
        &self.fields
    }

    #[must_use]
    pub fn segments(&self) -> &[Self] {
        &self.segments
    }

    /// The backing record fragment. Field edits show up only after
    /// [`Self::save`]; ids and placeholders are there from populate on.
    #[must_use]
    pub const fn backing_record(&self) -> &Value {
        &self.backing
    }

    #[must_use]
    pub fn into_record(self) -> Value {
        self.backing
    }

    #[must_use]
    pub fn get_field(&self, key: &str) -> Option<&FieldNode> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn get_field_mut(&mut self, key: &str) -> Option<&mut FieldNode> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    /// This node or the descendant with `segment_id`.
    #[must_use]
    pub fn find(&self, segment_id: &str) -> Option<&Self> {
        if self.segment_id == segment_id {
            return Some(self);
        }

        self.segments.iter().find_map(|child| child.find(segment_id))
    }

    pub fn find_mut(&mut self, segment_id: &str) -> Option<&mut Self> {
        if self.segment_id == segment_id {
            return Some(self);
        }

        self.segments
            .iter_mut()
            .find_map(|child| child.find_mut(segment_id))
    }

    /// Visit this node and every descendant, depth-first.
    pub fn visit(&self, f: &mut dyn FnMut(&Self)) {
        f(self);
        for child in &self.segments {
            child.visit(f);
        }
    }

    /// Display label from the title rule, or the segment name.
    #[must_use]
    pub fn construct_title(&self) -> String {
        title::construct(self)
    }

    // ---- field mutation -----------------------------------------------

    /// Add a custom slot field. Returns `None` when the key is taken or
    /// this node is a collection.
    pub fn add_field(
        &mut self,
        key: &str,
        value_type: ValueType,
        initial: Option<FieldValue>,
    ) -> Option<&mut FieldNode> {
        if self.is_collection() || self.get_field(key).is_some() {
            return None;
        }

        let mut field = FieldNode::custom(key, value_type, value_type == ValueType::String);
        if let Some(value) = initial {
            field.set_value(value);
        }
        tracing::debug!(segment_id = %self.segment_id, key, %value_type, "custom field added");

        self.fields.push(field);
        self.fields.last_mut()
    }

    pub fn remove_field(&mut self, key: &str) -> Option<FieldNode> {
        let index = self.fields.iter().position(|f| f.key == key)?;

        Some(self.fields.remove(index))
    }

    // ---- segment mutation ---------------------------------------------

    /// Append an empty record child, optionally seeded from a template, and
    /// announce it to the association links.
    pub fn add_segment(
        &mut self,
        pre_populate: Option<&str>,
        env: &mut TreeEnv<'_>,
    ) -> Result<&mut Self, TreeError> {
        if !self.is_collection() {
            return Err(TreeError::NotACollection {
                segment_id: self.segment_id.clone(),
            });
        }

        let mut child = self.element_node(env);
        child.populate(Value::Object(Map::new()), env);
        if let Some(template_id) = pre_populate {
            child.apply_template(template_id, env);
        }

        let title = child.construct_title();
        env.links
            .segment_created(&child.segment_id, &child.segment_type, &title);
        tracing::debug!(segment_id = %child.segment_id, parent_id = %self.segment_id, "segment added");

        let index = self.segments.len();
        if let Value::Array(items) = &mut self.backing {
            items.push(child.backing.clone());
        }
        self.segments.push(child);

        Ok(&mut self.segments[index])
    }

    /// Detach the child with `segment_id`. Links referencing it or any of
    /// its descendants are dropped.
    pub fn remove_segment(
        &mut self,
        segment_id: &str,
        env: &mut TreeEnv<'_>,
    ) -> Result<Option<Self>, TreeError> {
        if !self.is_collection() {
            return Err(TreeError::NotACollection {
                segment_id: self.segment_id.clone(),
            });
        }

        let Some(index) = self.segments.iter().position(|s| s.segment_id == segment_id) else {
            return Ok(None);
        };
        let removed = self.segments.remove(index);
        if let Value::Array(items) = &mut self.backing
            && index < items.len()
        {
            items.remove(index);
        }

        removed.visit(&mut |node| env.links.segment_removed(&node.segment_id));
        tracing::debug!(segment_id, parent_id = %self.segment_id, "segment removed");

        Ok(Some(removed))
    }

    /// Re-key a segment, e.g. once the record store has assigned an id.
    /// Returns true if any node changed.
    pub fn replace_id(&mut self, old: &str, new: &str) -> bool {
        let mut replaced = false;

        if self.segment_id == old {
            self.segment_id = new.to_string();
            if let Value::Object(map) = &mut self.backing {
                map.insert(ID_ATTRIBUTE.to_string(), Value::String(new.to_string()));
            }
            replaced = true;
        }

        for index in 0..self.segments.len() {
            let child = &mut self.segments[index];
            if child.parent_id.as_deref() == Some(old) {
                child.parent_id = Some(new.to_string());
            }
            if child.replace_id(old, new) {
                self.refresh_child(index);
                replaced = true;
            }
        }

        replaced
    }

    // Copy a child's fragment back into this node's own.
    fn refresh_child(&mut self, index: usize) {
        let child = &self.segments[index];
        match &mut self.backing {
            Value::Array(items) => {
                if let Some(item) = items.get_mut(index) {
                    *item = child.backing.clone();
                }
            }
            Value::Object(map) => {
                if let Some(attr) = &child.attribute {
                    map.insert(attr.clone(), child.backing.clone());
                }
            }
            _ => {}
        }
    }

    // ---- validation ---------------------------------------------------

    /// Validate every field of this node and its descendants.
    pub fn validate(&mut self) -> Result<(), ValidateError> {
        let mut issues = Issues::new();
        self.collect_issues(&mut issues);

        issues.into_result()
    }

    pub(crate) fn collect_issues(&mut self, issues: &mut Issues) {
        for field in &mut self.fields {
            let messages = field.validate().to_vec();
            issues.add_issues_at(&field.key, &messages);
        }

        let collection = self.is_collection();
        for (index, child) in self.segments.iter_mut().enumerate() {
            if collection {
                issues.push(PathSegment::Index(index));
            } else {
                let name = child.attribute.clone().unwrap_or_else(|| child.segment_type.clone());
                issues.push(PathSegment::Field(&name));
            }
            child.collect_issues(issues);
            issues.pop();
        }
    }

    // ---- helpers ------------------------------------------------------

    // A fresh element for this collection.
    fn element_node(&self, env: &TreeEnv<'_>) -> Self {
        let mut child = Self::record(&self.segment_type, &self.segment_type);
        child.parent_id = Some(self.segment_id.clone());
        child.nested_level = self.nested_level + 1;
        child.title = self.title;
        child.container_only = env.registry.is_container_only(&self.segment_type);

        child
    }

    fn apply_template(&mut self, template_id: &str, env: &TreeEnv<'_>) {
        let Some(template) = env.templates.get(template_id) else {
            tracing::warn!(template_id, "unknown auto-population template");
            return;
        };
        if template.segment_type != self.segment_type {
            tracing::warn!(
                template_id,
                expected = %self.segment_type,
                found = %template.segment_type,
                "auto-population template targets another segment type"
            );
            return;
        }

        let customizable = self.schema.customizable;
        for (key, value) in &template.values {
            let value = FieldValue::from(value);

            if let Some(field) = self.get_field_mut(key) {
                field.set_value(value);
            } else if customizable {
                self.add_field(key, ValueType::String, Some(value));
            } else {
                tracing::warn!(template_id, key, "template key has no field on this segment");
            }
        }
    }
}
