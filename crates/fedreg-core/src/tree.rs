use crate::{
    association::{AssociationLinks, AssociationTable},
    config::EditorConfig,
    error::TreeError,
    field::FieldNode,
    id::IdSource,
    segment::{SegmentNode, TreeEnv},
    template::TemplateBook,
    validate::{Issues, PathSegment, ValidateError},
    value::FieldValue,
};
use fedreg_schema::prelude::{Registry, ValueType};
use serde_json::Value;

///
/// SegmentTree
///
/// A forest of populated segments plus the collaborators they share: the
/// registry, the id source, the association links and the auto-population
/// templates. Structural mutation goes through the tree so every new or
/// removed segment is announced to the links.
///

pub struct SegmentTree<L = AssociationTable> {
    registry: &'static Registry,
    ids: Box<dyn IdSource>,
    links: L,
    templates: TemplateBook,
    roots: Vec<SegmentNode>,
}

// Split borrow: the collaborators as an env, plus the roots.
macro_rules! split_env {
    ($tree:expr) => {{
        let SegmentTree {
            registry,
            ids,
            links,
            templates,
            roots,
        } = $tree;
        (
            TreeEnv {
                registry: *registry,
                ids: ids.as_mut(),
                links,
                templates,
            },
            roots,
        )
    }};
}

impl<L: AssociationLinks> SegmentTree<L> {
    #[must_use]
    pub fn new(
        registry: &'static Registry,
        ids: Box<dyn IdSource>,
        links: L,
        templates: TemplateBook,
    ) -> Self {
        Self {
            registry,
            ids,
            links,
            templates,
            roots: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_config(registry: &'static Registry, config: &EditorConfig, links: L) -> Self {
        Self::new(registry, config.ids.source(), links, config.template_book())
    }

    /// Populate `node` from `raw` and add it as a root.
    pub fn insert_root(&mut self, mut node: SegmentNode, raw: Value) -> &mut SegmentNode {
        let (mut env, roots) = split_env!(self);
        node.populate(raw, &mut env);

        let index = roots.len();
        roots.push(node);

        &mut roots[index]
    }

    #[must_use]
    pub const fn registry(&self) -> &'static Registry {
        self.registry
    }

    #[must_use]
    pub fn roots(&self) -> &[SegmentNode] {
        &self.roots
    }

    #[must_use]
    pub fn into_roots(self) -> Vec<SegmentNode> {
        self.roots
    }

    #[must_use]
    pub const fn links(&self) -> &L {
        &self.links
    }

    pub const fn links_mut(&mut self) -> &mut L {
        &mut self.links
    }

    #[must_use]
    pub const fn templates(&self) -> &TemplateBook {
        &self.templates
    }

    pub fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    #[must_use]
    pub fn find(&self, segment_id: &str) -> Option<&SegmentNode> {
        self.roots.iter().find_map(|root| root.find(segment_id))
    }

    pub fn find_mut(&mut self, segment_id: &str) -> Option<&mut SegmentNode> {
        self.roots
            .iter_mut()
            .find_map(|root| root.find_mut(segment_id))
    }

    /// Append a record to the collection `parent_id`. Returns the new
    /// segment's id.
    pub fn add_segment(
        &mut self,
        parent_id: &str,
        pre_populate: Option<&str>,
    ) -> Result<String, TreeError> {
        let (mut env, roots) = split_env!(self);
        let parent = roots
            .iter_mut()
            .find_map(|root| root.find_mut(parent_id))
            .ok_or_else(|| TreeError::not_found(parent_id))?;

        let child = parent.add_segment(pre_populate, &mut env)?;

        Ok(child.segment_id.clone())
    }

    /// Detach `segment_id` from its collection.
    pub fn remove_segment(&mut self, segment_id: &str) -> Result<SegmentNode, TreeError> {
        let parent_id = self
            .find(segment_id)
            .and_then(|node| node.parent_id.clone())
            .ok_or_else(|| TreeError::not_found(segment_id))?;

        let (mut env, roots) = split_env!(self);
        let parent = roots
            .iter_mut()
            .find_map(|root| root.find_mut(&parent_id))
            .ok_or_else(|| TreeError::not_found(&parent_id))?;

        parent
            .remove_segment(segment_id, &mut env)?
            .ok_or_else(|| TreeError::not_found(segment_id))
    }

    /// Add a custom field to a customizable segment.
    pub fn add_field(
        &mut self,
        segment_id: &str,
        key: &str,
        value_type: ValueType,
        initial: Option<FieldValue>,
    ) -> Result<&mut FieldNode, TreeError> {
        let registry = self.registry;
        let node = self
            .find_mut(segment_id)
            .ok_or_else(|| TreeError::not_found(segment_id))?;

        if !registry.is_customizable(&node.segment_type) {
            return Err(TreeError::NotCustomizable {
                segment_id: segment_id.to_string(),
            });
        }
        if node.get_field(key).is_some() {
            return Err(TreeError::DuplicateField {
                segment_id: segment_id.to_string(),
                key: key.to_string(),
            });
        }

        node.add_field(key, value_type, initial)
            .ok_or_else(|| TreeError::NotACollection {
                segment_id: segment_id.to_string(),
            })
    }

    pub fn remove_field(&mut self, segment_id: &str, key: &str) -> Result<FieldNode, TreeError> {
        let node = self
            .find_mut(segment_id)
            .ok_or_else(|| TreeError::not_found(segment_id))?;

        node.remove_field(key).ok_or_else(|| TreeError::FieldNotFound {
            segment_id: segment_id.to_string(),
            key: key.to_string(),
        })
    }

    /// Announce every customizable record segment to the links, e.g. right
    /// after loading a record.
    pub fn announce_segments(&mut self) {
        let registry = self.registry;
        let mut found = Vec::new();

        for root in &self.roots {
            root.visit(&mut |node| {
                if !node.is_collection() && registry.is_customizable(&node.segment_type) {
                    found.push((
                        node.segment_id.clone(),
                        node.segment_type.clone(),
                        node.construct_title(),
                    ));
                }
            });
        }

        for (id, segment_type, title) in found {
            self.links.segment_created(&id, &segment_type, &title);
        }
    }

    pub fn save(&mut self) {
        for root in &mut self.roots {
            root.save();
        }
    }

    /// Validate every root. Paths start with each root's segment type.
    pub fn validate(&mut self) -> Result<(), ValidateError> {
        let mut issues = Issues::new();

        for root in &mut self.roots {
            let name = root.segment_type.clone();
            issues.push(PathSegment::Field(&name));
            root.collect_issues(&mut issues);
            issues.pop();
        }

        issues.into_result()
    }

    /// Re-key a segment anywhere in the tree. The links follow the new id.
    pub fn replace_id(&mut self, old: &str, new: &str) -> bool {
        let replaced = self
            .roots
            .iter_mut()
            .fold(false, |replaced, root| root.replace_id(old, new) || replaced);
        if replaced {
            self.links.segment_renamed(old, new);
        }

        replaced
    }
}
