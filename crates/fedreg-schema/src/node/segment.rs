use crate::prelude::*;

///
/// SegmentSchema
///
/// The registry slice for one segment type: its attributes in declaration
/// order plus the editing flags the tree consults.
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct SegmentSchema {
    pub segment_type: &'static str,
    pub attributes: &'static [Attribute],

    /// Whether ad-hoc custom slot fields may be added.
    pub customizable: bool,

    /// Whether the segment only hosts children and is never edited itself.
    pub container_only: bool,
}

impl SegmentSchema {
    /// Slice used for segment types the registry does not know.
    pub const EMPTY: Self = Self::new("", &[]);

    #[must_use]
    pub const fn new(segment_type: &'static str, attributes: &'static [Attribute]) -> Self {
        Self {
            segment_type,
            attributes,
            customizable: false,
            container_only: false,
        }
    }

    #[must_use]
    pub const fn customizable(mut self) -> Self {
        self.customizable = true;
        self
    }

    #[must_use]
    pub const fn container_only(mut self) -> Self {
        self.container_only = true;
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Slot-backed attributes in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = (&'static str, &'static FieldDef)> {
        self.attributes.iter().filter_map(|attr| match &attr.entry {
            Entry::Slot(def) => Some((attr.name, def)),
            _ => None,
        })
    }
}
