use crate::prelude::*;

///
/// Entry
///
/// How one attribute of a segment type is materialized. Resolved once from
/// the registry; never re-inferred from record data.
///

#[derive(Clone, Copy, Debug, Serialize)]
pub enum Entry {
    /// Nested sub-record(s), populated as a child segment.
    Group(GroupDef),
    /// Direct named attribute on the record.
    Plain(FieldDef),
    /// Entry in the record's generic `Slot` collection.
    Slot(FieldDef),
}

///
/// Attribute
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub entry: Entry,
}

impl Attribute {
    #[must_use]
    pub const fn plain(name: &'static str, def: FieldDef) -> Self {
        Self {
            name,
            entry: Entry::Plain(def),
        }
    }

    #[must_use]
    pub const fn slot(name: &'static str, def: FieldDef) -> Self {
        Self {
            name,
            entry: Entry::Slot(def),
        }
    }

    #[must_use]
    pub const fn group(name: &'static str, def: GroupDef) -> Self {
        Self {
            name,
            entry: Entry::Group(def),
        }
    }

    /// Field descriptor for plain and slot attributes.
    #[must_use]
    pub const fn field_def(&self) -> Option<&FieldDef> {
        match &self.entry {
            Entry::Plain(def) | Entry::Slot(def) => Some(def),
            Entry::Group(_) => None,
        }
    }

    #[must_use]
    pub const fn group_def(&self) -> Option<&GroupDef> {
        match &self.entry {
            Entry::Group(def) => Some(def),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_slot(&self) -> bool {
        matches!(self.entry, Entry::Slot(_))
    }

    /// Segment type a group attribute resolves to.
    #[must_use]
    pub fn target_type(&self) -> Option<&'static str> {
        self.group_def()
            .map(|group| group.segment_type.unwrap_or(self.name))
    }
}
