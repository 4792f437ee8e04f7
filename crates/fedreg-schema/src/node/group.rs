use crate::prelude::*;

///
/// GroupDef
///
/// Descriptor for a nested sub-record (or collection of sub-records).
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct GroupDef {
    pub display_name: &'static str,
    pub multi_valued: bool,

    /// Segment type of the nested record; the attribute name when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_type: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleKind>,
}

impl GroupDef {
    #[must_use]
    pub const fn one(display_name: &'static str) -> Self {
        Self {
            display_name,
            multi_valued: false,
            segment_type: None,
            title: None,
        }
    }

    #[must_use]
    pub const fn many(display_name: &'static str, title: TitleKind) -> Self {
        Self {
            display_name,
            multi_valued: true,
            segment_type: None,
            title: Some(title),
        }
    }

    #[must_use]
    pub const fn of_type(mut self, segment_type: &'static str) -> Self {
        self.segment_type = Some(segment_type);
        self
    }
}
