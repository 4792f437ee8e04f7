use crate::{prelude::*, validate::validate_registry};

///
/// Registry
///
/// Static table of every segment type the editor knows. Lookups never fail:
/// an unknown segment type resolves to [`SegmentSchema::EMPTY`], so records
/// of unrecognized shape degrade to custom slot handling.
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Registry {
    segments: &'static [SegmentSchema],
}

impl Registry {
    #[must_use]
    pub const fn new(segments: &'static [SegmentSchema]) -> Self {
        Self { segments }
    }

    /// Registry slice for `segment_type`.
    #[must_use]
    pub fn resolve(&self, segment_type: &str) -> &'static SegmentSchema {
        self.segments
            .iter()
            .find(|schema| schema.segment_type == segment_type)
            .unwrap_or(&SegmentSchema::EMPTY)
    }

    #[must_use]
    pub fn contains(&self, segment_type: &str) -> bool {
        self.segments
            .iter()
            .any(|schema| schema.segment_type == segment_type)
    }

    #[must_use]
    pub fn is_customizable(&self, segment_type: &str) -> bool {
        self.resolve(segment_type).customizable
    }

    #[must_use]
    pub fn is_container_only(&self, segment_type: &str) -> bool {
        self.resolve(segment_type).container_only
    }

    pub fn segments(&self) -> impl Iterator<Item = &'static SegmentSchema> {
        self.segments.iter()
    }

    /// Check the table's structural invariants.
    pub fn validate(&self) -> Result<(), SchemaError> {
        validate_registry(self)
    }
}
