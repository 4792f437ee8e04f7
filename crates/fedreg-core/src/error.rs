use crate::ThisError;

///
/// TreeError
///
/// Structural misuse of a segment tree. Malformed record data is never an
/// error; it degrades to empty or custom fields instead.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum TreeError {
    #[error("field '{key}' already exists on segment '{segment_id}'")]
    DuplicateField { segment_id: String, key: String },

    #[error("field '{key}' not found on segment '{segment_id}'")]
    FieldNotFound { segment_id: String, key: String },

    #[error("segment '{segment_id}' is not a collection")]
    NotACollection { segment_id: String },

    #[error("segment '{segment_id}' does not accept custom fields")]
    NotCustomizable { segment_id: String },

    #[error("segment '{segment_id}' not found")]
    SegmentNotFound { segment_id: String },
}

impl TreeError {
    pub(crate) fn not_found(segment_id: &str) -> Self {
        Self::SegmentNotFound {
            segment_id: segment_id.to_string(),
        }
    }
}
