//! Schema-driven editing of registry records.
//!
//! A record is populated into a tree of [`SegmentNode`](segment::SegmentNode)s
//! and [`FieldNode`](field::FieldNode)s, edited in place, and saved back into
//! the same record shape.

pub mod association;
pub mod codec;
pub mod config;
pub mod error;
pub mod field;
pub mod id;
pub mod segment;
pub mod template;
pub mod tree;
pub mod validate;
pub mod value;

pub use fedreg_schema as schema;

pub(crate) use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),

    #[error(transparent)]
    TreeError(#[from] error::TreeError),

    #[error(transparent)]
    ValidateError(#[from] validate::ValidateError),
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        association::{AssociationLinks, AssociationTable, Link, LinkTarget, NoLinks},
        config::EditorConfig,
        error::TreeError,
        field::{FieldChange, FieldNode},
        id::{CounterIds, IdSource, UlidIds},
        segment::{SegmentNode, SegmentShape, TreeEnv},
        template::{Template, TemplateBook, TemplateValue},
        tree::SegmentTree,
        validate::ValidateError,
        value::{BoundsParts, DateParts, FieldValue, PointParts, ValuePart},
    };
    pub use fedreg_schema::prelude::{Registry, TitleKind, ValueType};
}
