//! Declarative description of registry record shapes: which attributes a
//! segment type carries, how each is stored, and which constraints apply.

pub mod constraint;
pub mod federation;
pub mod node;
pub mod registry;
pub mod types;
pub mod validate;

/// Name of the generic extension-attribute collection on a record.
pub const SLOT_COLLECTION: &str = "Slot";

/// Identifier attribute on every record.
pub const ID_ATTRIBUTE: &str = "id";

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        constraint::Constraint,
        node::*,
        registry::Registry,
        types::{TitleKind, ValueType},
        validate::SchemaError,
    };
    pub(crate) use serde::Serialize;
    pub(crate) use thiserror::Error as ThisError;
}
