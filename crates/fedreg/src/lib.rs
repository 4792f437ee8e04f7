//! ## Crate layout
//! - `core`: the segment tree, value codec, configuration and collaborators.
//! - `schema`: segment schemas and the federation registry.
//! - `node`: the editing session over a whole federation node record.
//! - `store`: the persistence collaborator a node editor commits to.
//!
//! The `prelude` module brings in everything an editing front end needs.

pub use fedreg_core as core;
pub use fedreg_schema as schema;

pub mod node;
pub mod store;

use thiserror::Error as ThisError;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    ConfigError(#[from] core::config::ConfigError),

    #[error(transparent)]
    StoreError(#[from] store::StoreError),

    #[error(transparent)]
    TreeError(#[from] core::error::TreeError),

    #[error(transparent)]
    ValidateError(#[from] core::validate::ValidateError),
}

impl From<core::Error> for Error {
    fn from(err: core::Error) -> Self {
        match err {
            core::Error::ConfigError(err) => Self::ConfigError(err),
            core::Error::TreeError(err) => Self::TreeError(err),
            core::Error::ValidateError(err) => Self::ValidateError(err),
        }
    }
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        node::{NodeEditor, Section},
        store::{MemoryStore, RecordStore, StoreError},
    };
    pub use fedreg_core::prelude::*;
}
