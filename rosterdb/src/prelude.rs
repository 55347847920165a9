//! Convenient re-exports of commonly used types from rosterdb.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use rosterdb::prelude::*;
//! ```
//!
//! This provides access to:
//! - Document traits and implementations
//! - Store backends and builders
//! - Filters and array updates
//! - Collection interfaces
//! - Error types

pub use rosterdb_core::{
    collection::{Collection, TypedCollection},
    store::{DocumentStore, DynDocumentStore},
    document::{Document, DocumentExt},
    backend::{StoreBackend, StoreBackendBuilder},
    filter::{Filter, ElementSelector, FilterVisitor},
    update::{Update, FieldPath, UpdateResult},
    error::{DocumentStoreError, DocumentStoreResult},
};
