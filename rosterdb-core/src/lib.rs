//! Core of the rosterdb document store.
//!
//! rosterdb stores BSON documents keyed by a caller-supplied string `_id` and
//! supports exactly the operations a small CRUD service needs: counting,
//! inserting, identifier lookups, appending to and removing from arrays (at
//! the top level or inside one selected array element) and a distinct-values
//! aggregation.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Typed documents and BSON conversion
//! - **Filters** ([`filter`]) - Identifier and array-element selection
//! - **Updates** ([`update`]) - The append and remove array operators
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing storage backends
//! - **Collections interface** ([`collection`]) - Per-collection handles, typed or untyped
//! - **Document store** ([`store`]) - Owner of a backend, static or dynamically dispatched
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use rosterdb::prelude::*;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Account {
//!     #[serde(rename = "_id")]
//!     pub username: String,
//!     pub display_name: String,
//! }
//!
//! impl Document for Account {
//!     fn id(&self) -> &str {
//!         &self.username
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "teachers"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as rosterdb_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod filter;
pub mod store;
pub mod update;
