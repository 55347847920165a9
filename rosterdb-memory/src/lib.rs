//! In-memory document storage backend for rosterdb.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It is the fallback used whenever no MongoDB server is reachable, and it is what the
//! test suites run against.
//!
//! # Features
//!
//! - **Per-collection locking** - Each call holds its collection's async-aware RwLock from start to finish
//! - **Insertion order** - Listing a collection returns documents in the order they were inserted
//! - **Element-aware updates** - Appends and removals can target the array element a filter matched
//! - **Distinct aggregation** - Sorted distinct string values at a dotted path
//!
//! # Quick Start
//!
//! ```ignore
//! use rosterdb::{prelude::*, memory::InMemoryStore};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryStore::builder().build().await?;
//!     let store = DocumentStore::new(backend);
//!     let activities = store.collection("activities");
//!
//!     activities.insert(doc! { "_id": "Art Club", "participants": [] }).await?;
//!     activities
//!         .update_one(
//!             &Filter::by_id("Art Club"),
//!             &Update::append(FieldPath::top_level("participants"), "amelia@mergington.edu"),
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as rosterdb_memory;

pub mod store;
mod aggregate;
mod evaluator;
mod executor;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
