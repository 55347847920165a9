//! Main rosterdb crate providing a unified interface for document storage.
//!
//! This crate is the entry point for services built on rosterdb. It re-exports
//! the core types from the sub-crates, opens a store from configuration with
//! an automatic in-memory fallback, and seeds the activity catalogue.
//!
//! # Features
//!
//! - **Identifier lookups** - Documents are keyed by a caller-supplied string `_id`
//! - **Array updates** - Append to and remove from arrays, at the top level or inside the array element a filter matched
//! - **Distinct aggregation** - Sorted distinct meeting days across all activities
//! - **Two backends** - MongoDB (with the `mongodb` feature) and an in-memory fallback that agree except that MongoDB removes every occurrence of a value, not just the first
//!
//! # Quick Start
//!
//! ```ignore
//! use rosterdb::{prelude::*, config::StoreConfig, seed::Activity};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (store, _) = rosterdb::open_seeded(&StoreConfig::from_env()?, |password| hash(password)).await?;
//!
//!     // Sign a student up for the Chess Club practice sessions
//!     let result = store
//!         .collection("activities")
//!         .update_one(
//!             &Filter::by_element("Chess Club", "sub_activities", "id", "chess_practice"),
//!             &Update::append(FieldPath::matched_element("participants"), "emma@mergington.edu"),
//!         )
//!         .await?;
//!     assert_eq!(result.modified_count, 1);
//!
//!     // Read it back as a typed document
//!     let chess_club = store
//!         .typed_collection::<Activity>()
//!         .find_one("Chess Club")
//!         .await?;
//!
//!     // Every day any activity meets on
//!     let days = store.collection("activities").aggregate_distinct_days().await?;
//!
//!     store.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! [`open`] decides on the backend at runtime and therefore returns a
//! [`DynDocumentStore`](store::DynDocumentStore). A statically typed store can
//! be turned into one with `into_dyn`, and `as_static` recovers the concrete
//! backend when it is known.
//!
//! ```ignore
//! use rosterdb::{prelude::*, memory::InMemoryStore};
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?).into_dyn();
//! assert!(store.as_static::<InMemoryStore>().is_some());
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage, the fallback and the test backend
//! - `mongodb` - Persistent MongoDB backend (requires `mongodb` feature)

pub mod config;
pub mod prelude;
pub mod seed;
mod connect;

pub use rosterdb_core::{backend, collection, document, error, filter, store, update};
pub use connect::{is_in_memory, open, open_seeded};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use rosterdb_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use rosterdb_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
