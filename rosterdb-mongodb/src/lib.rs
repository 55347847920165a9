//! MongoDB backend implementation for rosterdb.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! translating filters, array updates and the distinct-values aggregation into
//! MongoDB's query, update and pipeline syntax.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! rosterdb = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The builder parses a connection string, applies the server selection
//! timeout and pings the server before handing out a store, so an unreachable
//! server is reported at build time rather than on first use.
//!
//! # Example
//!
//! ```ignore
//! use rosterdb::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017/", "mergington_high")
//!         .server_selection_timeout(Duration::from_secs(5))
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as rosterdb_mongodb;

pub mod store;
mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
