//! Opening a store from configuration.
//!
//! MongoDB is used when the crate is built with the `mongodb` feature, a
//! connection string is configured and the server answers a ping within the
//! server selection timeout. In every other case the store silently degrades
//! to the in-memory backend, which holds the same data for the life of the
//! process only.

use tracing::{info, warn};

use rosterdb_core::{
    backend::StoreBackendBuilder,
    error::DocumentStoreResult,
    store::{DocumentStore, DynDocumentStore},
};
use rosterdb_memory::InMemoryStore;

use crate::{
    config::StoreConfig,
    seed::{Seeded, init_database},
};


/// Opens the configured backend, falling back to memory if MongoDB is unavailable.
pub async fn open(config: &StoreConfig) -> DocumentStoreResult<DynDocumentStore> {
    if let Some(uri) = config.mongodb_uri.as_deref() {
        match connect_mongodb(uri, config).await {
            Ok(Some(store)) => return Ok(store),
            Ok(None) => warn!("built without MongoDB support, using in-memory storage"),
            Err(e) => warn!(error = %e, "MongoDB connection failed, using in-memory storage"),
        }
    }

    let store = DocumentStore::new(InMemoryStore::builder().build().await?);

    info!("using in-memory storage");

    Ok(store.into_dyn())
}

/// Opens the configured backend and, if the configuration asks for it, seeds
/// the empty collections.
pub async fn open_seeded(
    config: &StoreConfig,
    hash_password: impl Fn(&str) -> String,
) -> DocumentStoreResult<(DynDocumentStore, Seeded)> {
    let store = open(config).await?;
    let seeded = if config.seed {
        init_database(&store, hash_password).await?
    } else {
        Seeded::default()
    };

    Ok((store, seeded))
}

/// Whether the store ended up on the in-memory fallback.
pub fn is_in_memory(store: &DynDocumentStore) -> bool {
    store.as_static::<InMemoryStore>().is_some()
}

#[cfg(feature = "mongodb")]
async fn connect_mongodb(uri: &str, config: &StoreConfig) -> DocumentStoreResult<Option<DynDocumentStore>> {
    use rosterdb_mongodb::MongoDbStore;

    let backend = MongoDbStore::builder(uri, &config.database)
        .server_selection_timeout(config.server_selection_timeout())
        .build()
        .await?;

    Ok(Some(DocumentStore::new(backend).into_dyn()))
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongodb(_uri: &str, _config: &StoreConfig) -> DocumentStoreResult<Option<DynDocumentStore>> {
    Ok(None)
}
