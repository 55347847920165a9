//! In-memory storage implementation for document stores.
//!
//! Each collection is an insertion-ordered map from `_id` to document guarded
//! by its own async-aware read-write lock. Every operation holds that lock for
//! its whole duration, so operations on one collection are atomic with respect
//! to each other and concurrent updates of the same array never lose writes.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use bson::Document;
use indexmap::IndexMap;
use mea::rwlock::RwLock;
use tracing::debug;

use rosterdb_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::document_id,
    error::{DocumentStoreError, DocumentStoreResult},
    filter::Filter,
    update::{Update, UpdateResult},
};

use crate::{
    aggregate::DistinctAggregator,
    evaluator::DocumentEvaluator,
    executor::UpdateExecutor,
};

type CollectionMap = IndexMap<String, Document>;
type CollectionRef = Arc<RwLock<CollectionMap>>;
type StoreMap = HashMap<String, CollectionRef>;


/// Thread-safe in-memory document storage backend.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Performance
///
/// Lookups by `_id` are a single map access. Listing and aggregation scan
/// the whole collection, which is fine for the tens to low thousands of
/// documents this store is meant for.
///
/// # Example
///
/// ```ignore
/// use rosterdb_memory::InMemoryStore;
/// use rosterdb::{backend::StoreBackend, filter::Filter};
/// use bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     store.insert_documents(vec![doc! { "_id": "Art Club", "participants": [] }], "activities").await?;
///
///     let club = store.find_document(&Filter::by_id("Art Club"), "activities").await?;
///     assert!(club.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    collections: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    ///
    /// ```ignore
    /// let store = InMemoryStore::builder().build().await.unwrap();
    /// ```
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    async fn collection(&self, name: &str) -> Option<CollectionRef> {
        self.collections
            .read()
            .await
            .get(name)
            .cloned()
    }

    async fn collection_or_create(&self, name: &str) -> CollectionRef {
        self.collections
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(CollectionMap::new())))
            .clone()
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn count_documents(&self, collection: &str) -> DocumentStoreResult<u64> {
        let count = match self.collection(collection).await {
            Some(documents) => documents.read().await.len() as u64,
            None => 0,
        };

        debug!(collection, count, "counted documents");

        Ok(count)
    }

    async fn insert_documents(&self, documents: Vec<Document>, collection: &str) -> DocumentStoreResult<()> {
        let collection_ref = self.collection_or_create(collection).await;
        let mut collection_map = collection_ref.write().await;

        // Validate the whole batch before storing any of it.
        let mut incoming = CollectionMap::with_capacity(documents.len());

        for document in documents {
            let id = document_id(&document)?.to_string();

            if collection_map.contains_key(&id) || incoming.contains_key(&id) {
                return Err(DocumentStoreError::DocumentAlreadyExists(id, collection.to_string()));
            }

            incoming.insert(id, document);
        }

        let inserted = incoming.len();
        collection_map.extend(incoming);

        debug!(collection, inserted, "inserted documents");

        Ok(())
    }

    async fn find_document(&self, filter: &Filter, collection: &str) -> DocumentStoreResult<Option<Document>> {
        let Some(id) = filter.id() else {
            return Ok(None);
        };
        let Some(collection_ref) = self.collection(collection).await else {
            return Ok(None);
        };

        let collection_map = collection_ref.read().await;
        let found = match collection_map.get(id) {
            Some(document) => DocumentEvaluator::new(document)
                .evaluate(filter)?
                .map(|_| document.clone()),
            None => None,
        };

        debug!(collection, id, found = found.is_some(), "find one");

        Ok(found)
    }

    async fn find_documents(&self, filter: &Filter, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let Some(collection_ref) = self.collection(collection).await else {
            return Ok(vec![]);
        };

        let collection_map = collection_ref.read().await;
        let documents = DocumentEvaluator::filter_documents(collection_map.values(), filter)?;

        debug!(collection, returned = documents.len(), "find many");

        Ok(documents)
    }

    async fn update_document(
        &self,
        filter: &Filter,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        let Some(id) = filter.id() else {
            debug!(collection, "update without an identifier matches nothing");
            return Ok(UpdateResult::UNMODIFIED);
        };
        let Some(collection_ref) = self.collection(collection).await else {
            return Ok(UpdateResult::UNMODIFIED);
        };

        let mut collection_map = collection_ref.write().await;
        let Some(document) = collection_map.get_mut(id) else {
            debug!(collection, id, "update target not found");
            return Ok(UpdateResult::UNMODIFIED);
        };
        let Some(selection) = DocumentEvaluator::new(document).evaluate(filter)? else {
            debug!(collection, id, "update filter selected no element");
            return Ok(UpdateResult::UNMODIFIED);
        };

        let result = UpdateExecutor::new(&selection).execute(document, update);

        debug!(
            collection,
            id,
            field = update.path().name(),
            modified = result.modified_count,
            "update one"
        );

        Ok(result)
    }

    async fn distinct_values(&self, field: &str, collection: &str) -> DocumentStoreResult<Vec<String>> {
        let Some(collection_ref) = self.collection(collection).await else {
            return Ok(vec![]);
        };

        let collection_map = collection_ref.read().await;
        let values = DistinctAggregator::aggregate(field, collection_map.values());

        debug!(collection, field, distinct = values.len(), "distinct values");

        Ok(values)
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// ```ignore
/// use rosterdb_memory::InMemoryStore;
/// use rosterdb::backend::StoreBackendBuilder;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryStore::builder().build().await.unwrap();
/// }
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
