//! The document store: an owned backend handing out collection handles.
//!
//! A store is constructed once at process start and passed to the calling
//! layer by reference; there is no global instance.
//!
//! ```ignore
//! use rosterdb::{prelude::*, memory::InMemoryStore};
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//! let activities = store.collection("activities");
//!
//! // Pick the backend at runtime instead
//! let dyn_store: DynDocumentStore = store.into_dyn();
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::{Collection, TypedCollection},
    document::Document,
    error::DocumentStoreResult,
};

#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

/// A document store whose backend was chosen at runtime.
pub type DynDocumentStore = DocumentStore<Box<dyn DynStoreBackend>>;

impl<B: StoreBackend> DocumentStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn typed_collection<'a, D: Document>(&'a self) -> TypedCollection<'a, B, D> {
        TypedCollection::new(D::collection_name().to_string(), &self.backend)
    }

    pub fn collection<'a>(&'a self, name: &str) -> Collection<'a, B> {
        Collection::new(name.to_string(), &self.backend)
    }

    /// Boxes the backend so stores with different backends share one type.
    pub fn into_dyn(self) -> DynDocumentStore
    where
        B: 'static,
    {
        let backend: Box<dyn DynStoreBackend> = Box::new(self.backend);

        DocumentStore::new(backend)
    }

    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await?;

        Ok(())
    }
}

impl DynDocumentStore {
    /// Borrows the store as its concrete backend type, if that is the backend in use.
    pub fn as_static<B>(&self) -> Option<DocumentStore<&B>>
    where
        B: StoreBackend + 'static,
    {
        (*self.backend)
            .as_any()
            .downcast_ref::<B>()
            .map(DocumentStore::new)
    }
}
