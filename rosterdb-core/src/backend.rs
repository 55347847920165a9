//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait is the full operation contract a storage
//! implementation must offer: counting, inserting, identifier lookups, single
//! document array updates and distinct-value aggregation. Implementations
//! must be thread-safe and make each call atomic with respect to every other
//! call on the same collection.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: Object-safe mirror of [`StoreBackend`] for picking a backend at runtime
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use rosterdb::backend::StoreBackend;
//! use rosterdb::filter::Filter;
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//!
//! backend.insert_documents(vec![doc! { "_id": "Chess Club", "participants": [] }], "activities").await?;
//! let club = backend.find_document(&Filter::by_id("Chess Club"), "activities").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Document;
use std::{any::Any, fmt::Debug};

use crate::{
    error::DocumentStoreResult,
    filter::Filter,
    update::{Update, UpdateResult},
};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from
/// multiple async tasks. Two concurrent [`update_document`](Self::update_document)
/// calls on the same document must not lose either mutation, and no reader may
/// observe a document half way through an update.
///
/// # Error Handling
///
/// A lookup that finds nothing returns `Ok(None)` or an empty vector and an
/// update that matches nothing returns [`UpdateResult::UNMODIFIED`]. Errors are
/// reserved for invalid input and for failures of the storage itself.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Returns the number of documents stored in a collection.
    ///
    /// Collections that were never written to hold zero documents.
    async fn count_documents(&self, collection: &str) -> DocumentStoreResult<u64>;

    /// Inserts new documents into a collection.
    ///
    /// Every document must carry a string `_id`. A document whose `_id` is
    /// already taken, in the collection or earlier in the same batch, is
    /// rejected with [`DocumentAlreadyExists`](crate::error::DocumentStoreError::DocumentAlreadyExists)
    /// and never overwrites the stored document.
    ///
    /// # Arguments
    ///
    /// * `documents` - The documents to insert
    /// * `collection` - The name of the collection to insert into. Created automatically if it doesn't exist.
    async fn insert_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<()>;

    /// Returns the single document matched by an identifier filter.
    ///
    /// [`Filter::All`] carries no identifier and therefore returns `Ok(None)`.
    async fn find_document(
        &self,
        filter: &Filter,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>>;

    /// Returns every document matched by the filter.
    ///
    /// For [`Filter::All`] this is the whole collection, in a deterministic order.
    async fn find_documents(
        &self,
        filter: &Filter,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;

    /// Applies one array update to the document matched by the filter.
    ///
    /// At most one document and at most one array are changed. The returned
    /// `modified_count` is 1 if an array was changed and 0 otherwise.
    async fn update_document(
        &self,
        filter: &Filter,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult>;

    /// Returns the distinct string values found at a dotted field path across
    /// a collection, in ascending order.
    ///
    /// Intermediate path segments name sub-documents. An array at the end of
    /// the path contributes each of its string elements. Documents lacking the
    /// path contribute nothing.
    async fn distinct_values(&self, field: &str, collection: &str) -> DocumentStoreResult<Vec<String>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op, but backends with external
    /// connections should override this.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn count_documents(&self, collection: &str) -> DocumentStoreResult<u64> {
        (*self).count_documents(collection).await
    }

    async fn insert_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        (*self)
            .insert_documents(documents, collection)
            .await
    }

    async fn find_document(
        &self,
        filter: &Filter,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        (*self)
            .find_document(filter, collection)
            .await
    }

    async fn find_documents(
        &self,
        filter: &Filter,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (*self)
            .find_documents(filter, collection)
            .await
    }

    async fn update_document(
        &self,
        filter: &Filter,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        (*self)
            .update_document(filter, update, collection)
            .await
    }

    async fn distinct_values(&self, field: &str, collection: &str) -> DocumentStoreResult<Vec<String>> {
        (*self)
            .distinct_values(field, collection)
            .await
    }
}

/// Object-safe counterpart of [`StoreBackend`].
///
/// Every [`StoreBackend`] implements this trait, so a backend chosen at
/// runtime can be boxed as `Box<dyn DynStoreBackend>` and still be used
/// wherever a [`StoreBackend`] is expected.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn count_documents(&self, collection: &str) -> DocumentStoreResult<u64>;
    async fn insert_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<()>;
    async fn find_document(
        &self,
        filter: &Filter,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>>;
    async fn find_documents(
        &self,
        filter: &Filter,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>>;
    async fn update_document(
        &self,
        filter: &Filter,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult>;
    async fn distinct_values(&self, field: &str, collection: &str) -> DocumentStoreResult<Vec<String>>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;

    fn as_any(&self) -> &dyn Any;
}

#[async_trait]
impl<B: StoreBackend + Send + Sync + 'static> DynStoreBackend for B {
    async fn count_documents(&self, collection: &str) -> DocumentStoreResult<u64> {
        StoreBackend::count_documents(self, collection).await
    }

    async fn insert_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        StoreBackend::insert_documents(self, documents, collection)
            .await
    }

    async fn find_document(
        &self,
        filter: &Filter,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        StoreBackend::find_document(self, filter, collection)
            .await
    }

    async fn find_documents(
        &self,
        filter: &Filter,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        StoreBackend::find_documents(self, filter, collection)
            .await
    }

    async fn update_document(
        &self,
        filter: &Filter,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        StoreBackend::update_document(self, filter, update, collection)
            .await
    }

    async fn distinct_values(&self, field: &str, collection: &str) -> DocumentStoreResult<Vec<String>> {
        StoreBackend::distinct_values(self, field, collection)
            .await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[async_trait]
impl StoreBackend for Box<dyn DynStoreBackend> {
    async fn count_documents(&self, collection: &str) -> DocumentStoreResult<u64> {
        (**self).count_documents(collection).await
    }

    async fn insert_documents(
        &self,
        documents: Vec<Document>,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        (**self)
            .insert_documents(documents, collection)
            .await
    }

    async fn find_document(
        &self,
        filter: &Filter,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        (**self)
            .find_document(filter, collection)
            .await
    }

    async fn find_documents(
        &self,
        filter: &Filter,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        (**self)
            .find_documents(filter, collection)
            .await
    }

    async fn update_document(
        &self,
        filter: &Filter,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        (**self)
            .update_document(filter, update, collection)
            .await
    }

    async fn distinct_values(&self, field: &str, collection: &str) -> DocumentStoreResult<Vec<String>> {
        (**self)
            .distinct_values(field, collection)
            .await
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        DynStoreBackend::shutdown_boxed(self).await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
