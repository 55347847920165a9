//! Collection handles for document store operations.
//!
//! A collection handle pairs a collection name with a borrowed backend and
//! exposes the operations callers issue against one collection:
//!
//! - [`Collection`] - Untyped collection working on raw BSON documents
//! - [`TypedCollection`] - Type-safe collection for a specific [`Document`] type
//!
//! # Example
//!
//! ```ignore
//! use rosterdb::prelude::*;
//! use bson::doc;
//!
//! # async fn example(store: &DocumentStore<impl StoreBackend>) -> DocumentStoreResult<()> {
//! let activities = store.collection("activities");
//! activities.insert(doc! { "_id": "Chess Club", "participants": [] }).await?;
//!
//! let result = activities
//!     .update_one(
//!         &Filter::by_id("Chess Club"),
//!         &Update::append(FieldPath::top_level("participants"), "michael@mergington.edu"),
//!     )
//!     .await?;
//! assert_eq!(result.modified_count, 1);
//! # Ok(()) }
//! ```

use std::marker::PhantomData;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    filter::Filter,
    update::{Update, UpdateResult},
};

/// Dotted path of the meeting days array inside an activity document.
pub const SCHEDULE_DAYS_FIELD: &str = "schedule_details.days";

/// An untyped collection with a reference to a storage backend.
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend> {
    name: String,
    backend: &'a B,
}

impl<'a, B: StoreBackend> Collection<'a, B> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of documents currently stored.
    pub async fn count(&self) -> DocumentStoreResult<u64> {
        self.backend
            .count_documents(self.name())
            .await
    }

    /// Inserts one document. It must carry a string `_id` not already in use.
    pub async fn insert(&self, document: bson::Document) -> DocumentStoreResult<()> {
        self.insert_many(vec![document]).await
    }

    /// Inserts several documents; nothing is stored if any of them is rejected.
    pub async fn insert_many(&self, documents: Vec<bson::Document>) -> DocumentStoreResult<()> {
        self.backend
            .insert_documents(documents, self.name())
            .await
    }

    pub async fn find_one(&self, filter: &Filter) -> DocumentStoreResult<Option<bson::Document>> {
        self.backend
            .find_document(filter, self.name())
            .await
    }

    pub async fn find_many(&self, filter: &Filter) -> DocumentStoreResult<Vec<bson::Document>> {
        self.backend
            .find_documents(filter, self.name())
            .await
    }

    pub async fn update_one(&self, filter: &Filter, update: &Update) -> DocumentStoreResult<UpdateResult> {
        self.backend
            .update_document(filter, update, self.name())
            .await
    }

    /// Distinct string values at a dotted field path, ascending.
    pub async fn distinct(&self, field: &str) -> DocumentStoreResult<Vec<String>> {
        self.backend
            .distinct_values(field, self.name())
            .await
    }

    /// Every day any activity in this collection meets on, ascending and without duplicates.
    pub async fn aggregate_distinct_days(&self) -> DocumentStoreResult<Vec<String>> {
        self.distinct(SCHEDULE_DAYS_FIELD).await
    }
}

/// A type-safe collection for documents of type `D`.
///
/// Documents are converted through BSON on the way in and out, so the calling
/// layer can work with plain structs while updates still address raw fields.
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The same collection without the type conversion.
    pub fn untyped(&self) -> Collection<'a, B> {
        Collection::new(self.name.clone(), self.backend)
    }

    pub async fn count(&self) -> DocumentStoreResult<u64> {
        self.untyped().count().await
    }

    pub async fn insert(&self, documents: Vec<D>) -> DocumentStoreResult<()> {
        self.backend
            .insert_documents(
                documents
                    .iter()
                    .map(DocumentExt::to_bson_document)
                    .collect::<DocumentStoreResult<Vec<bson::Document>>>()?,
                self.name(),
            )
            .await
    }

    pub async fn find_one(&self, id: &str) -> DocumentStoreResult<Option<D>> {
        self.backend
            .find_document(&Filter::by_id(id), self.name())
            .await?
            .map(D::from_bson_document)
            .transpose()
    }

    pub async fn find_many(&self, filter: &Filter) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .find_documents(filter, self.name())
            .await?
            .into_iter()
            .map(D::from_bson_document)
            .collect::<DocumentStoreResult<Vec<D>>>()
    }

    pub async fn update_one(&self, filter: &Filter, update: &Update) -> DocumentStoreResult<UpdateResult> {
        self.untyped()
            .update_one(filter, update)
            .await
    }
}
