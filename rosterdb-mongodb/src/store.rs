use std::time::Duration;
use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Bson, Document, doc};
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::ClientOptions,
};
use tracing::{debug, info, warn};

use rosterdb_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{ID_FIELD, document_id},
    error::{DocumentStoreError, DocumentStoreResult},
    filter::Filter,
    update::{Update, UpdateResult},
};

use crate::query::{MongoFilterTranslator, distinct_pipeline, translate_update};

const DUPLICATE_KEY: i32 = 11000;
const BAD_VALUE: i32 = 2;
const TYPE_MISMATCH: i32 = 14;

/// Default time the driver waits for a reachable server.
pub const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_millis(5000);


#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    /// Round-trips a `ping` command to check the server is reachable.
    pub async fn ping(&self) -> DocumentStoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        Ok(())
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

/// Index into the inserted batch of the first duplicate-key failure.
fn duplicate_key_index(error: &MongoError) -> Option<usize> {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => Some(0),
        ErrorKind::InsertMany(e) => e.write_errors
            .as_ref()?
            .iter()
            .find(|e| e.code == DUPLICATE_KEY)
            .map(|e| e.index),
        _ => None,
    }
}

/// Whether the server rejected an update because its target is not an array.
fn is_non_array_target(error: &MongoError) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == BAD_VALUE || e.code == TYPE_MISMATCH
    )
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn count_documents(&self, collection: &str) -> DocumentStoreResult<u64> {
        self.get_collection(collection)
            .count_documents(doc! {})
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))
    }

    /// Rejects the batch up front if any identifier is missing, repeated
    /// within the batch or already stored. A document inserted concurrently
    /// between that check and the write is still reported as a duplicate, but
    /// documents ahead of it in the batch will have been stored.
    async fn insert_documents(&self, documents: Vec<Document>, collection: &str) -> DocumentStoreResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut ids = Vec::with_capacity(documents.len());

        for document in &documents {
            let id = document_id(document)?;

            if ids.contains(&id) {
                return Err(DocumentStoreError::DocumentAlreadyExists(id.to_string(), collection.to_string()));
            }

            ids.push(id);
        }

        let mongo_collection = self.get_collection(collection);

        let existing = mongo_collection
            .find_one(doc! { ID_FIELD: { "$in": ids.clone() } })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        if let Some(existing) = existing {
            return Err(DocumentStoreError::DocumentAlreadyExists(
                document_id(&existing)?.to_string(),
                collection.to_string(),
            ));
        }

        let ids = ids.into_iter().map(str::to_string).collect::<Vec<_>>();

        mongo_collection
            .insert_many(documents)
            .await
            .map_err(|e| match duplicate_key_index(&e).and_then(|index| ids.get(index)) {
                Some(id) => DocumentStoreError::DocumentAlreadyExists(id.clone(), collection.to_string()),
                None => DocumentStoreError::Backend(e.to_string()),
            })?;

        debug!(collection, inserted = ids.len(), "inserted documents");

        Ok(())
    }

    async fn find_document(&self, filter: &Filter, collection: &str) -> DocumentStoreResult<Option<Document>> {
        if filter.id().is_none() {
            return Ok(None);
        }

        self.get_collection(collection)
            .find_one(MongoFilterTranslator::translate(filter)?)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))
    }

    async fn find_documents(&self, filter: &Filter, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        self.get_collection(collection)
            .find(MongoFilterTranslator::translate(filter)?)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))
    }

    async fn update_document(
        &self,
        filter: &Filter,
        update: &Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateResult> {
        if filter.id().is_none() {
            return Ok(UpdateResult::UNMODIFIED);
        }
        let Some(modifier) = translate_update(filter, update) else {
            debug!(collection, "update addresses a matched element but the filter selects none");
            return Ok(UpdateResult::UNMODIFIED);
        };

        let result = self.get_collection(collection)
            .update_one(MongoFilterTranslator::translate(filter)?, modifier)
            .await;

        match result {
            Ok(result) => Ok(UpdateResult { modified_count: result.modified_count }),
            Err(e) if is_non_array_target(&e) => {
                warn!(collection, field = update.path().name(), error = %e, "update target is not an array");
                Ok(UpdateResult::UNMODIFIED)
            },
            Err(e) => Err(DocumentStoreError::Backend(e.to_string())),
        }
    }

    async fn distinct_values(&self, field: &str, collection: &str) -> DocumentStoreResult<Vec<String>> {
        Ok(
            self.get_collection(collection)
                .aggregate(distinct_pipeline(field))
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .into_iter()
                .filter_map(|group| match group.get(ID_FIELD) {
                    Some(Bson::String(value)) => Some(value.clone()),
                    _ => None,
                })
                .collect()
        )
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    server_selection_timeout: Duration,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            server_selection_timeout: DEFAULT_SERVER_SELECTION_TIMEOUT,
        }
    }

    pub fn server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    /// Connects and pings the server, failing with
    /// [`Initialization`](DocumentStoreError::Initialization) if it is unreachable.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;
        options.server_selection_timeout = Some(self.server_selection_timeout);

        let store = MongoDbStore::new(
            Client::with_options(options)
                .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        );

        store.ping().await?;

        info!(database = %store.database, "connected to MongoDB");

        Ok(store)
    }
}
