//! MongoDB driver implementation.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use futures::{StreamExt, TryStreamExt};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::{ClientOptions, FindOptions, ReturnDocument};
use mongodb::{Client, Collection as MongoCollection};
use tracing::debug;

use mantle_core::driver::{DocumentDriver, DocumentStream, DriverBuilder};
use mantle_core::error::{MantleError, MantleResult};
use mantle_core::query::{AlterSet, FilterSet};

use crate::config::ConnectionConfig;

/// Driver adapter over the asynchronous MongoDB client.
///
/// The client pools connections internally and is safe for concurrent use;
/// the adapter adds no synchronization, retries, or timeouts of its own.
#[derive(Debug)]
pub struct MongoDriver {
    client: Client,
    database: String,
}

impl MongoDriver {
    /// Wraps an already-constructed client, scoped to one database.
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    /// Creates a builder from connection parameters.
    pub fn builder(config: ConnectionConfig) -> MongoDriverBuilder {
        MongoDriverBuilder::new(config)
    }

    /// Creates a builder from a raw connection string.
    pub fn builder_from_uri(uri: &str, database: &str) -> MongoDriverBuilder {
        MongoDriverBuilder::from_uri(uri, database)
    }

    fn collection(&self, name: &str) -> MongoCollection<Document> {
        self.client.database(&self.database).collection(name)
    }
}

/// Translates a client error into the facade taxonomy.
///
/// Transport-level failures map to `Connection`, encoding failures to
/// `Serialization`, aborted batches to `BulkWrite` with whatever partial
/// results the client reports, and everything else passes through as
/// `Backend`.
fn translate_error(err: MongoError) -> MantleError {
    match &*err.kind {
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => MantleError::Connection(err.to_string()),
        ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
            MantleError::Serialization(err.to_string())
        }
        ErrorKind::InsertMany(failure) => MantleError::BulkWrite {
            inserted: failure
                .inserted_ids
                .values()
                .filter_map(Bson::as_object_id)
                .collect(),
            message: err.to_string(),
        },
        _ => MantleError::Backend(err.to_string()),
    }
}

fn identifier_from(value: Bson) -> MantleResult<ObjectId> {
    value.as_object_id().ok_or_else(|| {
        MantleError::Serialization(format!("store returned a non-ObjectId identifier: {value}"))
    })
}

#[async_trait]
impl DocumentDriver for MongoDriver {
    async fn list_collections(&self) -> MantleResult<Vec<String>> {
        Ok(self
            .client
            .database(&self.database)
            .list_collection_names()
            .await
            .map_err(translate_error)?
            .into_iter()
            .filter(|name| !name.starts_with("system."))
            .collect())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> MantleResult<ObjectId> {
        let result = self
            .collection(collection)
            .insert_one(document)
            .await
            .map_err(translate_error)?;

        identifier_from(result.inserted_id)
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> MantleResult<Vec<ObjectId>> {
        let result = self
            .collection(collection)
            .insert_many(documents)
            .await
            .map_err(translate_error)?;

        // inserted_ids is keyed by input position; restore input order.
        let mut ids = result
            .inserted_ids
            .into_iter()
            .collect::<Vec<(usize, Bson)>>();
        ids.sort_by_key(|(index, _)| *index);

        ids.into_iter()
            .map(|(_, id)| identifier_from(id))
            .collect()
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: FilterSet,
    ) -> MantleResult<Option<Document>> {
        self.collection(collection)
            .find_one(filter.into_document())
            .await
            .map_err(translate_error)
    }

    async fn find(
        &self,
        collection: &str,
        filter: FilterSet,
        limit: Option<usize>,
    ) -> MantleResult<DocumentStream> {
        let mut options = FindOptions::default();
        if let Some(limit) = limit {
            options.limit = Some(limit as i64);
        }

        let cursor = self
            .collection(collection)
            .find(filter.into_document())
            .with_options(options)
            .await
            .map_err(translate_error)?;

        Ok(cursor.map_err(translate_error).boxed())
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: FilterSet,
        alter: AlterSet,
    ) -> MantleResult<Option<Document>> {
        self.collection(collection)
            .find_one_and_update(
                filter.into_document(),
                doc! { "$set": alter.into_document() },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(translate_error)
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: FilterSet,
        alter: AlterSet,
    ) -> MantleResult<u64> {
        let result = self
            .collection(collection)
            .update_many(
                filter.into_document(),
                doc! { "$set": alter.into_document() },
            )
            .await
            .map_err(translate_error)?;

        Ok(result.modified_count)
    }

    async fn delete_many(&self, collection: &str, filter: FilterSet) -> MantleResult<u64> {
        let result = self
            .collection(collection)
            .delete_many(filter.into_document())
            .await
            .map_err(translate_error)?;

        Ok(result.deleted_count)
    }

    async fn count_documents(&self, collection: &str, filter: FilterSet) -> MantleResult<u64> {
        self.collection(collection)
            .count_documents(filter.into_document())
            .await
            .map_err(translate_error)
    }

    async fn shutdown(self) -> MantleResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

/// Builder for [`MongoDriver`] instances.
pub struct MongoDriverBuilder {
    uri: String,
    database: String,
}

impl MongoDriverBuilder {
    /// Creates a builder from connection parameters.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            uri: config.connection_string(),
            database: config.database,
        }
    }

    /// Creates a builder from a raw connection string.
    pub fn from_uri(uri: &str, database: &str) -> Self {
        Self {
            uri: uri.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl DriverBuilder for MongoDriverBuilder {
    type Driver = MongoDriver;

    /// Parses the endpoint and constructs the client.
    ///
    /// Fails with `Connection` on a malformed endpoint. No round trip to
    /// the server happens here; an unreachable deployment surfaces on the
    /// first operation instead.
    async fn build(self) -> MantleResult<Self::Driver> {
        let options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| MantleError::Connection(e.to_string()))?;
        let client =
            Client::with_options(options).map_err(|e| MantleError::Connection(e.to_string()))?;

        debug!(database = %self.database, "mongodb client constructed");

        Ok(MongoDriver::new(client, self.database))
    }
}
