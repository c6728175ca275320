//! Driver abstraction for document-store adapters.
//!
//! This module defines the narrow interface the facade consumes. The facade
//! never talks to a database directly; every operation dispatches through a
//! [`DocumentDriver`], so backends (a live MongoDB deployment, an in-memory
//! map) are interchangeable.
//!
//! Connection, database selection, and authentication belong to adapter
//! construction: a built driver is already scoped to exactly one database,
//! and collections are addressed by name on each call. Collections are
//! created implicitly on first write, per document-store semantics.
//!
//! # Traits
//!
//! - [`DocumentDriver`]: the operations an adapter must provide
//! - [`DriverBuilder`]: factory trait for constructing adapters
//!
//! # Error Handling
//!
//! Operations return [`MantleResult<T>`](crate::error::MantleResult).
//! Adapters translate their native failures into the facade taxonomy; they
//! perform no retries, so transient transport failures surface to the
//! caller as [`MantleError::Connection`](crate::error::MantleError).

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;
use futures::stream::BoxStream;
use std::fmt::Debug;

use crate::error::MantleResult;
use crate::query::{AlterSet, FilterSet};

/// A finite, single-pass sequence of matching documents.
///
/// The stream is non-restartable: once consumed it cannot be rewound, and
/// dropping it discards any unread remainder. Callers wanting a fully
/// materialized result use the facade's materializing form instead of
/// consuming the stream themselves.
pub type DocumentStream = BoxStream<'static, MantleResult<Document>>;

/// Abstract interface for document-store adapters.
///
/// Implementations must be safe for concurrent use from multiple async
/// tasks (`Send + Sync`); the facade adds no synchronization of its own.
/// All methods are one logical round trip: they return only once the
/// underlying store has completed or refused the operation.
#[async_trait]
pub trait DocumentDriver: Send + Sync + Debug {
    /// Lists the names of all non-system collections in the database.
    async fn list_collections(&self) -> MantleResult<Vec<String>>;

    /// Inserts one document, returning its identifier.
    ///
    /// When the document carries no `_id`, the adapter assigns one.
    async fn insert_one(&self, collection: &str, document: Document) -> MantleResult<ObjectId>;

    /// Inserts a batch of documents in one operation, returning the assigned
    /// identifiers in input order.
    ///
    /// On partial failure the adapter reports
    /// [`MantleError::BulkWrite`](crate::error::MantleError) carrying the
    /// identifiers inserted before the failure, when the store exposes them.
    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> MantleResult<Vec<ObjectId>>;

    /// Returns the first document matching the filter, in store iteration
    /// order, or `None` when nothing matches.
    async fn find_one(&self, collection: &str, filter: FilterSet)
        -> MantleResult<Option<Document>>;

    /// Returns matching documents as a [`DocumentStream`], up to `limit`
    /// when one is given.
    async fn find(
        &self,
        collection: &str,
        filter: FilterSet,
        limit: Option<usize>,
    ) -> MantleResult<DocumentStream>;

    /// Applies a partial update to the first matching document and returns
    /// its post-update state, or `None` when nothing matches.
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: FilterSet,
        alter: AlterSet,
    ) -> MantleResult<Option<Document>>;

    /// Applies a partial update to every matching document, returning the
    /// count of documents actually modified (not merely matched).
    async fn update_many(
        &self,
        collection: &str,
        filter: FilterSet,
        alter: AlterSet,
    ) -> MantleResult<u64>;

    /// Deletes every matching document, returning the count deleted.
    async fn delete_many(&self, collection: &str, filter: FilterSet) -> MantleResult<u64>;

    /// Counts matching documents without materializing or mutating them.
    async fn count_documents(&self, collection: &str, filter: FilterSet) -> MantleResult<u64>;

    /// Cleanly shuts down the adapter, releasing connections and other
    /// resources. The default implementation is a no-op.
    async fn shutdown(self) -> MantleResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory trait for constructing driver adapters.
#[async_trait]
pub trait DriverBuilder {
    /// The adapter type this builder produces.
    type Driver: DocumentDriver;

    /// Builds the adapter.
    ///
    /// Failure here means the adapter could not even be constructed (for
    /// example, a malformed endpoint). A successful build does not imply a
    /// live round trip to the store; adapters may connect lazily, in which
    /// case unreachable endpoints surface on the first operation instead.
    async fn build(self) -> MantleResult<Self::Driver>;
}
