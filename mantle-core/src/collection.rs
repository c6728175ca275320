//! Operations bound to one named collection.
//!
//! A [`CollectionHandle`] borrows a driver and a collection name and exposes
//! the facade's normalized operations against that single collection. The
//! session hands these out both for its active collection and, via
//! [`DocumentSession::collection`](crate::session::DocumentSession::collection),
//! for arbitrary ones: callers working with several collections at once hold
//! one handle per collection instead of re-selecting a shared session's
//! active slot from concurrent tasks.

use bson::oid::ObjectId;
use bson::Document;
use futures::TryStreamExt;
use tracing::debug;

use crate::document::IntoDocumentId;
use crate::driver::{DocumentDriver, DocumentStream};
use crate::error::{MantleError, MantleResult};
use crate::query::{AlterSet, FilterSet};

/// A borrowed view of one collection, with the normalized operations bound
/// to it.
///
/// Handles are cheap: they hold the collection name and a reference to the
/// driver, nothing else.
#[derive(Debug)]
pub struct CollectionHandle<'a, D: DocumentDriver> {
    name: String,
    driver: &'a D,
}

impl<'a, D: DocumentDriver> CollectionHandle<'a, D> {
    pub(crate) fn new(name: String, driver: &'a D) -> Self {
        Self { name, driver }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts one document and returns its identifier.
    ///
    /// The store assigns the identifier when the document carries none; a
    /// supplied `_id` is kept and returned as-is.
    pub async fn create(&self, document: Document) -> MantleResult<ObjectId> {
        debug!(collection = %self.name, "insert document");
        self.driver.insert_one(&self.name, document).await
    }

    /// Inserts a batch of documents in one operation, returning their
    /// identifiers in input order.
    ///
    /// # Errors
    ///
    /// Returns [`MantleError::InvalidArgument`] for an empty batch, and
    /// [`MantleError::BulkWrite`] when the store accepted only part of the
    /// batch.
    pub async fn create_bulk(&self, documents: Vec<Document>) -> MantleResult<Vec<ObjectId>> {
        if documents.is_empty() {
            return Err(MantleError::InvalidArgument(
                "bulk insert requires at least one document".to_string(),
            ));
        }

        debug!(collection = %self.name, count = documents.len(), "insert batch");
        self.driver.insert_many(&self.name, documents).await
    }

    /// Returns the first document matching all filter fields by equality,
    /// or `None` when nothing matches.
    ///
    /// "First" follows the store's natural iteration order, which is
    /// unspecified and may change between calls; with more than one match,
    /// treat the choice as arbitrary.
    pub async fn get(&self, filter: FilterSet) -> MantleResult<Option<Document>> {
        self.driver.find_one(&self.name, filter).await
    }

    /// Looks up one document by identifier.
    ///
    /// The identifier is normalized through [`IntoDocumentId`]; an
    /// unparsable string fails with [`MantleError::InvalidArgument`] before
    /// the store is contacted.
    pub async fn get_by_id<I: IntoDocumentId>(&self, id: I) -> MantleResult<Option<Document>> {
        let id = id.into_document_id()?;
        self.driver
            .find_one(&self.name, FilterSet::by_id(id))
            .await
    }

    /// Returns all matching documents, fully materialized, up to `limit`
    /// when one is given.
    ///
    /// This is the convenience form of [`filter_stream`](Self::filter_stream):
    /// it drains the stream before returning, trading streaming for
    /// simplicity.
    pub async fn filter(
        &self,
        filter: FilterSet,
        limit: Option<usize>,
    ) -> MantleResult<Vec<Document>> {
        self.filter_stream(filter, limit)
            .await?
            .try_collect()
            .await
    }

    /// Returns matching documents as a finite, single-pass stream.
    ///
    /// The stream cannot be restarted; callers preferring a plain vector
    /// use [`filter`](Self::filter).
    pub async fn filter_stream(
        &self,
        filter: FilterSet,
        limit: Option<usize>,
    ) -> MantleResult<DocumentStream> {
        self.driver.find(&self.name, filter, limit).await
    }

    /// Counts matching documents without materializing or mutating them.
    ///
    /// This is the count-only form of [`filter`](Self::filter); the store
    /// is never modified by counting.
    pub async fn count(&self, filter: FilterSet) -> MantleResult<u64> {
        self.driver.count_documents(&self.name, filter).await
    }

    /// Applies a partial update to the first matching document and returns
    /// its post-update state, or `None` when nothing matches.
    ///
    /// Only one document changes even when several match; the tie-break is
    /// the store's iteration order, which is unspecified.
    pub async fn update(
        &self,
        filter: FilterSet,
        alter: AlterSet,
    ) -> MantleResult<Option<Document>> {
        validate_alter(&alter)?;
        self.driver
            .find_one_and_update(&self.name, filter, alter)
            .await
    }

    /// Applies a partial update to the document with the given identifier,
    /// returning its post-update state.
    ///
    /// Equivalent to [`update`](Self::update) with an identifier filter.
    pub async fn update_by_id<I: IntoDocumentId>(
        &self,
        id: I,
        alter: AlterSet,
    ) -> MantleResult<Option<Document>> {
        let id = id.into_document_id()?;
        self.update(FilterSet::by_id(id), alter).await
    }

    /// Applies a partial update to every matching document.
    ///
    /// Returns the count of documents actually modified, which can be lower
    /// than the matched count when fields already held the target values.
    pub async fn update_bulk(&self, filter: FilterSet, alter: AlterSet) -> MantleResult<u64> {
        validate_alter(&alter)?;
        debug!(collection = %self.name, "update matching documents");
        self.driver.update_many(&self.name, filter, alter).await
    }

    /// Deletes every matching document, returning the count deleted.
    pub async fn delete(&self, filter: FilterSet) -> MantleResult<u64> {
        debug!(collection = %self.name, "delete matching documents");
        self.driver.delete_many(&self.name, filter).await
    }

    pub(crate) async fn clear(&self) -> MantleResult<u64> {
        debug!(collection = %self.name, "clear collection");
        self.driver
            .delete_many(&self.name, FilterSet::new())
            .await
    }
}

fn validate_alter(alter: &AlterSet) -> MantleResult<()> {
    if alter.is_empty() {
        return Err(MantleError::InvalidArgument(
            "alteration must set at least one field".to_string(),
        ));
    }
    if alter.touches_id() {
        return Err(MantleError::InvalidArgument(
            "the _id field is immutable and cannot be altered".to_string(),
        ));
    }

    Ok(())
}
