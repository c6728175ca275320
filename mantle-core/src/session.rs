//! The stateful facade: a session tracking one active collection.
//!
//! A [`DocumentSession`] owns a driver and an active-collection slot. After
//! selecting a collection, every CRUD, filter, and count operation targets
//! it implicitly; selecting again replaces the slot. Operations issued
//! before any selection fail with
//! [`MantleError::NotConfigured`](crate::error::MantleError).
//!
//! # Concurrency
//!
//! The session holds no locks and performs no background work; every
//! operation is one awaited driver round trip. Selection takes `&mut self`,
//! so it cannot overlap an in-flight operation on the same session. Callers
//! working with several collections concurrently take per-collection
//! handles via [`collection`](DocumentSession::collection), or use one
//! session per collection, instead of re-selecting a shared slot.
//!
//! # Example
//!
//! ```ignore
//! use bson::doc;
//! use mantle_core::session::DocumentSession;
//!
//! let mut session = DocumentSession::new(driver);
//! session.select_collection("superheroes")?;
//!
//! let id = session.create(doc! { "nickname": "Batman" }).await?;
//! let hero = session.get_by_id(id).await?.expect("just inserted");
//! ```

use bson::oid::ObjectId;
use bson::Document;
use tracing::debug;

use crate::collection::CollectionHandle;
use crate::document::IntoDocumentId;
use crate::driver::{DocumentDriver, DocumentStream};
use crate::error::{MantleError, MantleResult};
use crate::query::{AlterSet, FilterSet};

/// A document-store facade with one active-collection slot.
#[derive(Debug)]
pub struct DocumentSession<D: DocumentDriver> {
    driver: D,
    active: Option<String>,
}

impl<D: DocumentDriver> DocumentSession<D> {
    /// Creates a session over a built driver, with no collection selected.
    pub fn new(driver: D) -> Self {
        Self { driver, active: None }
    }

    /// Returns the name of the active collection, if one is selected.
    pub fn active_collection(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Lists the names of all non-system collections in the database.
    pub async fn list_collections(&self) -> MantleResult<Vec<String>> {
        self.driver.list_collections().await
    }

    /// Selects the collection all subsequent operations target, replacing
    /// any previous selection, and returns a handle to it for convenience.
    ///
    /// The collection need not exist yet; document stores create it on
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns [`MantleError::InvalidArgument`] for an empty name.
    pub fn select_collection(&mut self, name: &str) -> MantleResult<CollectionHandle<'_, D>> {
        if name.is_empty() {
            return Err(MantleError::InvalidArgument(
                "collection name must not be empty".to_string(),
            ));
        }

        debug!(collection = %name, "select active collection");
        self.active = Some(name.to_string());

        Ok(CollectionHandle::new(name.to_string(), &self.driver))
    }

    /// Returns a handle to a named collection without touching the active
    /// slot.
    ///
    /// # Errors
    ///
    /// Returns [`MantleError::InvalidArgument`] for an empty name.
    pub fn collection(&self, name: &str) -> MantleResult<CollectionHandle<'_, D>> {
        if name.is_empty() {
            return Err(MantleError::InvalidArgument(
                "collection name must not be empty".to_string(),
            ));
        }

        Ok(CollectionHandle::new(name.to_string(), &self.driver))
    }

    fn active(&self) -> MantleResult<CollectionHandle<'_, D>> {
        match &self.active {
            Some(name) => Ok(CollectionHandle::new(name.clone(), &self.driver)),
            None => Err(MantleError::NotConfigured),
        }
    }

    /// Inserts one document into the active collection and returns its
    /// identifier.
    pub async fn create(&self, document: Document) -> MantleResult<ObjectId> {
        self.active()?.create(document).await
    }

    /// Inserts a batch of documents into the active collection, returning
    /// their identifiers in input order.
    pub async fn create_bulk(&self, documents: Vec<Document>) -> MantleResult<Vec<ObjectId>> {
        self.active()?.create_bulk(documents).await
    }

    /// Returns the first document in the active collection matching all
    /// filter fields by equality, or `None` when nothing matches.
    pub async fn get(&self, filter: FilterSet) -> MantleResult<Option<Document>> {
        self.active()?.get(filter).await
    }

    /// Looks up one document in the active collection by identifier.
    pub async fn get_by_id<I: IntoDocumentId>(&self, id: I) -> MantleResult<Option<Document>> {
        self.active()?.get_by_id(id).await
    }

    /// Returns all matching documents from the active collection, fully
    /// materialized, up to `limit` when one is given.
    pub async fn filter(
        &self,
        filter: FilterSet,
        limit: Option<usize>,
    ) -> MantleResult<Vec<Document>> {
        self.active()?.filter(filter, limit).await
    }

    /// Returns matching documents from the active collection as a finite,
    /// single-pass stream.
    pub async fn filter_stream(
        &self,
        filter: FilterSet,
        limit: Option<usize>,
    ) -> MantleResult<DocumentStream> {
        self.active()?.filter_stream(filter, limit).await
    }

    /// Counts matching documents in the active collection.
    ///
    /// Counting is read-only; the store is never modified.
    pub async fn count(&self, filter: FilterSet) -> MantleResult<u64> {
        self.active()?.count(filter).await
    }

    /// Applies a partial update to the first matching document in the
    /// active collection and returns its post-update state.
    pub async fn update(
        &self,
        filter: FilterSet,
        alter: AlterSet,
    ) -> MantleResult<Option<Document>> {
        self.active()?.update(filter, alter).await
    }

    /// Applies a partial update to the document with the given identifier,
    /// returning its post-update state.
    pub async fn update_by_id<I: IntoDocumentId>(
        &self,
        id: I,
        alter: AlterSet,
    ) -> MantleResult<Option<Document>> {
        self.active()?.update_by_id(id, alter).await
    }

    /// Applies a partial update to every matching document in the active
    /// collection, returning the count actually modified.
    pub async fn update_bulk(&self, filter: FilterSet, alter: AlterSet) -> MantleResult<u64> {
        self.active()?.update_bulk(filter, alter).await
    }

    /// Deletes every matching document from the active collection,
    /// returning the count deleted.
    pub async fn delete(&self, filter: FilterSet) -> MantleResult<u64> {
        self.active()?.delete(filter).await
    }

    /// Deletes all documents in the active collection.
    ///
    /// Fixture capability for test setups, not part of the public contract.
    #[doc(hidden)]
    pub async fn clear_collection(&self) -> MantleResult<u64> {
        self.active()?.clear().await
    }

    /// Shuts down the session, releasing the driver and its connections.
    pub async fn shutdown(self) -> MantleResult<()> {
        self.driver.shutdown().await?;

        Ok(())
    }
}
