//! In-memory driver implementation.
//!
//! Documents are stored as BSON values in nested HashMaps behind an
//! async-aware read-write lock. Queries scan the whole collection; there is
//! no indexing. Missing collections behave as empty ones for reads,
//! updates, and deletes, and are created implicitly on first write, per
//! document-store semantics.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use futures::stream;
use futures::StreamExt;
use mea::rwlock::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use mantle_core::driver::{DocumentDriver, DocumentStream, DriverBuilder};
use mantle_core::error::{MantleError, MantleResult};
use mantle_core::query::{AlterSet, FilterSet};

use crate::matcher::matches;

type CollectionMap = HashMap<String, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document store.
///
/// `MemoryDriver` is cloneable and `Arc`-shares its internal state, so
/// clones of the same instance view the same data. Documents are keyed by
/// the hex form of their `_id`.
#[derive(Default, Clone, Debug)]
pub struct MemoryDriver {
    store: Arc<RwLock<StoreMap>>,
}

impl MemoryDriver {
    /// Creates a new empty in-memory driver.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing a `MemoryDriver`.
    pub fn builder() -> MemoryDriverBuilder {
        MemoryDriverBuilder::default()
    }
}

/// Ensures the document carries an ObjectId `_id`, assigning one when
/// absent, and returns it alongside the storable document.
fn identify(mut document: Document) -> MantleResult<(ObjectId, Document)> {
    let id = match document.get("_id") {
        Some(Bson::ObjectId(id)) => *id,
        Some(other) => {
            return Err(MantleError::Serialization(format!(
                "unsupported _id value: {other}"
            )));
        }
        None => {
            let id = ObjectId::new();
            document.insert("_id", id);
            id
        }
    };

    Ok((id, document))
}

fn insert_into(collection_map: &mut CollectionMap, document: Document) -> MantleResult<ObjectId> {
    let (id, document) = identify(document)?;
    let key = id.to_hex();

    if collection_map.contains_key(&key) {
        return Err(MantleError::Backend(format!(
            "duplicate document identifier: {id}"
        )));
    }

    collection_map.insert(key, document);

    Ok(id)
}

fn apply_alter(document: &mut Document, alter: &Document) -> bool {
    let mut changed = false;

    for (field, value) in alter {
        if document.get(field) != Some(value) {
            document.insert(field.clone(), value.clone());
            changed = true;
        }
    }

    changed
}

#[async_trait]
impl DocumentDriver for MemoryDriver {
    async fn list_collections(&self) -> MantleResult<Vec<String>> {
        Ok(self
            .store
            .read()
            .await
            .keys()
            .cloned()
            .collect())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> MantleResult<ObjectId> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        insert_into(collection_map, document)
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> MantleResult<Vec<ObjectId>> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        // Ordered batch: documents inserted before a failure stay in place,
        // and their identifiers travel with the error.
        let mut inserted = Vec::with_capacity(documents.len());

        for document in documents {
            match insert_into(collection_map, document) {
                Ok(id) => inserted.push(id),
                Err(err) => {
                    return Err(MantleError::BulkWrite {
                        inserted,
                        message: err.to_string(),
                    });
                }
            }
        }

        Ok(inserted)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: FilterSet,
    ) -> MantleResult<Option<Document>> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(None);
        };

        Ok(collection_map
            .values()
            .find(|doc| matches(doc, filter.as_document()))
            .cloned())
    }

    async fn find(
        &self,
        collection: &str,
        filter: FilterSet,
        limit: Option<usize>,
    ) -> MantleResult<DocumentStream> {
        let store = self.store.read().await;
        let documents = match store.get(collection) {
            Some(collection_map) => collection_map
                .values()
                .filter(|doc| matches(doc, filter.as_document()))
                .take(limit.unwrap_or(usize::MAX))
                .cloned()
                .collect::<Vec<_>>(),
            None => Vec::new(),
        };

        Ok(stream::iter(documents.into_iter().map(Ok)).boxed())
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: FilterSet,
        alter: AlterSet,
    ) -> MantleResult<Option<Document>> {
        let mut store = self.store.write().await;
        let Some(collection_map) = store.get_mut(collection) else {
            return Ok(None);
        };

        let Some(document) = collection_map
            .values_mut()
            .find(|doc| matches(doc, filter.as_document()))
        else {
            return Ok(None);
        };

        apply_alter(document, alter.as_document());

        Ok(Some(document.clone()))
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: FilterSet,
        alter: AlterSet,
    ) -> MantleResult<u64> {
        let mut store = self.store.write().await;
        let Some(collection_map) = store.get_mut(collection) else {
            return Ok(0);
        };

        let mut modified = 0;

        for document in collection_map
            .values_mut()
            .filter(|doc| matches(doc, filter.as_document()))
        {
            if apply_alter(document, alter.as_document()) {
                modified += 1;
            }
        }

        Ok(modified)
    }

    async fn delete_many(&self, collection: &str, filter: FilterSet) -> MantleResult<u64> {
        let mut store = self.store.write().await;
        let Some(collection_map) = store.get_mut(collection) else {
            return Ok(0);
        };

        let before = collection_map.len();
        collection_map.retain(|_, doc| !matches(doc, filter.as_document()));
        let deleted = (before - collection_map.len()) as u64;

        debug!(collection = %collection, deleted, "deleted documents");

        Ok(deleted)
    }

    async fn count_documents(&self, collection: &str, filter: FilterSet) -> MantleResult<u64> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(0);
        };

        Ok(collection_map
            .values()
            .filter(|doc| matches(doc, filter.as_document()))
            .count() as u64)
    }
}

/// Builder for constructing [`MemoryDriver`] instances.
#[derive(Default)]
pub struct MemoryDriverBuilder;

#[async_trait]
impl DriverBuilder for MemoryDriverBuilder {
    type Driver = MemoryDriver;

    /// Builds a fresh, empty driver. This always succeeds.
    async fn build(self) -> MantleResult<Self::Driver> {
        Ok(MemoryDriver::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use futures::TryStreamExt;

    fn filter(document: Document) -> FilterSet {
        FilterSet::from(document)
    }

    fn alter(document: Document) -> AlterSet {
        AlterSet::from(document)
    }

    #[tokio::test]
    async fn insert_assigns_identifier_when_absent() {
        let driver = MemoryDriver::new();

        let id = driver
            .insert_one("heroes", doc! { "nickname": "Batman" })
            .await
            .unwrap();

        let found = driver
            .find_one("heroes", filter(doc! { "_id": id }))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_str("nickname").unwrap(), "Batman");
        assert_eq!(found.get_object_id("_id").unwrap(), id);
    }

    #[tokio::test]
    async fn insert_keeps_supplied_identifier() {
        let driver = MemoryDriver::new();
        let id = ObjectId::new();

        let returned = driver
            .insert_one("heroes", doc! { "_id": id, "nickname": "Robin" })
            .await
            .unwrap();

        assert_eq!(returned, id);
    }

    #[tokio::test]
    async fn duplicate_identifier_rejected() {
        let driver = MemoryDriver::new();
        let id = ObjectId::new();

        driver
            .insert_one("heroes", doc! { "_id": id })
            .await
            .unwrap();
        let err = driver
            .insert_one("heroes", doc! { "_id": id })
            .await
            .unwrap_err();

        assert!(matches!(err, MantleError::Backend(_)));
    }

    #[tokio::test]
    async fn partial_batch_failure_reports_inserted_ids() {
        let driver = MemoryDriver::new();
        let clash = ObjectId::new();

        let err = driver
            .insert_many(
                "heroes",
                vec![
                    doc! { "nickname": "Superman" },
                    doc! { "_id": clash, "nickname": "Aquaman" },
                    doc! { "_id": clash, "nickname": "Flash" },
                ],
            )
            .await
            .unwrap_err();

        match err {
            MantleError::BulkWrite { inserted, .. } => assert_eq!(inserted.len(), 2),
            other => panic!("expected BulkWrite, got {other:?}"),
        }

        // The two documents before the clash stayed in place.
        let count = driver
            .count_documents("heroes", FilterSet::new())
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn find_applies_filter_and_limit() {
        let driver = MemoryDriver::new();
        for n in 0..5 {
            driver
                .insert_one("items", doc! { "kind": "widget", "n": n })
                .await
                .unwrap();
        }
        driver
            .insert_one("items", doc! { "kind": "gadget" })
            .await
            .unwrap();

        let widgets: Vec<Document> = driver
            .find("items", filter(doc! { "kind": "widget" }), None)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(widgets.len(), 5);

        let limited: Vec<Document> = driver
            .find("items", filter(doc! { "kind": "widget" }), Some(2))
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn find_one_and_update_returns_post_update_state() {
        let driver = MemoryDriver::new();
        driver
            .insert_one("heroes", doc! { "nickname": "Batman", "city": "Gotham" })
            .await
            .unwrap();

        let updated = driver
            .find_one_and_update(
                "heroes",
                filter(doc! { "nickname": "Batman" }),
                alter(doc! { "occupation": "Supervillain" }),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.get_str("occupation").unwrap(), "Supervillain");
        assert_eq!(updated.get_str("city").unwrap(), "Gotham");
    }

    #[tokio::test]
    async fn update_many_counts_modified_not_matched() {
        let driver = MemoryDriver::new();
        driver
            .insert_one("heroes", doc! { "team": "league", "status": "active" })
            .await
            .unwrap();
        driver
            .insert_one("heroes", doc! { "team": "league", "status": "retired" })
            .await
            .unwrap();

        let modified = driver
            .update_many(
                "heroes",
                filter(doc! { "team": "league" }),
                alter(doc! { "status": "active" }),
            )
            .await
            .unwrap();

        // Both matched; only the retired one changed.
        assert_eq!(modified, 1);
    }

    #[tokio::test]
    async fn delete_many_reports_count() {
        let driver = MemoryDriver::new();
        for _ in 0..3 {
            driver
                .insert_one("items", doc! { "kind": "widget" })
                .await
                .unwrap();
        }

        let deleted = driver
            .delete_many("items", filter(doc! { "kind": "widget" }))
            .await
            .unwrap();
        assert_eq!(deleted, 3);

        let remaining = driver
            .count_documents("items", FilterSet::new())
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn missing_collection_behaves_as_empty() {
        let driver = MemoryDriver::new();

        assert!(driver
            .find_one("nowhere", FilterSet::new())
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            driver
                .count_documents("nowhere", FilterSet::new())
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            driver
                .delete_many("nowhere", FilterSet::new())
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn list_collections_names_created_ones() {
        let driver = MemoryDriver::new();
        driver
            .insert_one("heroes", doc! { "nickname": "Batman" })
            .await
            .unwrap();
        driver
            .insert_one("villains", doc! { "nickname": "Joker" })
            .await
            .unwrap();

        let mut names = driver.list_collections().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["heroes", "villains"]);
    }
}
