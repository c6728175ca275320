//! Filter and alter sets for selecting and updating documents.
//!
//! The facade's matching contract is equality only: a [`FilterSet`] maps
//! field names to expected values, and a document matches when every listed
//! field equals its value (logical AND). Richer operators a backend may
//! understand pass through untouched inside the underlying document, but
//! they are not part of this contract.
//!
//! An [`AlterSet`] is the write-side counterpart: a field-to-new-value
//! mapping applied as a partial update. Listed fields are replaced, other
//! fields are left alone; a full-document replace never happens.
//!
//! Both types build fluently or convert from [`bson::Document`], so the
//! `doc!` macro works directly:
//!
//! ```ignore
//! use bson::doc;
//! use mantle_core::query::{AlterSet, FilterSet};
//!
//! let filter = FilterSet::new().field("nickname", "Batman");
//! let filter = FilterSet::from(doc! { "nickname": "Batman" });
//! let alter = AlterSet::new().field("occupation", "Supervillain");
//! ```

use bson::oid::ObjectId;
use bson::{Bson, Document};

/// An equality-match predicate over document fields.
///
/// An empty filter matches every document in the collection.
#[derive(Debug, Clone, Default)]
pub struct FilterSet(Document);

impl FilterSet {
    /// Creates an empty filter, matching all documents.
    pub fn new() -> Self {
        Self(Document::new())
    }

    /// Creates a filter matching the document with the given identifier.
    pub fn by_id(id: ObjectId) -> Self {
        Self::new().field("_id", id)
    }

    /// Adds an equality condition on a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns `true` if this filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the underlying condition document.
    pub fn as_document(&self) -> &Document {
        &self.0
    }

    /// Consumes the filter, yielding the underlying condition document.
    pub fn into_document(self) -> Document {
        self.0
    }
}

impl From<Document> for FilterSet {
    fn from(document: Document) -> Self {
        Self(document)
    }
}

/// A partial update: field names mapped to their replacement values.
#[derive(Debug, Clone, Default)]
pub struct AlterSet(Document);

impl AlterSet {
    /// Creates an empty alteration.
    pub fn new() -> Self {
        Self(Document::new())
    }

    /// Sets a field to a new value.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns `true` if this alteration sets no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if this alteration would touch the identifier field.
    ///
    /// The identifier is immutable after insert; the facade rejects such
    /// alterations before they reach a driver.
    pub fn touches_id(&self) -> bool {
        self.0.contains_key("_id")
    }

    /// Borrows the underlying replacement document.
    pub fn as_document(&self) -> &Document {
        &self.0
    }

    /// Consumes the alteration, yielding the underlying replacement document.
    pub fn into_document(self) -> Document {
        self.0
    }
}

impl From<Document> for AlterSet {
    fn from(document: Document) -> Self {
        Self(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn filter_builds_fluently() {
        let filter = FilterSet::new()
            .field("nickname", "Batman")
            .field("year", 1981);

        assert_eq!(
            filter.as_document(),
            &doc! { "nickname": "Batman", "year": 1981 }
        );
    }

    #[test]
    fn filter_by_id_targets_identifier_field() {
        let id = ObjectId::new();
        assert_eq!(FilterSet::by_id(id).as_document(), &doc! { "_id": id });
    }

    #[test]
    fn empty_filter_matches_all() {
        assert!(FilterSet::new().is_empty());
        assert!(FilterSet::from(doc! {}).is_empty());
    }

    #[test]
    fn alter_detects_identifier_touch() {
        assert!(AlterSet::new().field("_id", ObjectId::new()).touches_id());
        assert!(!AlterSet::new().field("nickname", "Robin").touches_id());
    }
}
