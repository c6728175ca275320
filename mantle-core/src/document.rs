//! Document utilities: identifier normalization and JSON conversion.
//!
//! Documents flow through the facade as plain [`bson::Document`] values; the
//! helpers here cover the two conversions the facade contract needs beyond
//! that: turning caller-supplied identifier-like values into the store's
//! canonical [`ObjectId`], and bridging documents to and from
//! [`serde_json::Value`].

use bson::de::deserialize_from_bson;
use bson::oid::ObjectId;
use bson::ser::serialize_to_bson;
use bson::{Bson, Document};
use serde_json::Value;

use crate::error::{MantleError, MantleResult};

/// Conversion trait for normalizing identifier-like values into [`ObjectId`].
///
/// Lookup and update-by-id operations accept anything implementing this
/// trait, so callers can pass an `ObjectId` they already hold or a hex
/// string. String inputs go through a validated parse and fail with
/// [`MantleError::InvalidArgument`] when they are not a well-formed id,
/// rather than reaching the store as a filter that silently matches nothing.
pub trait IntoDocumentId {
    /// Converts this value into a canonical document identifier.
    fn into_document_id(self) -> MantleResult<ObjectId>;
}

impl IntoDocumentId for ObjectId {
    fn into_document_id(self) -> MantleResult<ObjectId> {
        Ok(self)
    }
}

impl IntoDocumentId for &ObjectId {
    fn into_document_id(self) -> MantleResult<ObjectId> {
        Ok(*self)
    }
}

impl IntoDocumentId for &str {
    fn into_document_id(self) -> MantleResult<ObjectId> {
        ObjectId::parse_str(self).map_err(|_| {
            MantleError::InvalidArgument(format!("not a valid document identifier: {self:?}"))
        })
    }
}

impl IntoDocumentId for String {
    fn into_document_id(self) -> MantleResult<ObjectId> {
        self.as_str().into_document_id()
    }
}

impl IntoDocumentId for &String {
    fn into_document_id(self) -> MantleResult<ObjectId> {
        self.as_str().into_document_id()
    }
}

/// Returns the identifier stored in a document's `_id` field, if present.
pub fn document_id(document: &Document) -> Option<ObjectId> {
    match document.get("_id") {
        Some(Bson::ObjectId(id)) => Some(*id),
        _ => None,
    }
}

/// Converts a document to a JSON value.
///
/// # Errors
///
/// Returns [`MantleError::Serialization`] if a field value has no JSON
/// representation.
pub fn document_to_json(document: &Document) -> MantleResult<Value> {
    Ok(serde_json::to_value(document)?)
}

/// Creates a document from a JSON value.
///
/// # Errors
///
/// Returns [`MantleError::Serialization`] if the value is not a JSON object
/// or cannot be encoded as BSON.
pub fn document_from_json(value: Value) -> MantleResult<Document> {
    match serialize_to_bson(&value)? {
        Bson::Document(document) => Ok(document),
        _ => Err(MantleError::Serialization(
            "expected a JSON object at the top level".to_string(),
        )),
    }
}

/// Deserializes a BSON value into any `Deserialize` type.
///
/// Convenience bridge for callers that want typed views of the plain
/// documents the facade returns.
pub fn document_into<T: serde::de::DeserializeOwned>(document: Document) -> MantleResult<T> {
    Ok(deserialize_from_bson(Bson::Document(document))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde_json::json;

    #[test]
    fn object_id_passes_through() {
        let id = ObjectId::new();
        assert_eq!(id.into_document_id().unwrap(), id);
    }

    #[test]
    fn hex_string_parses() {
        let id = ObjectId::new();
        let parsed = id.to_hex().into_document_id().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_string_is_invalid_argument() {
        let err = "not-a-valid-id".into_document_id().unwrap_err();
        assert!(matches!(err, MantleError::InvalidArgument(_)));
    }

    #[test]
    fn json_round_trip() {
        let document = document_from_json(json!({ "nickname": "Batman", "active": true })).unwrap();
        assert_eq!(document.get_str("nickname").unwrap(), "Batman");

        let value = document_to_json(&document).unwrap();
        assert_eq!(value["active"], json!(true));
    }

    #[test]
    fn non_object_json_rejected() {
        let err = document_from_json(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, MantleError::Serialization(_)));
    }

    #[test]
    fn document_id_reads_object_id_only() {
        let id = ObjectId::new();
        assert_eq!(document_id(&doc! { "_id": id }), Some(id));
        assert_eq!(document_id(&doc! { "_id": "plain" }), None);
        assert_eq!(document_id(&doc! {}), None);
    }
}
