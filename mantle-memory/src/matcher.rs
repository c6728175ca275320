//! Equality matching for in-memory document filtering.
//!
//! The facade's filter contract is equality over listed fields (logical
//! AND). BSON complicates a naive `==` in one way: the same logical number
//! can arrive as `Int32`, `Int64`, or `Double` depending on how the
//! document was built, so numerics are normalized before comparison.

use bson::datetime::DateTime;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use std::collections::HashMap;

/// Type-erased, comparable representation of BSON values.
///
/// Numeric variants normalize to f64 so `32i32`, `32i64`, and `32.0`
/// compare equal, matching how a document store evaluates equality filters.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value, and any value with no equality semantics
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// Document identifier
    ObjectId(ObjectId),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>(),
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>(),
            ),
            _ => Comparable::Null,
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

/// Returns `true` when every filter field equals the corresponding document
/// field. An empty filter matches every document.
pub(crate) fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(field, expected)| {
        document
            .get(field)
            .is_some_and(|actual| Comparable::from(actual) == Comparable::from(expected))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(matches(&doc! { "a": 1 }, &doc! {}));
        assert!(matches(&doc! {}, &doc! {}));
    }

    #[test]
    fn all_fields_must_match() {
        let document = doc! { "nickname": "Batman", "year": 1981 };

        assert!(matches(&document, &doc! { "nickname": "Batman" }));
        assert!(matches(&document, &doc! { "nickname": "Batman", "year": 1981 }));
        assert!(!matches(&document, &doc! { "nickname": "Batman", "year": 1939 }));
        assert!(!matches(&document, &doc! { "occupation": "Supervillain" }));
    }

    #[test]
    fn numeric_widths_compare_equal() {
        let document = doc! { "year": 1981i64 };

        assert!(matches(&document, &doc! { "year": 1981i32 }));
        assert!(matches(&document, &doc! { "year": 1981.0f64 }));
        assert!(!matches(&document, &doc! { "year": 1982i32 }));
    }

    #[test]
    fn object_ids_compare_by_value() {
        let id = ObjectId::new();
        let document = doc! { "_id": id };

        assert!(matches(&document, &doc! { "_id": id }));
        assert!(!matches(&document, &doc! { "_id": ObjectId::new() }));
    }

    #[test]
    fn missing_field_never_matches() {
        assert!(!matches(&doc! { "a": 1 }, &doc! { "b": Bson::Null }));
    }
}
