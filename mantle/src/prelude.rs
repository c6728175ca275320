//! Convenient re-exports of commonly used types from mantle.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use mantle::prelude::*;
//! ```

pub use mantle_core::{
    collection::CollectionHandle,
    document::{document_from_json, document_id, document_into, document_to_json, IntoDocumentId},
    driver::{DocumentDriver, DocumentStream, DriverBuilder},
    error::{MantleError, MantleResult},
    query::{AlterSet, FilterSet},
    session::DocumentSession,
};
