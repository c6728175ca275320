//! Error types and result types for facade operations.
//!
//! This module provides the closed error taxonomy for all facade operations.
//! Use [`MantleResult<T>`] as the return type for fallible operations.
//!
//! "No match" on single-document lookups and updates is deliberately *not*
//! part of this taxonomy: those operations return `Option<Document>`, since
//! an absent document is an expected, frequent outcome that callers branch
//! on rather than an error condition.

use bson::error::Error as BsonError;
use bson::oid::ObjectId;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when operating the facade.
///
/// Every variant is a discriminated kind carrying structured context, so
/// calling code can branch programmatically instead of matching on message
/// strings.
#[derive(Error, Debug)]
pub enum MantleError {
    /// No reachable database connection at the point an operation needed one,
    /// or the connection endpoint could not be parsed.
    #[error("Connection error: {0}")]
    Connection(String),
    /// An operation requiring an active collection was invoked before one was
    /// selected.
    #[error("No active collection selected")]
    NotConfigured,
    /// Malformed input: empty collection name, empty bulk batch, unparsable
    /// identifier, or an alteration touching the identifier field.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A batch insert partially failed. Carries the identifiers of documents
    /// inserted before the failure, when the driver exposes them.
    #[error("Bulk write failed after {} inserted documents: {message}", .inserted.len())]
    BulkWrite {
        /// Identifiers successfully inserted before the batch aborted.
        inserted: Vec<ObjectId>,
        /// The driver's description of the failure.
        message: String,
    },
    /// A document could not be converted to or from the store's wire
    /// representation.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A store-side command failure that fits none of the other kinds
    /// (duplicate key, rejected command), passed through from the driver.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for facade operations.
pub type MantleResult<T> = Result<T, MantleError>;

impl From<BsonError> for MantleError {
    fn from(err: BsonError) -> Self {
        MantleError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for MantleError {
    fn from(err: SerdeJsonError) -> Self {
        MantleError::Serialization(err.to_string())
    }
}
