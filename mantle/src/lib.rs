//! Main mantle crate: a thin collection-access facade over document databases.
//!
//! This crate is the primary entry point for users of the mantle project.
//! It re-exports the core facade types and provides access to the bundled
//! driver adapters.
//!
//! # Features
//!
//! - **One active collection** - Select a collection once, then issue CRUD,
//!   filter, and count operations against it
//! - **Per-collection handles** - Work with several collections at once
//!   without re-selecting a shared slot
//! - **Interchangeable backends** - In-memory and MongoDB adapters behind
//!   one driver trait
//! - **Closed error taxonomy** - Discriminated error kinds callers branch
//!   on, with "no match" reported as `None` rather than an error
//!
//! # Quick Start
//!
//! ```ignore
//! use bson::doc;
//! use mantle::{memory::MemoryDriver, prelude::*};
//!
//! #[tokio::main]
//! async fn main() -> MantleResult<()> {
//!     let mut session = DocumentSession::new(MemoryDriver::new());
//!     session.select_collection("superheroes")?;
//!
//!     let id = session.create(doc! { "nickname": "Batman" }).await?;
//!
//!     let batman = session
//!         .get(FilterSet::new().field("nickname", "Batman"))
//!         .await?
//!         .expect("just inserted");
//!     assert_eq!(batman.get_object_id("_id").unwrap(), id);
//!
//!     session
//!         .update_by_id(id, AlterSet::new().field("occupation", "Supervillain"))
//!         .await?;
//!
//!     session.shutdown().await
//! }
//! ```
//!
//! # Against a live deployment
//!
//! The MongoDB adapter is available behind the `mongodb` feature:
//!
//! ```ignore
//! use mantle::{mongodb::{ConnectionConfig, MongoDriver}, prelude::*};
//!
//! let driver = MongoDriver::builder(ConnectionConfig::new("heroics"))
//!     .build()
//!     .await?;
//! let mut session = DocumentSession::new(driver);
//! ```
//!
//! # Filtering
//!
//! Matching is equality over the listed fields. Two result forms exist:
//! [`DocumentSession::filter`](session::DocumentSession::filter) fully
//! materializes matches into a vector, while
//! [`DocumentSession::filter_stream`](session::DocumentSession::filter_stream)
//! hands back the finite, single-pass stream for callers that prefer
//! streaming. Counting goes through
//! [`DocumentSession::count`](session::DocumentSession::count), which never
//! materializes or mutates anything.
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - MongoDB adapter (requires the `mongodb` feature)

pub mod prelude;

pub use mantle_core::{collection, document, driver, error, query, session};

// Re-export BSON types for convenience
pub use bson;

/// In-memory driver adapter.
pub mod memory {
    pub use mantle_memory::{MemoryDriver, MemoryDriverBuilder};
}

/// MongoDB driver adapter.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use mantle_mongodb::{ConnectionConfig, MongoDriver, MongoDriverBuilder};
}
