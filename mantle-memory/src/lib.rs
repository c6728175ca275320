//! In-memory driver adapter for mantle.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `DocumentDriver` trait. It uses an async-aware read-write lock for
//! concurrent access and is intended for development and as the fixture
//! backend for tests: the facade is fully exercisable against it without a
//! running database server.
//!
//! # Quick Start
//!
//! ```ignore
//! use bson::doc;
//! use mantle_core::session::DocumentSession;
//! use mantle_memory::MemoryDriver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = DocumentSession::new(MemoryDriver::new());
//!     session.select_collection("superheroes")?;
//!
//!     let id = session.create(doc! { "nickname": "Batman" }).await?;
//!     assert!(session.get_by_id(id).await?.is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mantle_memory;

pub mod matcher;
pub mod store;

pub use store::{MemoryDriver, MemoryDriverBuilder};
