//! A thin collection-access facade over document databases.
//!
//! This crate is the core of the mantle project and provides:
//!
//! - **Error handling** ([`error`]) - The closed error taxonomy and result type
//! - **Document utilities** ([`document`]) - Identifier normalization and JSON conversion
//! - **Filter and alter sets** ([`query`]) - Equality-match filters and partial updates
//! - **Driver abstraction** ([`driver`]) - The trait document-store adapters implement
//! - **Collection handles** ([`collection`]) - Operations bound to one named collection
//! - **Sessions** ([`session`]) - The stateful facade tracking an active collection
//!
//! # Example
//!
//! ```ignore
//! use mantle_core::{query::FilterSet, session::DocumentSession};
//! use bson::doc;
//!
//! let mut session = DocumentSession::new(driver);
//! session.select_collection("superheroes")?;
//!
//! let id = session.create(doc! { "nickname": "Batman" }).await?;
//! let hero = session.get_by_id(id).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as mantle_core;

pub mod collection;
pub mod document;
pub mod driver;
pub mod error;
pub mod query;
pub mod session;
