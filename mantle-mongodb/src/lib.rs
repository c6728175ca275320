//! MongoDB driver adapter for mantle.
//!
//! This crate implements the `DocumentDriver` trait on top of the official
//! asynchronous MongoDB client, mapping the facade's normalized operations
//! onto the corresponding collection commands. Connection pooling, wire
//! protocol, query execution, and indexing all stay inside the client; this
//! adapter only translates arguments and errors.
//!
//! To use this adapter through the umbrella crate, enable the `mongodb`
//! feature:
//!
//! ```toml
//! [dependencies]
//! mantle = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The builder consumes a [`ConnectionConfig`] (host defaulting to
//! `localhost`, port to `27017`) or a raw connection string. Building
//! parses the endpoint but does not round-trip to the server; an
//! unreachable deployment surfaces on the first operation, matching the
//! client's own laziness.
//!
//! # Example
//!
//! ```ignore
//! use mantle_core::{driver::DriverBuilder, session::DocumentSession};
//! use mantle_mongodb::{ConnectionConfig, MongoDriver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let driver = MongoDriver::builder(ConnectionConfig::new("heroics"))
//!         .build()
//!         .await?;
//!     let mut session = DocumentSession::new(driver);
//!     session.select_collection("superheroes")?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mantle_mongodb;

pub mod config;
pub mod store;

pub use config::ConnectionConfig;
pub use store::{MongoDriver, MongoDriverBuilder};
