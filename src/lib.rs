//! Export MongoDB collection and index definitions as a replayable
//! mongosh script.
//!
//! The pipeline is a single synchronous pass: enumerate databases (minus
//! the system ones), read each collection's creation options and index
//! metadata verbatim, then render two blocks of `createCollection` /
//! `createIndex` statements that recreate the schema on a target cluster.

pub mod catalog;
pub mod connection;
pub mod error;
pub mod script;

pub use catalog::{CatalogSource, CollectionDescriptor, IndexDescriptor};
pub use connection::{ConnectionManager, MongoCatalog};
pub use error::{Error, Result};
