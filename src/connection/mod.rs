//! MongoDB connection management and raw catalog reads.

pub mod manager;

pub use manager::{ConnectionManager, MongoCatalog};
