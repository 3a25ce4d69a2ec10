//! Render catalog descriptors into a replayable mongosh script.
//!
//! Output is two blocks separated by a blank line-free single newline:
//! every `createCollection` statement first, then every `createIndex`
//! statement grouped per collection, both in discovery order. Rendering
//! builds the whole string before anything is written, so a serialization
//! failure never leaves partial output behind.

use mongodb::bson::{Bson, Document};

use crate::catalog::{CollectionDescriptor, IndexDescriptor};
use crate::error::Result;

/// Render the full script for a list of collection descriptors.
pub fn render(collections: &[CollectionDescriptor]) -> Result<String> {
    let mut creates = Vec::with_capacity(collections.len());
    let mut indexes = Vec::new();

    for collection in collections {
        creates.push(create_collection_stmt(collection)?);
        for index in &collection.indexes {
            indexes.push(create_index_stmt(collection, index)?);
        }
    }

    Ok(format!("{}\n{}", creates.join("\n"), indexes.join("\n")))
}

fn create_collection_stmt(collection: &CollectionDescriptor) -> Result<String> {
    Ok(format!(
        "db.getSiblingDB('{}').createCollection('{}', {})",
        collection.database,
        collection.name,
        json(&collection.options)?
    ))
}

fn create_index_stmt(collection: &CollectionDescriptor, index: &IndexDescriptor) -> Result<String> {
    let mut stmt = format!(
        "db.getSiblingDB('{}').getCollection('{}').createIndex({}",
        collection.database,
        collection.name,
        json(&index.key)?
    );
    if let Some(options) = &index.options {
        stmt.push_str(", ");
        stmt.push_str(&json(options)?);
    }
    stmt.push_str(");");
    Ok(stmt)
}

/// Relaxed extended JSON with field order exactly as the catalog gave it.
fn json(doc: &Document) -> Result<String> {
    let value = Bson::Document(doc.clone()).into_relaxed_extjson();
    Ok(serde_json::to_string(&value)?)
}
