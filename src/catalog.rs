//! Catalog enumeration: walk databases, collections, and indexes into
//! descriptors ready for script rendering.
//!
//! The walk is all-or-nothing: any read failure propagates immediately and
//! no partial result is returned. Server enumeration order is preserved
//! throughout; nothing is sorted or deduplicated.

use mongodb::bson::Document;

use crate::error::Result;

/// Administrative databases that are never exported.
pub const SYSTEM_DATABASES: [&str; 3] = ["admin", "local", "config"];

/// Index metadata fields considered structural, never part of user-visible
/// options: the format version marker, the key spec and index name (captured
/// separately on the descriptor), and the fully-qualified namespace. Any new
/// catalog field passes through as an option unless deliberately added here.
pub const STRUCTURAL_INDEX_FIELDS: [&str; 4] = ["v", "key", "name", "ns"];

/// Read capability over a cluster catalog.
///
/// The three methods mirror the server's `listDatabases` / `listCollections`
/// / `listIndexes` commands. Implemented by [`crate::MongoCatalog`] for a
/// live cluster and by in-memory fakes in tests.
pub trait CatalogSource {
    fn database_names(&self) -> Result<Vec<String>>;

    /// Raw `listCollections` entries for a database, in server order.
    fn collection_infos(&self, database: &str) -> Result<Vec<Document>>;

    /// Raw `listIndexes` entries for a collection, in server order.
    fn index_docs(&self, database: &str, collection: &str) -> Result<Vec<Document>>;
}

/// One collection with its creation options and indexes.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionDescriptor {
    pub database: String,
    pub name: String,
    /// Creation options exactly as the catalog reported them, never
    /// interpreted here (validators, capped settings, view definitions...).
    pub options: Document,
    pub indexes: Vec<IndexDescriptor>,
}

/// One index: its key spec plus whatever non-structural options it carries.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexDescriptor {
    /// Ordered field-to-direction spec; order defines compound-index layout.
    pub key: Document,
    pub name: String,
    /// Remaining metadata after stripping [`STRUCTURAL_INDEX_FIELDS`];
    /// `None` (not an empty document) when nothing remains.
    pub options: Option<Document>,
}

/// Whether a database's contents belong in the export.
pub fn should_export(database: &str) -> bool {
    !SYSTEM_DATABASES.contains(&database)
}

/// Walk the whole catalog into descriptors.
pub fn export(source: &impl CatalogSource) -> Result<Vec<CollectionDescriptor>> {
    let mut collections = Vec::new();
    for database in source.database_names()? {
        if !should_export(&database) {
            log::debug!("skipping system database '{database}'");
            continue;
        }
        collections.extend(describe_collections(source, &database)?);
    }
    Ok(collections)
}

/// Describe every collection of one database, indexes included.
pub fn describe_collections(
    source: &impl CatalogSource,
    database: &str,
) -> Result<Vec<CollectionDescriptor>> {
    let infos = source.collection_infos(database)?;
    log::info!("{database}: {} collections", infos.len());

    let mut described = Vec::with_capacity(infos.len());
    for info in infos {
        let name = info.get_str("name").unwrap_or_default().to_string();
        let options = info.get_document("options").cloned().unwrap_or_default();
        let indexes = describe_indexes(source, database, &name)?;
        described.push(CollectionDescriptor {
            database: database.to_string(),
            name,
            options,
            indexes,
        });
    }
    Ok(described)
}

/// Turn raw `listIndexes` records into descriptors, stripping the
/// structural fields from the options.
pub fn describe_indexes(
    source: &impl CatalogSource,
    database: &str,
    collection: &str,
) -> Result<Vec<IndexDescriptor>> {
    let records = source.index_docs(database, collection)?;
    log::debug!("{database}.{collection}: {} indexes", records.len());

    let mut indexes = Vec::with_capacity(records.len());
    for record in records {
        let key = record.get_document("key").cloned().unwrap_or_default();
        let name = record.get_str("name").unwrap_or_default().to_string();
        let options: Document = record
            .into_iter()
            .filter(|(field, _)| !STRUCTURAL_INDEX_FIELDS.contains(&field.as_str()))
            .collect();
        indexes.push(IndexDescriptor {
            key,
            name,
            options: (!options.is_empty()).then_some(options),
        });
    }
    Ok(indexes)
}
