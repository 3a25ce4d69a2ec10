//! Core ConnectionManager struct and the raw catalog read commands.

use std::time::Duration;

use futures::TryStreamExt;
use mongodb::Client;
use mongodb::bson::{Document, doc};
use tokio::runtime::Runtime;

use crate::catalog::CatalogSource;
use crate::error::{Error, Result};

/// Owns the Tokio runtime the async driver runs on; every public method
/// is a synchronous wrapper that blocks on it.
pub struct ConnectionManager {
    runtime: Runtime,
}

impl ConnectionManager {
    pub fn new() -> Result<Self> {
        let runtime = Runtime::new()?;
        Ok(Self { runtime })
    }

    /// Connect and verify the server answers a ping, giving up after
    /// `timeout` (runs in Tokio runtime).
    pub fn connect(&self, uri: &str, timeout: Duration) -> Result<Client> {
        let uri = uri.to_string();
        self.runtime.block_on(async {
            let fut = async {
                let client = Client::with_uri_str(&uri).await?;
                client.database("admin").run_command(doc! { "ping": 1 }).await?;
                Ok::<Client, mongodb::error::Error>(client)
            };

            match tokio::time::timeout(timeout, fut).await {
                Ok(result) => result.map_err(Error::Connection),
                Err(_) => Err(Error::Timeout(format!(
                    "no reply from server after {}s",
                    timeout.as_secs()
                ))),
            }
        })
    }

    /// List database names in server enumeration order (runs in Tokio
    /// runtime). The order is kept as-is so a re-run against an unchanged
    /// cluster produces identical output.
    pub fn list_database_names(&self, client: &Client) -> Result<Vec<String>> {
        let client = client.clone();
        self.runtime
            .block_on(async { client.list_database_names().await.map_err(Error::Connection) })
    }

    /// Raw `listCollections` entries for a database (runs in Tokio runtime).
    ///
    /// Goes through a raw cursor command instead of the driver's typed
    /// `CollectionSpecification`, which would drop creation options it does
    /// not recognize; the export must pass them through verbatim.
    pub fn list_collection_infos(
        &self,
        client: &Client,
        database: &str,
    ) -> Result<Vec<Document>> {
        let client = client.clone();
        let database = database.to_string();

        self.runtime.block_on(async {
            let db = client.database(&database);
            let read = async {
                let cursor = db.run_cursor_command(doc! { "listCollections": 1 }).await?;
                cursor.try_collect::<Vec<Document>>().await
            };
            read.await.map_err(|source| Error::Catalog { namespace: database.clone(), source })
        })
    }

    /// Raw `listIndexes` entries for a collection (runs in Tokio runtime),
    /// verbatim for the same reason as `list_collection_infos`.
    pub fn list_index_docs(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
    ) -> Result<Vec<Document>> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();

        self.runtime.block_on(async {
            let db = client.database(&database);
            let read = async {
                let cursor = db.run_cursor_command(doc! { "listIndexes": &collection }).await?;
                cursor.try_collect::<Vec<Document>>().await
            };
            read.await.map_err(|source| Error::Catalog {
                namespace: format!("{database}.{collection}"),
                source,
            })
        })
    }
}

/// A live cluster viewed through the three catalog reads.
///
/// Borrows the manager and client; it never closes or reconfigures the
/// connection it is handed.
pub struct MongoCatalog<'a> {
    manager: &'a ConnectionManager,
    client: &'a Client,
}

impl<'a> MongoCatalog<'a> {
    pub fn new(manager: &'a ConnectionManager, client: &'a Client) -> Self {
        Self { manager, client }
    }
}

impl CatalogSource for MongoCatalog<'_> {
    fn database_names(&self) -> Result<Vec<String>> {
        self.manager.list_database_names(self.client)
    }

    fn collection_infos(&self, database: &str) -> Result<Vec<Document>> {
        self.manager.list_collection_infos(self.client, database)
    }

    fn index_docs(&self, database: &str, collection: &str) -> Result<Vec<Document>> {
        self.manager.list_index_docs(self.client, database, collection)
    }
}
