//! Database selection by URI and the process-wide lazy connection.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info};
use url::Url;

use super::{Collection, JsonFileCollection, MemoryCollection, StoreError};
use crate::models::{Apparel, Outfit};

/// The two collections the application reads and writes.
#[derive(Clone)]
pub struct Database {
    pub apparel: Arc<dyn Collection<Apparel>>,
    pub outfits: Arc<dyn Collection<Outfit>>,
}

impl Database {
    pub fn in_memory() -> Self {
        Self {
            apparel: Arc::new(MemoryCollection::<Apparel>::new()),
            outfits: Arc::new(MemoryCollection::<Outfit>::new()),
        }
    }

    /// Open the database named by `uri`: `memory://` or `file:///dir`.
    pub async fn open(uri: &str) -> Result<Self, StoreError> {
        let parsed = Url::parse(uri).map_err(|_| StoreError::UnsupportedUri(uri.to_string()))?;
        match parsed.scheme() {
            "memory" => Ok(Self::in_memory()),
            "file" => {
                let dir = parsed
                    .to_file_path()
                    .map_err(|()| StoreError::UnsupportedUri(uri.to_string()))?;
                Ok(Self {
                    apparel: Arc::new(JsonFileCollection::<Apparel>::open(&dir).await?),
                    outfits: Arc::new(JsonFileCollection::<Outfit>::open(&dir).await?),
                })
            }
            _ => Err(StoreError::UnsupportedUri(uri.to_string())),
        }
    }

    pub async fn flush(&self) -> Result<(), StoreError> {
        self.apparel.flush().await?;
        self.outfits.flush().await
    }
}

/// Process-wide database handle.
///
/// The first caller of `database()` opens the store; every later caller
/// reuses it. A failed open is not cached, so the next request retries.
pub struct Connection {
    uri: String,
    database: OnceCell<Database>,
}

impl Connection {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: OnceCell::new(),
        }
    }

    /// A connection that is already established on `database`.
    pub fn established(database: Database) -> Self {
        Self {
            uri: String::from("memory://"),
            database: OnceCell::new_with(Some(database)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.database.initialized()
    }

    pub async fn database(&self) -> Result<&Database, StoreError> {
        self.database
            .get_or_try_init(|| async {
                match Database::open(&self.uri).await {
                    Ok(database) => {
                        info!(scheme = uri_scheme(&self.uri), "connected to database");
                        Ok(database)
                    }
                    Err(err) => {
                        error!(error = %err, "failed to connect to database");
                        Err(err)
                    }
                }
            })
            .await
    }

    /// Flush buffered writes. Safe to call when never connected.
    pub async fn disconnect(&self) -> Result<(), StoreError> {
        if let Some(database) = self.database.get() {
            database.flush().await?;
            info!("disconnected from database");
        }
        Ok(())
    }
}

fn uri_scheme(uri: &str) -> &str {
    uri.split_once(':').map_or(uri, |(scheme, _)| scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connects_lazily_and_once() {
        let connection = Connection::new("memory://");
        assert!(!connection.is_connected());

        let first = connection.database().await.unwrap() as *const Database;
        let second = connection.database().await.unwrap() as *const Database;
        assert!(connection.is_connected());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unsupported_scheme_is_an_error_and_not_cached() {
        let connection = Connection::new("mongodb://localhost/wardrobe");
        let err = connection.database().await.err().unwrap();
        assert!(matches!(err, StoreError::UnsupportedUri(_)));
        assert!(!connection.is_connected());
    }

    #[tokio::test]
    async fn file_uri_opens_snapshot_directory() {
        let dir = tempfile::tempdir().unwrap();
        let uri = Url::from_directory_path(dir.path()).unwrap().to_string();
        let connection = Connection::new(uri);
        let database = connection.database().await.unwrap();
        assert!(database.apparel.find_all().await.unwrap().is_empty());
        connection.disconnect().await.unwrap();
        assert!(dir.path().join("apparel.json").exists());
        assert!(dir.path().join("outfits.json").exists());
    }

    #[tokio::test]
    async fn disconnect_without_connect_is_a_no_op() {
        Connection::new("memory://").disconnect().await.unwrap();
    }
}
