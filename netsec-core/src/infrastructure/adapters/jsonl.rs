// netsec-core/src/infrastructure/adapters/jsonl.rs
//
// Directory-backed document store: `<root>/<database>/<collection>.jsonl`,
// one JSON object per line. Used for demos and tests where no MongoDB server
// is around.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::infrastructure::error::InfrastructureError;
use crate::ports::{Document, DocumentStore};

pub const COLLECTION_EXTENSION: &str = "jsonl";

pub struct JsonLinesStore {
    root: PathBuf,
}

impl JsonLinesStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, database: &str, collection: &str) -> PathBuf {
        self.root
            .join(database)
            .join(format!("{collection}.{COLLECTION_EXTENSION}"))
    }
}

#[async_trait]
impl DocumentStore for JsonLinesStore {
    #[instrument(skip(self), fields(root = ?self.root))]
    async fn fetch_all(
        &self,
        database: &str,
        collection: &str,
    ) -> Result<Vec<Document>, InfrastructureError> {
        let db_dir = self.root.join(database);
        if !tokio::fs::try_exists(&db_dir).await? {
            return Err(InfrastructureError::StoreUnavailable(format!(
                "database directory {:?} does not exist",
                db_dir
            )));
        }

        // Like MongoDB, an absent collection reads as empty.
        let path = self.collection_path(database, collection);
        if !tokio::fs::try_exists(&path).await? {
            debug!(path = ?path, "Collection file absent, treating as empty");
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let mut documents = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line)? {
                Value::Object(map) => documents.push(map),
                _ => {
                    return Err(InfrastructureError::Io(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("{}:{}: expected a JSON object", path.display(), index + 1),
                    )));
                }
            }
        }
        Ok(documents)
    }

    fn store_name(&self) -> &str {
        "jsonl"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_one_document_per_line() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("KRISHAI"))?;
        fs::write(
            dir.path().join("KRISHAI/NetworkData.jsonl"),
            "{\"b\": 1, \"a\": \"na\"}\n\n{\"b\": -1, \"a\": 0}\n",
        )?;

        let store = JsonLinesStore::new(dir.path());
        let docs = store.fetch_all("KRISHAI", "NetworkData").await?;
        assert_eq!(docs.len(), 2);
        // Field order is kept as written.
        assert_eq!(docs[0].keys().collect::<Vec<_>>(), vec!["b", "a"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_database_is_unavailable() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonLinesStore::new(dir.path().join("nope"));
        let res = store.fetch_all("KRISHAI", "NetworkData").await;
        assert!(matches!(res, Err(InfrastructureError::StoreUnavailable(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("KRISHAI"))?;
        let store = JsonLinesStore::new(dir.path());
        assert!(store.fetch_all("KRISHAI", "Other").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_non_object_line_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("db"))?;
        fs::write(dir.path().join("db/c.jsonl"), "[1, 2]\n")?;
        let store = JsonLinesStore::new(dir.path());
        assert!(store.fetch_all("db", "c").await.is_err());
        Ok(())
    }
}
