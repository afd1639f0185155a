// netsec-core/src/application/ingestion.rs

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::application::contract::publish;
use crate::application::error::IngestionError;
use crate::domain::entity::{DataIngestionArtifact, DataIngestionConfig};
use crate::infrastructure::adapters::{DataFrame, connect_store};
use crate::ports::DocumentStore;

/// Opens the store named by the config's connection string. A relative
/// `file://` path resolves against `base_dir`.
pub async fn open_document_store(
    config: &DataIngestionConfig,
    base_dir: &Path,
) -> Result<Box<dyn DocumentStore>, IngestionError> {
    let url = config
        .connection_string
        .as_deref()
        .ok_or(IngestionError::MissingConnectionString)?;
    let store = connect_store(url, base_dir).await?;
    info!(store = store.store_name(), "Document store ready");
    Ok(store)
}

/// Pulls the raw collection out of the document store and lays it down as
/// the feature store plus a shuffled train/test split.
pub struct DataIngestion<'a> {
    config: DataIngestionConfig,
    store: &'a dyn DocumentStore,
}

impl<'a> DataIngestion<'a> {
    pub fn new(config: DataIngestionConfig, store: &'a dyn DocumentStore) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &DataIngestionConfig {
        &self.config
    }

    #[instrument(skip(self), fields(store = self.store.store_name()))]
    pub async fn export_collection_as_dataframe(&self) -> Result<DataFrame, IngestionError> {
        let database = &self.config.database_name;
        let collection = &self.config.collection_name;

        let documents = self
            .store
            .fetch_all(database, collection)
            .await
            .map_err(|source| IngestionError::Fetch {
                database: database.clone(),
                collection: collection.clone(),
                source,
            })?;

        if documents.is_empty() {
            warn!(%database, %collection, "Collection is empty");
        }
        info!(count = documents.len(), "Documents fetched");

        Ok(DataFrame::from_documents(documents)?)
    }

    /// Writes the full table to the feature store, replacing any previous file.
    pub fn export_data_into_feature_store(
        &self,
        frame: DataFrame,
    ) -> Result<DataFrame, IngestionError> {
        frame.write_csv(&self.config.feature_store_file_path)?;
        info!(path = ?self.config.feature_store_file_path, "Feature store written");
        Ok(frame)
    }

    pub fn split_data_as_train_test(&self, frame: &DataFrame) -> Result<(), IngestionError> {
        let ratio = check_split_ratio(self.config.train_test_split_ratio)?;

        let total = frame.height()?;
        let test_rows = test_partition_size(total, ratio);
        let (train, test) = frame.split_to_csv(
            test_rows,
            self.config.random_seed,
            &self.config.training_file_path,
            &self.config.testing_file_path,
        )?;

        info!(train, test, "Performed train test split");
        Ok(())
    }

    #[instrument(skip(self), fields(dir = ?self.config.data_ingestion_dir))]
    pub async fn initiate_data_ingestion(&self) -> Result<DataIngestionArtifact, IngestionError> {
        // Reject a bad ratio before touching the store or the disk.
        check_split_ratio(self.config.train_test_split_ratio)?;

        let frame = self.export_collection_as_dataframe().await?;
        let frame = self.export_data_into_feature_store(frame)?;
        self.split_data_as_train_test(&frame)?;

        let artifact = DataIngestionArtifact {
            trained_file_path: self.config.training_file_path.clone(),
            test_file_path: self.config.testing_file_path.clone(),
        };
        publish(artifact, &self.config.contract_path())
    }
}

fn check_split_ratio(ratio: f64) -> Result<f64, IngestionError> {
    if ratio > 0.0 && ratio < 1.0 {
        Ok(ratio)
    } else {
        Err(IngestionError::InvalidSplitRatio(ratio))
    }
}

/// Rows held out for testing: `ceil(total * ratio)`, never more than `total`.
pub fn test_partition_size(total: usize, ratio: f64) -> usize {
    ((total as f64 * ratio).ceil() as usize).min(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::testing::{MockStore, document, ingestion_config};
    use crate::infrastructure::error::InfrastructureError;
    use anyhow::Result;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn rows(n: usize) -> Vec<crate::ports::Document> {
        (0..n)
            .map(|i| {
                document(json!({
                    "_id": format!("id-{i}"),
                    "having_IP_Address": if i % 2 == 0 { 1 } else { -1 },
                    "SSLfinal_State": if i == 3 { json!("na") } else { json!(1) },
                    "Result": if i % 3 == 0 { -1 } else { 1 },
                }))
            })
            .collect()
    }

    fn line_count(path: &std::path::Path) -> usize {
        fs::read_to_string(path).unwrap().lines().count()
    }

    #[test]
    fn test_partition_sizes_follow_ceiling() {
        assert_eq!(test_partition_size(10, 0.2), 2);
        assert_eq!(test_partition_size(11, 0.2), 3);
        assert_eq!(test_partition_size(1, 0.2), 1);
        assert_eq!(test_partition_size(0, 0.2), 0);
    }

    #[tokio::test]
    async fn test_ten_rows_split_eight_two() -> Result<()> {
        let dir = tempdir()?;
        let store = MockStore::with_documents(rows(10));
        let ingestion = DataIngestion::new(ingestion_config(dir.path(), 0.2), &store);

        let artifact = ingestion.initiate_data_ingestion().await?;

        // header + rows
        assert_eq!(line_count(&artifact.trained_file_path), 9);
        assert_eq!(line_count(&artifact.test_file_path), 3);
        assert_eq!(line_count(&ingestion.config().feature_store_file_path), 11);
        assert!(ingestion.config().contract_path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_feature_store_drops_id_and_normalizes_na() -> Result<()> {
        let dir = tempdir()?;
        let store = MockStore::with_documents(rows(5));
        let ingestion = DataIngestion::new(ingestion_config(dir.path(), 0.2), &store);

        let frame = ingestion.export_collection_as_dataframe().await?;
        assert!(!frame.columns()?.contains(&"_id".to_string()));
        assert_eq!(frame.column_f64("SSLfinal_State")?[3], None);

        ingestion.export_data_into_feature_store(frame)?;
        let csv = fs::read_to_string(&ingestion.config().feature_store_file_path)?;
        assert!(!csv.contains("_id"));
        assert!(csv.lines().flat_map(|l| l.split(',')).all(|cell| cell != "na"));
        Ok(())
    }

    #[tokio::test]
    async fn test_feature_store_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        let store = MockStore::with_documents(rows(6));
        let ingestion = DataIngestion::new(ingestion_config(dir.path(), 0.2), &store);

        let frame = ingestion.export_collection_as_dataframe().await?;
        let frame = ingestion.export_data_into_feature_store(frame)?;
        let first = fs::read_to_string(&ingestion.config().feature_store_file_path)?;
        ingestion.export_data_into_feature_store(frame)?;
        let second = fs::read_to_string(&ingestion.config().feature_store_file_path)?;

        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_largest_seed_is_accepted() -> Result<()> {
        let dir = tempdir()?;
        let store = MockStore::with_documents(rows(10));
        let mut config = ingestion_config(dir.path(), 0.2);
        config.random_seed = u64::MAX;
        let ingestion = DataIngestion::new(config, &store);

        let artifact = ingestion.initiate_data_ingestion().await?;
        assert_eq!(line_count(&artifact.trained_file_path), 9);
        assert_eq!(line_count(&artifact.test_file_path), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_ratio_writes_nothing() -> Result<()> {
        for ratio in [0.0, 1.0, -0.5, 1.5] {
            let dir = tempdir()?;
            let store = MockStore::with_documents(rows(10));
            let ingestion = DataIngestion::new(ingestion_config(dir.path(), ratio), &store);

            let err = ingestion.initiate_data_ingestion().await.unwrap_err();
            assert!(matches!(err, IngestionError::InvalidSplitRatio(r) if r == ratio));
            assert!(!ingestion.config().data_ingestion_dir.exists());
            assert_eq!(store.calls(), 0);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_store_creates_no_files() -> Result<()> {
        let dir = tempdir()?;
        let store = MockStore::failing("connection refused");
        let ingestion = DataIngestion::new(ingestion_config(dir.path(), 0.2), &store);

        let err = ingestion.initiate_data_ingestion().await.unwrap_err();
        assert!(matches!(
            err,
            IngestionError::Fetch {
                source: InfrastructureError::StoreUnavailable(_),
                ..
            }
        ));
        assert!(!ingestion.config().data_ingestion_dir.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_store_comes_from_config_connection_string() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("store/KRISHAI"))?;
        let mut config = ingestion_config(dir.path(), 0.2);

        config.connection_string = None;
        assert!(matches!(
            open_document_store(&config, dir.path()).await,
            Err(IngestionError::MissingConnectionString)
        ));

        config.connection_string = Some("file://store".into());
        let store = open_document_store(&config, dir.path()).await?;
        assert_eq!(store.store_name(), "jsonl");
        assert!(store.fetch_all("KRISHAI", "NetworkData").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_collection_writes_empty_files() -> Result<()> {
        let dir = tempdir()?;
        let store = MockStore::with_documents(Vec::new());
        let ingestion = DataIngestion::new(ingestion_config(dir.path(), 0.2), &store);

        let artifact = ingestion.initiate_data_ingestion().await?;
        assert_eq!(fs::read_to_string(&artifact.trained_file_path)?, "");
        assert_eq!(fs::read_to_string(&artifact.test_file_path)?, "");
        Ok(())
    }
}
