// netsec-core/src/ports/document_store.rs

// What ingestion needs from the outside world: every document of a named
// collection. Whether that is MongoDB or a directory of JSON-lines files is
// the adapter's business.

use async_trait::async_trait;

use crate::infrastructure::error::InfrastructureError;

/// One record, field order preserved.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read-only query of all documents in `database.collection`.
    async fn fetch_all(
        &self,
        database: &str,
        collection: &str,
    ) -> Result<Vec<Document>, InfrastructureError>;

    fn store_name(&self) -> &str;
}
