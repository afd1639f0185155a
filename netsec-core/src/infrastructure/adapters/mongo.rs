// netsec-core/src/infrastructure/adapters/mongo.rs

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document as BsonDocument, doc};
use mongodb::options::ClientOptions;
use mongodb::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::infrastructure::error::InfrastructureError;
use crate::ports::{Document, DocumentStore};

const APP_NAME: &str = "netsec";
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MongoStore {
    client: Client,
}

impl MongoStore {
    /// Parses the connection string. The server is first contacted by `fetch_all`.
    pub async fn connect(url: &str) -> Result<Self, InfrastructureError> {
        let mut options = ClientOptions::parse(url).await?;
        options.app_name.get_or_insert_with(|| APP_NAME.to_string());
        options
            .server_selection_timeout
            .get_or_insert(SERVER_SELECTION_TIMEOUT);
        let client = Client::with_options(options)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    #[instrument(skip(self))]
    async fn fetch_all(
        &self,
        database: &str,
        collection: &str,
    ) -> Result<Vec<Document>, InfrastructureError> {
        let coll = self
            .client
            .database(database)
            .collection::<BsonDocument>(collection);
        let mut cursor = coll.find(doc! {}).await?;

        let mut documents = Vec::new();
        while let Some(record) = cursor.try_next().await? {
            match Bson::Document(record).into_relaxed_extjson() {
                Value::Object(map) => documents.push(map),
                other => {
                    return Err(InfrastructureError::StoreUnavailable(format!(
                        "unexpected record shape in {database}.{collection}: {other}"
                    )));
                }
            }
        }
        debug!(count = documents.len(), "Fetched documents from MongoDB");
        Ok(documents)
    }

    fn store_name(&self) -> &str {
        "mongodb"
    }
}
