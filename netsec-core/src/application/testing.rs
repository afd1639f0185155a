// netsec-core/src/application/testing.rs
//
// Shared fixtures for stage tests: an in-memory document store and a small
// synthetic phishing-like collection.

#![allow(clippy::expect_used)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::TimeZone;
use serde_json::{Value, json};

use crate::domain::entity::{DataIngestionConfig, TrainingPipelineConfig};
use crate::domain::project::{ColumnSpec, DataSchema, PipelineSettings};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::{Document, DocumentStore};

pub const FEATURES: [&str; 6] = [
    "having_IP_Address",
    "URL_Length",
    "SSLfinal_State",
    "Domain_registeration_length",
    "Request_URL",
    "web_traffic",
];

pub struct MockStore {
    documents: Vec<Document>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockStore {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            documents: Vec::new(),
            failure: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn fetch_all(
        &self,
        _database: &str,
        _collection: &str,
    ) -> Result<Vec<Document>, InfrastructureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(InfrastructureError::StoreUnavailable(message.clone())),
            None => Ok(self.documents.clone()),
        }
    }

    fn store_name(&self) -> &str {
        "mock"
    }
}

pub fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("test document must be an object, got {other}"),
    }
}

pub fn settings() -> PipelineSettings {
    serde_yaml::from_str("name: network_security").expect("valid settings")
}

pub fn root(dir: &Path) -> TrainingPipelineConfig {
    let now = chrono::Local
        .with_ymd_and_hms(2024, 3, 7, 14, 5, 9)
        .single()
        .expect("unambiguous timestamp");
    TrainingPipelineConfig::new(dir, &settings(), now)
}

pub fn ingestion_config(dir: &Path, ratio: f64) -> DataIngestionConfig {
    let mut settings = settings();
    settings.ingestion.train_test_split_ratio = ratio;
    DataIngestionConfig::new(&root(dir), &settings)
}

pub fn schema() -> DataSchema {
    let mut columns: Vec<ColumnSpec> = FEATURES
        .iter()
        .map(|name| ColumnSpec {
            name: name.to_string(),
            dtype: "int64".to_string(),
        })
        .collect();
    columns.push(ColumnSpec {
        name: "Result".to_string(),
        dtype: "int64".to_string(),
    });
    DataSchema {
        columns,
        numerical_columns: FEATURES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Deterministic pseudo-random value in {-1, 0, 1}.
fn mix(i: u64, j: u64) -> i64 {
    let h = i.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ j.wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    (h.wrapping_mul(0xFF51_AFD7_ED55_8CCD) >> 33) as i64 % 3 - 1
}

/// `n` rows with features in {-1, 0, 1}; `Result` is 1 when the features sum
/// to a positive value and -1 otherwise. Every 17th row has an `"na"` cell.
pub fn phishing_documents(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| {
            let mut doc = Document::new();
            doc.insert("_id".into(), json!(format!("{i:024x}")));
            let mut sum = 0i64;
            for (j, name) in FEATURES.iter().enumerate() {
                let v = mix(i as u64, j as u64);
                sum += v;
                if i % 17 == 5 && j == 2 {
                    doc.insert(name.to_string(), json!("na"));
                } else {
                    doc.insert(name.to_string(), json!(v));
                }
            }
            doc.insert("Result".into(), json!(if sum > 0 { 1 } else { -1 }));
            doc
        })
        .collect()
}
