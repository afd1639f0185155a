// netsec-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(netsec::infra::database::duckdb),
        help("An error occurred inside the table engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("MongoDB Error: {0}")]
    #[diagnostic(
        code(netsec::infra::database::mongodb),
        help("Check MONGO_DB_URL and that the server is reachable.")
    )]
    MongoDB(#[from] mongodb::error::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE / DOCUMENT STORE ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    #[error("Document store unavailable: {0}")]
    #[diagnostic(
        code(netsec::infra::store),
        help("Check the connection string (mongodb://... or file://...).")
    )]
    StoreUnavailable(String),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(netsec::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- SERIALIZATION ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(netsec::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(netsec::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Array Persistence Error: {0}")]
    #[diagnostic(code(netsec::infra::npy))]
    NpyError(String),

    // --- CONFIG ---
    #[error("Configuration Error: {0}")]
    #[diagnostic(code(netsec::infra::config))]
    ConfigError(String),

    #[error("Pipeline configuration not found at '{0}'")]
    #[diagnostic(
        code(netsec::infra::config_missing),
        help("Create a pipeline.yaml in the project directory.")
    )]
    ConfigNotFound(String),
}

// Shortcuts for `?` on driver calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

impl From<mongodb::error::Error> for InfrastructureError {
    fn from(err: mongodb::error::Error) -> Self {
        InfrastructureError::Database(DatabaseError::MongoDB(err))
    }
}

impl From<tempfile::PersistError> for InfrastructureError {
    fn from(err: tempfile::PersistError) -> Self {
        InfrastructureError::Io(err.error)
    }
}
