// netsec-core/src/infrastructure/config/project.rs

use std::path::{Path, PathBuf};

use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::{DataSchema, PipelineSettings};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::yaml::read_yaml_file;

pub const DATABASE_URL_ENV: &str = "MONGO_DB_URL";
pub const ARTIFACT_DIR_ENV: &str = "NETSEC_ARTIFACT_DIR";

const CONFIG_CANDIDATES: [&str; 2] = ["pipeline.yaml", "netsec.yaml"];

#[instrument(skip(project_dir))]
pub fn load_pipeline_settings(project_dir: &Path) -> Result<PipelineSettings, InfrastructureError> {
    // 1. Discover the settings file
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading pipeline settings");

    // 2. Parse
    let mut settings: PipelineSettings = read_yaml_file(&config_path)?;

    // 3. Environment layering (MONGO_DB_URL, NETSEC_ARTIFACT_DIR)
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    // 4. Validate the merged tree
    settings
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(format!("{:?}: {}", config_path, e)))?;

    Ok(settings)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

/// Layers environment values over the parsed settings. `lookup` is
/// `std::env::var` in production and a map in tests.
pub fn apply_env_overrides<F>(settings: &mut PipelineSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(DATABASE_URL_ENV).filter(|v| !v.is_empty()) {
        // The URL carries credentials; log only that it was set.
        info!("Database URL provided via {}", DATABASE_URL_ENV);
        settings.ingestion.database_url = Some(url);
    }
    if let Some(dir) = lookup(ARTIFACT_DIR_ENV).filter(|v| !v.is_empty()) {
        info!(old = ?settings.artifact_dir, new = ?dir, "Overriding artifact dir via ENV");
        settings.artifact_dir = dir;
    }
}

/// Loads `schema-path` relative to the project directory.
#[instrument(skip(project_dir, settings))]
pub fn load_schema(
    project_dir: &Path,
    settings: &PipelineSettings,
) -> Result<DataSchema, InfrastructureError> {
    let path = project_dir.join(&settings.schema_path);
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(format!(
            "Data schema not found at {:?}",
            path
        )));
    }
    let schema: DataSchema = read_yaml_file(&path)?;
    if schema.columns.is_empty() {
        return Err(InfrastructureError::ConfigError(format!(
            "Data schema at {:?} declares no columns",
            path
        )));
    }
    let undeclared = schema.undeclared_numerical_columns();
    if !undeclared.is_empty() {
        return Err(InfrastructureError::ConfigError(format!(
            "Data schema at {:?} lists numerical columns not declared under `columns`: {:?}",
            path, undeclared
        )));
    }
    info!(columns = schema.columns.len(), "Data schema loaded");
    Ok(schema)
}
