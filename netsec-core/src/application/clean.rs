// netsec-core/src/application/clean.rs

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::PipelineError;
use crate::infrastructure::config::load_pipeline_settings;

/// Joins `artifact_dir` onto the project directory, refusing anything that
/// could land outside it (absolute paths, `..` segments, empty values).
pub fn resolve_artifact_root(
    project_dir: &Path,
    artifact_dir: &str,
) -> Result<PathBuf, PipelineError> {
    let relative = Path::new(artifact_dir);
    let escapes = relative.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    let has_name = relative
        .components()
        .any(|c| matches!(c, Component::Normal(_)));
    if escapes || !has_name {
        return Err(PipelineError::UnsafePath(artifact_dir.to_string()));
    }
    Ok(project_dir.join(relative))
}

/// Removes the configured artifact directory (every past run). Returns the
/// removed path, `None` when there was nothing to remove.
pub fn clean_artifacts(project_dir: &Path) -> Result<Option<PathBuf>, PipelineError> {
    tracing::info!("🧹 Initializing artifact cleanup...");

    let settings = load_pipeline_settings(project_dir)?;
    let full_path = resolve_artifact_root(project_dir, &settings.artifact_dir)?;

    if !full_path.exists() {
        return Ok(None);
    }
    if full_path.is_dir() {
        fs::remove_dir_all(&full_path)?;
    } else {
        fs::remove_file(&full_path)?;
    }
    println!("   🗑️  Artifacts removed: {}", settings.artifact_dir);
    Ok(Some(full_path))
}
