pub mod project;

pub use project::{
    ARTIFACT_DIR_ENV, DATABASE_URL_ENV, apply_env_overrides, load_pipeline_settings, load_schema,
};
