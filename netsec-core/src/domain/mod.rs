pub mod drift;
pub mod entity;
pub mod error;
pub mod features;
pub mod model;
pub mod project;
pub mod state;

// Re-exports to keep imports short elsewhere
pub use error::{DomainError, Stage};
