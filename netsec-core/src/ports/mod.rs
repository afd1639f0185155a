// netsec-core/src/ports/mod.rs

pub mod document_store;

pub use document_store::{Document, DocumentStore};
