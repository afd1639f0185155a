// netsec-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// The document store seam the ingestion stage reads through.
pub mod ports;

// 2. Domain
// Config/artifact entities, drift statistics, feature transforms, the model.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB frames, MongoDB / JSON-lines stores, YAML + npy persistence.
pub mod infrastructure;

// 4. Application (Use Cases)
// The four stages and the driver that chains their artifacts.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::PipelineError;
