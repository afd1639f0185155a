pub mod ks;
pub mod report;

pub use ks::{KsOutcome, KsTest};
pub use report::{ColumnDrift, DriftReport};
