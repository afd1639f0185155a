// netsec-core/src/domain/features/mod.rs

pub mod imputer;
pub mod preprocessor;
pub mod scaler;

pub use imputer::KnnImputer;
pub use preprocessor::Preprocessor;
pub use scaler::StandardScaler;
