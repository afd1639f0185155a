pub mod logistic;
pub mod metrics;
pub mod network_model;

pub use logistic::{FitParams, FitSummary, LogisticRegression};
pub use metrics::classification_score;
pub use network_model::NetworkModel;
