//! Loan approval prediction: category encoding, feature assembly, and inference.
//!
//! A submission flows through the [`encoding`] tables into an [`features::FeatureFrame`]
//! ordered by the model's declared schema, then through the [`service::PredictionService`]
//! to a [`LoanDecision`]. Bulk uploads take the same route row by row and come back as a
//! CSV export with a `Prediction` column.

pub mod application;
pub mod bulk;
pub mod context;
pub mod dataset;
pub mod decision;
pub mod encoding;
pub mod features;
pub mod model;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use application::{ApplicationError, LoanApplication};
pub use bulk::{BulkError, BulkPredictions, BulkTable, PREDICTION_COLUMN};
pub use context::{ContextError, ModelOverview, PredictionContext};
pub use dataset::{DatasetError, DatasetSummary};
pub use decision::{LoanDecision, UnsupportedLabel};
pub use encoding::{HomeOwnership, Purpose, Term, UnknownCategory};
pub use features::{FeatureFrame, FeatureSchema, SchemaMismatch};
pub use model::{Classifier, ModelArtifact, ModelError, ModelLoadError};
pub use router::prediction_router;
pub use service::{PredictionError, PredictionService};
