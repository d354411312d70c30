use std::sync::Arc;

use tracing::{info, warn};

use super::application::{ApplicationError, LoanApplication};
use super::bulk::{BulkError, BulkPredictions, BulkTable};
use super::decision::{LoanDecision, UnsupportedLabel};
use super::features::{FeatureFrame, FeatureSchema, SchemaMismatch};
use super::model::{Classifier, ModelError};

/// Single-record and bulk inference over a shared, read-only classifier.
#[derive(Clone)]
pub struct PredictionService {
    model: Arc<dyn Classifier>,
}

impl PredictionService {
    pub fn new(model: Arc<dyn Classifier>) -> Self {
        Self { model }
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.model.schema()
    }

    pub fn model_type(&self) -> &str {
        self.model.model_type()
    }

    pub fn classes(&self) -> &[i64] {
        self.model.classes()
    }

    /// Validate, encode, and classify one application.
    pub fn predict_one(
        &self,
        application: &LoanApplication,
    ) -> Result<LoanDecision, PredictionError> {
        application.validate()?;
        let frame = self.model.schema().assemble_one(application)?;
        let decision = self
            .predict_frame(&frame)?
            .into_iter()
            .next()
            .ok_or(PredictionError::RowCountMismatch {
                expected: 1,
                actual: 0,
            })?;

        info!(
            decision = decision.summary(),
            purpose = %application.purpose,
            "single prediction completed"
        );
        Ok(decision)
    }

    /// Classify every row of an assembled frame, preserving row order.
    pub fn predict_frame(
        &self,
        frame: &FeatureFrame,
    ) -> Result<Vec<LoanDecision>, PredictionError> {
        let labels = self.model.predict(frame)?;
        if labels.len() != frame.len() {
            return Err(PredictionError::RowCountMismatch {
                expected: frame.len(),
                actual: labels.len(),
            });
        }

        labels
            .into_iter()
            .map(|label| LoanDecision::from_model_label(label).map_err(PredictionError::from))
            .collect()
    }

    /// Classify an uploaded table and append the decisions to its rows.
    ///
    /// Nothing is inferred unless every declared feature column is present and every
    /// selected cell parses.
    pub fn predict_batch(&self, table: BulkTable) -> Result<BulkPredictions, PredictionError> {
        let frame = match self.model.schema().assemble_table(&table) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(rows = table.len(), error = %err, "bulk upload rejected before inference");
                return Err(err.into());
            }
        };

        let decisions = self.predict_frame(&frame)?;
        let predictions = BulkPredictions::attach(table, decisions);

        info!(
            rows = predictions.len(),
            approved = predictions.approved(),
            rejected = predictions.rejected(),
            "bulk prediction completed"
        );
        Ok(predictions)
    }
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    InvalidApplication(#[from] ApplicationError),
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatch),
    #[error(transparent)]
    Upload(BulkError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    UnsupportedLabel(#[from] UnsupportedLabel),
    #[error("model returned {actual} labels for {expected} rows")]
    RowCountMismatch { expected: usize, actual: usize },
}

impl From<BulkError> for PredictionError {
    fn from(value: BulkError) -> Self {
        match value {
            BulkError::Schema(mismatch) => Self::SchemaMismatch(mismatch),
            other => Self::Upload(other),
        }
    }
}
