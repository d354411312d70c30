use std::sync::Arc;

use serde::Serialize;

use super::dataset::{DatasetError, DatasetSummary};
use super::model::{Classifier, ModelArtifact, ModelLoadError};
use super::service::PredictionService;
use crate::config::ArtifactConfig;

/// Artifacts loaded once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct PredictionContext {
    service: PredictionService,
    dataset: DatasetSummary,
}

impl PredictionContext {
    pub fn new(model: Arc<dyn Classifier>, dataset: DatasetSummary) -> Self {
        Self {
            service: PredictionService::new(model),
            dataset,
        }
    }

    pub fn load(config: &ArtifactConfig) -> Result<Self, ContextError> {
        let model = ModelArtifact::from_path(&config.model_path)?;
        let dataset = DatasetSummary::from_path(&config.dataset_path)?;
        Ok(Self::new(Arc::new(model), dataset))
    }

    pub fn service(&self) -> &PredictionService {
        &self.service
    }

    pub fn dataset(&self) -> DatasetSummary {
        self.dataset
    }

    pub fn overview(&self) -> ModelOverview {
        ModelOverview {
            total_records: self.dataset.total_records,
            approved_loans: self.dataset.approved,
            model_type: self.service.model_type().to_string(),
            classes: self.service.classes().to_vec(),
            feature_names: self.service.schema().names().to_vec(),
        }
    }
}

/// Dataset and model facts shown alongside the prediction forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelOverview {
    pub total_records: usize,
    pub approved_loans: usize,
    pub model_type: String,
    pub classes: Vec<i64>,
    pub feature_names: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("could not load model: {0}")]
    Model(#[from] ModelLoadError),
    #[error("could not load reference dataset: {0}")]
    Dataset(#[from] DatasetError),
}
