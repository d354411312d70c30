mod forest;
mod logistic;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::features::{FeatureFrame, FeatureSchema};
use forest::RandomForest;
use logistic::LogisticModel;

/// Inference capability consumed by the prediction service.
pub trait Classifier: Send + Sync {
    /// Name of the estimator family, for display.
    fn model_type(&self) -> &str;

    /// Declared input features, in the order the estimator expects them.
    fn schema(&self) -> &FeatureSchema;

    /// Class labels the estimator can emit.
    fn classes(&self) -> &[i64];

    /// One class label per frame row, in row order.
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<i64>, ModelError>;
}

/// Failure to load a model artifact. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
    #[error("model artifact must declare at least two distinct classes")]
    Classes,
    #[error("model artifact estimator is inconsistent: {0}")]
    Estimator(String),
}

/// Inference refused a frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error(
        "frame columns [{}] do not match model features [{}]",
        .found.join(", "),
        .expected.join(", ")
    )]
    FrameSchema {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("row {row} has a non-finite value in column '{column}'")]
    NonFinite { row: usize, column: String },
}

#[derive(Debug, Deserialize)]
struct ArtifactFile {
    model_type: String,
    feature_names_in: FeatureSchema,
    classes: Vec<i64>,
    estimator: EstimatorSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EstimatorSpec {
    Forest(RandomForest),
    Logistic(LogisticModel),
}

/// A pre-trained classifier loaded from its JSON export. Never mutated after load.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    model_type: String,
    schema: FeatureSchema,
    classes: Vec<i64>,
    estimator: EstimatorSpec,
}

impl ModelArtifact {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let artifact = Self::from_reader(std::io::BufReader::new(file))?;
        info!(
            path = %path.display(),
            model_type = %artifact.model_type,
            features = artifact.schema.len(),
            "loaded model artifact"
        );
        Ok(artifact)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let file: ArtifactFile = serde_json::from_reader(reader)?;
        Self::from_file(file)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelLoadError> {
        let file: ArtifactFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    fn from_file(file: ArtifactFile) -> Result<Self, ModelLoadError> {
        let ArtifactFile {
            model_type,
            feature_names_in,
            classes,
            estimator,
        } = file;

        let distinct: HashSet<i64> = classes.iter().copied().collect();
        if classes.len() < 2 || distinct.len() != classes.len() {
            return Err(ModelLoadError::Classes);
        }

        let n_features = feature_names_in.len();
        let n_classes = classes.len();
        match &estimator {
            EstimatorSpec::Forest(forest) => forest.validate(n_features, n_classes),
            EstimatorSpec::Logistic(model) => model.validate(n_features, n_classes),
        }
        .map_err(ModelLoadError::Estimator)?;

        Ok(Self {
            model_type,
            schema: feature_names_in,
            classes,
            estimator,
        })
    }

    fn predict_row(&self, row: &[f64]) -> i64 {
        let index = match &self.estimator {
            EstimatorSpec::Forest(forest) => forest.predict_index(row, self.classes.len()),
            EstimatorSpec::Logistic(model) => model.predict_index(row),
        };
        self.classes[index]
    }
}

impl Classifier for ModelArtifact {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<i64>, ModelError> {
        if frame.columns() != self.schema.names() {
            return Err(ModelError::FrameSchema {
                expected: self.schema.names().to_vec(),
                found: frame.columns().to_vec(),
            });
        }

        frame
            .rows()
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                if let Some(column) = row.iter().position(|value| !value.is_finite()) {
                    return Err(ModelError::NonFinite {
                        row: row_index + 1,
                        column: frame.columns()[column].clone(),
                    });
                }
                Ok(self.predict_row(row))
            })
            .collect()
    }
}
