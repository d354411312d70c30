use loansphere::config::ArtifactConfig;
use loansphere::error::AppError;
use loansphere::prediction::PredictionContext;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the model and reference dataset, failing fast if either is unusable.
pub(crate) fn load_context(artifacts: &ArtifactConfig) -> Result<Arc<PredictionContext>, AppError> {
    let context = PredictionContext::load(artifacts)?;
    let overview = context.overview();
    info!(
        model = %artifacts.model_path.display(),
        dataset = %artifacts.dataset_path.display(),
        model_type = %overview.model_type,
        features = overview.feature_names.len(),
        records = overview.total_records,
        "prediction artifacts loaded"
    );
    Ok(Arc::new(context))
}

/// Apply CLI path overrides on top of the environment-derived artifact locations.
pub(crate) fn resolve_artifacts(
    mut artifacts: ArtifactConfig,
    model: Option<std::path::PathBuf>,
    dataset: Option<std::path::PathBuf>,
) -> ArtifactConfig {
    if let Some(model) = model {
        artifacts.model_path = model;
    }
    if let Some(dataset) = dataset {
        artifacts.dataset_path = dataset;
    }
    artifacts
}
