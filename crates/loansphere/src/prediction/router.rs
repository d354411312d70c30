use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use super::application::LoanApplication;
use super::bulk::BulkTable;
use super::context::PredictionContext;
use super::decision::LoanDecision;
use super::service::PredictionError;

pub const EXPORT_FILE_NAME: &str = "loan_predictions.csv";
const PREVIEW_ROWS: usize = 5;

/// Router builder exposing the single-record and bulk prediction endpoints.
pub fn prediction_router(context: Arc<PredictionContext>, upload_limit: usize) -> Router {
    Router::new()
        .route("/api/v1/loans/predict", post(predict_handler))
        .route("/api/v1/loans/bulk", post(bulk_handler))
        .route("/api/v1/loans/bulk/preview", post(bulk_preview_handler))
        .route("/api/v1/overview", get(overview_handler))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(context)
}

/// Public view of a single decision.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub decision: LoanDecision,
    pub label: u8,
    pub message: &'static str,
    pub predicted_at: DateTime<Utc>,
}

impl From<LoanDecision> for PredictionView {
    fn from(decision: LoanDecision) -> Self {
        Self {
            decision,
            label: decision.as_label(),
            message: decision.summary(),
            predicted_at: Utc::now(),
        }
    }
}

/// Counts and leading rows of a bulk run, for review before download.
#[derive(Debug, Clone, Serialize)]
pub struct BulkPreviewView {
    pub rows: usize,
    pub approved: usize,
    pub rejected: usize,
    pub columns: Vec<String>,
    pub preview: Vec<Vec<String>>,
}

pub(crate) async fn predict_handler(
    State(context): State<Arc<PredictionContext>>,
    Json(application): Json<LoanApplication>,
) -> Response {
    match context.service().predict_one(&application) {
        Ok(decision) => (StatusCode::OK, Json(PredictionView::from(decision))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn bulk_handler(
    State(context): State<Arc<PredictionContext>>,
    body: Bytes,
) -> Response {
    let predictions = match BulkTable::from_bytes(&body)
        .map_err(PredictionError::from)
        .and_then(|table| context.service().predict_batch(table))
    {
        Ok(predictions) => predictions,
        Err(err) => return error_response(err),
    };

    match predictions.to_csv() {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => error_response(PredictionError::Upload(err)),
    }
}

pub(crate) async fn bulk_preview_handler(
    State(context): State<Arc<PredictionContext>>,
    body: Bytes,
) -> Response {
    let result = BulkTable::from_bytes(&body)
        .map_err(PredictionError::from)
        .and_then(|table| context.service().predict_batch(table));

    match result {
        Ok(predictions) => {
            let view = BulkPreviewView {
                rows: predictions.len(),
                approved: predictions.approved(),
                rejected: predictions.rejected(),
                columns: predictions.headers().to_vec(),
                preview: predictions.preview(PREVIEW_ROWS).to_vec(),
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn overview_handler(
    State(context): State<Arc<PredictionContext>>,
) -> Response {
    (StatusCode::OK, Json(context.overview())).into_response()
}

fn error_response(err: PredictionError) -> Response {
    match &err {
        PredictionError::InvalidApplication(_) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        PredictionError::SchemaMismatch(mismatch) => {
            let payload = json!({
                "error": err.to_string(),
                "missing_columns": mismatch.missing,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        PredictionError::Upload(_) => {
            let payload = json!({ "error": format!("Error: {err}") });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        PredictionError::Model(_)
        | PredictionError::UnsupportedLabel(_)
        | PredictionError::RowCountMismatch { .. } => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
