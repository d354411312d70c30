use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::prediction::application::LoanApplication;
use crate::prediction::context::PredictionContext;
use crate::prediction::dataset::DatasetSummary;
use crate::prediction::encoding::{HomeOwnership, Purpose, Term};
use crate::prediction::features::{FeatureFrame, FeatureSchema, TRAINED_COLUMNS};
use crate::prediction::model::{Classifier, ModelArtifact, ModelError};
use crate::prediction::router::prediction_router;
use crate::prediction::service::PredictionService;

pub(super) const MODEL_JSON: &str =
    include_str!("../../../tests/fixtures/loan_prediction_model.json");
pub(super) const DATASET_CSV: &str = include_str!("../../../tests/fixtures/loan_data.csv");
pub(super) const BULK_CSV: &str = include_str!("../../../tests/fixtures/bulk_encoded.csv");

pub(super) const UPLOAD_LIMIT: usize = 1024 * 1024;

pub(super) fn model() -> Arc<ModelArtifact> {
    Arc::new(ModelArtifact::from_json(MODEL_JSON).expect("fixture model loads"))
}

pub(super) fn service() -> PredictionService {
    PredictionService::new(model())
}

pub(super) fn context() -> Arc<PredictionContext> {
    let dataset =
        DatasetSummary::from_reader(DATASET_CSV.as_bytes()).expect("fixture dataset loads");
    Arc::new(PredictionContext::new(model(), dataset))
}

pub(super) fn router() -> axum::Router {
    prediction_router(context(), UPLOAD_LIMIT)
}

/// Strong applicant: good score, income well above the split, no credit problems.
pub(super) fn application() -> LoanApplication {
    LoanApplication {
        current_loan_amount: 12_000.0,
        term: Term::Short,
        credit_score: 720,
        annual_income: 58_000.0,
        home_ownership: HomeOwnership::Rent,
        purpose: Purpose::DebtConsolidation,
        monthly_debt: 640.5,
        years_of_credit_history: 11.0,
        months_since_last_delinquent: 0,
        number_of_open_accounts: 7,
        number_of_credit_problems: 0,
        current_credit_balance: 9_800.0,
        maximum_open_credit: 21_000.0,
    }
}

/// Minimum-bound submission: zero amounts, lowest credit score.
pub(super) fn boundary_application() -> LoanApplication {
    LoanApplication {
        current_loan_amount: 0.0,
        term: Term::Short,
        credit_score: 300,
        annual_income: 0.0,
        home_ownership: HomeOwnership::Rent,
        purpose: Purpose::Other,
        monthly_debt: 0.0,
        years_of_credit_history: 0.0,
        months_since_last_delinquent: 0,
        number_of_open_accounts: 0,
        number_of_credit_problems: 0,
        current_credit_balance: 0.0,
        maximum_open_credit: 0.0,
    }
}

pub(super) fn trained_schema() -> FeatureSchema {
    FeatureSchema::new(TRAINED_COLUMNS).expect("trained columns form a schema")
}

/// Emits a fixed label for every row and counts how often it was asked.
pub(super) struct FixedLabelClassifier {
    schema: FeatureSchema,
    label: i64,
    calls: AtomicUsize,
}

impl FixedLabelClassifier {
    pub(super) fn new(schema: FeatureSchema, label: i64) -> Self {
        Self {
            schema,
            label,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for FixedLabelClassifier {
    fn model_type(&self) -> &str {
        "FixedLabel"
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn classes(&self) -> &[i64] {
        &[0, 1]
    }

    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<i64>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.label; frame.len()])
    }
}

/// Drops the last row's label, breaking the one-label-per-row contract.
pub(super) struct ShortClassifier {
    pub(super) schema: FeatureSchema,
}

impl Classifier for ShortClassifier {
    fn model_type(&self) -> &str {
        "Short"
    }

    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn classes(&self) -> &[i64] {
        &[0, 1]
    }

    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<i64>, ModelError> {
        Ok(vec![1; frame.len().saturating_sub(1)])
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), UPLOAD_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), UPLOAD_LIMIT)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
