use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::prediction::router::predict_handler;

#[tokio::test]
async fn predict_handler_returns_decision() {
    let response = predict_handler(State(context()), axum::Json(application())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["decision"], "approved");
    assert_eq!(body["label"], 1);
    assert_eq!(body["message"], "Loan Approved");
    assert!(body["predicted_at"].is_string());
}

#[tokio::test]
async fn predict_handler_rejects_out_of_range_fields() {
    let mut application = application();
    application.current_loan_amount = -5.0;
    let response = predict_handler(State(context()), axum::Json(application)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn predict_route_accepts_human_readable_selections() {
    let payload = json!({
        "current_loan_amount": 0.0,
        "term": "Short",
        "credit_score": 300,
        "annual_income": 0.0,
        "home_ownership": "Rent",
        "purpose": "Other",
        "monthly_debt": 0.0,
        "years_of_credit_history": 0.0,
        "months_since_last_delinquent": 0,
        "number_of_open_accounts": 0,
        "number_of_credit_problems": 0,
        "current_credit_balance": 0.0,
        "maximum_open_credit": 0.0
    });

    let response = router()
        .oneshot(
            Request::post("/api/v1/loans/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"], "rejected");
    assert_eq!(body["label"], 0);
}

#[tokio::test]
async fn predict_route_rejects_selection_outside_enumeration() {
    let mut payload = serde_json::to_value(application()).expect("serialize");
    payload["purpose"] = json!("Lottery Tickets");

    let response = router()
        .oneshot(
            Request::post("/api/v1/loans/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn bulk_route_returns_csv_attachment() {
    let response = router()
        .oneshot(
            Request::post("/api/v1/loans/bulk")
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from(BULK_CSV))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .expect("content type set")
        .to_string();
    assert!(content_type.starts_with("text/csv"), "{content_type}");
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .expect("disposition set")
        .to_string();
    assert!(disposition.contains("loan_predictions.csv"));

    let csv = read_text_body(response).await;
    let mut lines = csv.lines();
    assert!(lines.next().expect("header line").ends_with(",Prediction"));
    let labels: Vec<&str> = lines
        .map(|line| line.rsplit(',').next().expect("label cell"))
        .collect();
    assert_eq!(labels, vec!["1", "0", "0", "1"]);
}

#[tokio::test]
async fn bulk_route_reports_missing_columns() {
    let response = router()
        .oneshot(
            Request::post("/api/v1/loans/bulk")
                .body(Body::from("Applicant,Term\nA-1,0\n"))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    let missing = body["missing_columns"].as_array().expect("missing list");
    assert_eq!(missing.len(), 12);
    assert_eq!(missing[0], "Credit Score");
}

#[tokio::test]
async fn bulk_route_reports_parse_failures() {
    let response = router()
        .oneshot(
            Request::post("/api/v1/loans/bulk")
                .body(Body::from("Term,Purpose\n1\n"))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    let message = body["error"].as_str().expect("error message");
    assert!(message.starts_with("Error: "), "{message}");
}

#[tokio::test]
async fn bulk_preview_route_summarizes_run() {
    let response = router()
        .oneshot(
            Request::post("/api/v1/loans/bulk/preview")
                .body(Body::from(BULK_CSV))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["rows"], 4);
    assert_eq!(body["approved"], 2);
    assert_eq!(body["rejected"], 2);
    assert_eq!(body["preview"].as_array().expect("preview rows").len(), 4);
    assert_eq!(body["columns"].as_array().expect("columns").len(), 15);
}

#[tokio::test]
async fn overview_route_reports_dataset_and_model() {
    let response = router()
        .oneshot(
            Request::get("/api/v1/overview")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total_records"], 6);
    assert_eq!(body["approved_loans"], 4);
    assert_eq!(body["model_type"], "RandomForestClassifier");
    assert_eq!(body["classes"], json!([0, 1]));
    assert_eq!(body["feature_names"].as_array().expect("features").len(), 13);
}

#[tokio::test]
async fn bulk_route_enforces_upload_limit() {
    let router = crate::prediction::router::prediction_router(context(), 64);
    let response = router
        .oneshot(
            Request::post("/api/v1/loans/bulk")
                .body(Body::from(BULK_CSV))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
