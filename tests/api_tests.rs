use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use tax_optimizer_api::{
    api::{create_router, AppState},
    error::GENERIC_FAILURE_MESSAGE,
    models::{ReferenceRecord, FEATURE_COUNT},
    services::{
        peers::{DistanceMetric, NeighborSettings, PeerIndex},
        scaler::StandardScaler,
        tax_estimator::{LinearRegressor, TaxEstimator},
        TaxAdvisor,
    },
};

/// Twelve peers averaging 120,000 in deductions and 150,000 in investments
fn reference_population() -> Vec<ReferenceRecord> {
    (0..12)
        .map(|i| {
            let mut features = [0.0; FEATURE_COUNT];
            features[1] = i as f64;
            let (deductions, investments) = if i % 2 == 0 {
                (100_000.0, 100_000.0)
            } else {
                (140_000.0, 200_000.0)
            };
            ReferenceRecord {
                features,
                total_deductions: deductions,
                total_investments: investments,
            }
        })
        .collect()
}

fn create_test_server_with(coefficients: Vec<f64>) -> TestServer {
    let estimator = TaxEstimator::new(Box::new(LinearRegressor {
        coefficients,
        intercept: 0.0,
    }));
    let peers = PeerIndex::from_scaled(
        StandardScaler::identity(),
        reference_population(),
        NeighborSettings {
            n_neighbors: 12,
            metric: DistanceMetric::Euclidean,
        },
    )
    .unwrap();

    let state = AppState::new(TaxAdvisor::new(estimator, peers));
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    // A quarter of annual total income
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[1] = 0.25;
    create_test_server_with(coefficients)
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_model_info() {
    let server = create_test_server();
    let response = server.get("/api/v1/model").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["regressor"], "linear");
    assert_eq!(body["reference_population"], 12);
    assert_eq!(body["n_neighbors"], 12);
    assert_eq!(body["metric"], "euclidean");
}

#[tokio::test]
async fn test_zero_profile_returns_starter_advice() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/optimize")
        .json(&json!({ "age": 30 }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["estimated_tax"], 0.0);
    assert_eq!(body["recommended_deduction"], 0.0);
    assert_eq!(body["recommended_investment"], 0.0);
    assert_eq!(body["display"]["estimated_tax"], "₹0.00");
    assert_eq!(body["investment_advice"]["tier"], "low_risk_starter");
    assert_eq!(
        body["investment_advice"]["tip"],
        "Consider starting with ELSS Mutual Funds or Tax-saving Fixed Deposits (FDs) for low-risk options."
    );
    assert_eq!(body["deduction_advice"]["tier"], "start_80c");
    assert_eq!(
        body["deduction_advice"]["heading"],
        "Deduction Maximization Tips"
    );
}

#[tokio::test]
async fn test_peer_averages_drive_tiers() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/optimize")
        .json(&json!({
            "age": 42,
            "total_income": 100000.0,
            "salary_income": 100000.0,
            "section_80C": 12500.0
        }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    // 100,000 x 12 x 0.25
    assert_eq!(body["estimated_tax"], 300000.0);
    assert_eq!(body["display"]["estimated_tax"], "₹300,000.00");
    assert_eq!(body["recommended_deduction"], 120000.0);
    assert_eq!(body["recommended_investment"], 150000.0);
    assert_eq!(body["investment_advice"]["tier"], "diversify");
    assert_eq!(body["deduction_advice"]["tier"], "expanded");
    assert_eq!(
        body["deduction_advice"]["tip"],
        "Include health insurance (80D), education/home loan interest, and NPS contributions."
    );
}

#[tokio::test]
async fn test_age_out_of_range_is_rejected() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/optimize")
        .json(&json!({ "age": 12, "total_income": 1000.0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("age"));
}

#[tokio::test]
async fn test_undecodable_age_is_rejected_as_json_error() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/optimize")
        .json(&json!({ "age": -5, "total_income": 10.0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
}

#[tokio::test]
async fn test_negative_amount_is_rejected() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/optimize")
        .json(&json!({ "age": 30, "mutual_funds": -5.0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_schema_mismatch_returns_generic_error() {
    let server = create_test_server_with(vec![1.0, 2.0, 3.0]);
    let response = server
        .post("/api/v1/optimize")
        .json(&json!({ "age": 30, "total_income": 1000.0 }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], GENERIC_FAILURE_MESSAGE);

    // Shared state is untouched; the next request still succeeds
    let response = server
        .post("/api/v1/optimize")
        .json(&json!({ "age": 30 }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
