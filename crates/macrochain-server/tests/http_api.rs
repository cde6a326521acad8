//! End-to-end tests for the MacroChain HTTP API.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use macrochain_core::REPORT_DISCLAIMER;
use macrochain_server::{build_router, config::Settings, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(vars: &[(&str, &str)]) -> Router {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    let settings = Settings::from_lookup(|key| {
        vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    })
    .expect("settings");
    build_router(AppState::new(&settings))
}

fn app() -> Router {
    app_with(&[])
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = serde_json::from_slice(&body).expect("json body");
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn test_health_reports_configured_version() {
    let (status, body) = send(app_with(&[("API_VERSION", "2.3.4")]), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "2.3.4");
    assert_eq!(body["components"]["analyzer"], "healthy");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_root_banner() {
    let (status, body) = send(app(), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["health"], "/health");
    assert_eq!(body["version"], "1.0.0");
}

#[tokio::test]
async fn test_info_lists_capabilities() {
    let (status, body) = send(app(), get("/info")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "MacroChain AI");
    assert_eq!(body["capabilities"].as_array().unwrap().len(), 8);
    assert_eq!(
        body["limitations"][0],
        "Educational purposes only - no financial advice"
    );
    assert_eq!(body["endpoints"]["analyze"], "POST /analyze - Perform market analysis");
}

#[tokio::test]
async fn test_analyze_defaults_assets() {
    let (status, body) = send(
        app(),
        post_json("/analyze", &json!({ "query": "bitcoin market outlook" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "bitcoin market outlook");
    assert_eq!(
        body["metadata"]["research_metadata"]["assets_analyzed"],
        json!(["bitcoin", "ethereum"])
    );
    assert_eq!(body["disclaimer"], REPORT_DISCLAIMER);
    assert_eq!(body["market_conditions"]["overall_state"], "positive");
    assert_eq!(
        body["key_insights"][0],
        "Neutral sentiment coincides with range-bound market structure"
    );
    assert_eq!(body["risk_factors"].as_array().unwrap().len(), 15);
    assert_eq!(body["metadata"]["execution_summary"]["success_rate"], "100.0%");
}

#[tokio::test]
async fn test_analyze_is_deterministic() {
    let request = json!({ "query": "ethereum network health", "assets": ["Ethereum"] });
    let (_, first) = send(app(), post_json("/analyze", &request)).await;
    let (_, second) = send(app(), post_json("/analyze", &request)).await;

    assert_eq!(first["analysis_sections"], second["analysis_sections"]);
    assert_eq!(first["key_insights"], second["key_insights"]);
    assert_ne!(
        first["metadata"]["research_metadata"]["report_id"],
        second["metadata"]["research_metadata"]["report_id"]
    );
}

#[tokio::test]
async fn test_short_query_is_bad_request() {
    let (status, body) = send(app(), post_json("/analyze", &json!({ "query": " ab " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Query must be at least 3 characters long");
}

#[tokio::test]
async fn test_too_many_assets_is_bad_request() {
    let assets: Vec<String> = (0..11).map(|i| format!("coin{i}")).collect();
    let (status, body) = send(
        app(),
        post_json("/analyze", &json!({ "query": "altcoin outlook", "assets": assets })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Maximum 10 assets allowed per request");
}

#[tokio::test]
async fn test_malformed_body_is_unprocessable() {
    let (status, body) = send(app(), post_json("/analyze", &json!({ "assets": ["bitcoin"] }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation error");
}

#[tokio::test]
async fn test_research_returns_full_report() {
    let (status, body) = send(
        app(),
        post_json("/research", &json!({ "query": "solana structure", "assets": ["solana"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report_header"]["subtitle"], "Analysis of Solana Markets");
    assert_eq!(body["key_insights"]["section_title"], "KEY INSIGHTS");
    assert_eq!(body["risks_uncertainty"]["uncertainty_level"], "moderate_to_high");
}

#[tokio::test]
async fn test_disabled_phase_renders_section_error() {
    let app = app_with(&[("ENABLE_SENTIMENT_DATA", "false")]);
    let (status, body) = send(app, post_json("/analyze", &json!({ "query": "macro picture" }))).await;

    assert_eq!(status, StatusCode::OK);
    let sentiment = &body["analysis_sections"]["sentiment"];
    assert_eq!(sentiment["error"], true);
    assert_eq!(sentiment["message"], "Market Sentiment Analysis data unavailable");
    assert_eq!(body["metadata"]["execution_summary"]["phases_completed"], 4);
}

#[tokio::test]
async fn test_all_phases_disabled_is_internal_error() {
    let app = app_with(&[
        ("ENABLE_MACRO_DATA", "false"),
        ("ENABLE_SENTIMENT_DATA", "false"),
        ("ENABLE_ONCHAIN_DATA", "false"),
        ("ENABLE_MARKET_STRUCTURE_DATA", "false"),
    ]);
    let (status, body) = send(app, post_json("/analyze", &json!({ "query": "anything" }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "An unexpected error occurred while processing your request."
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, body) = send(app(), get("/docs")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");
    assert_eq!(body["message"], "The requested endpoint /docs does not exist");
    assert!(body["available_endpoints"]
        .as_array()
        .unwrap()
        .contains(&json!("/analyze")));
}
