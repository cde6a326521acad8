//! HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use macrochain_core::{
    model::now_timestamp, AnalysisRequest, AnalysisResponse, PipelineReport, ResearchReport,
};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Routes advertised by the service banner and the 404 body
pub const AVAILABLE_ENDPOINTS: &[&str] = &["/", "/health", "/analyze", "/research", "/info"];

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub description: &'static str,
    pub version: String,
    pub health: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: String,
    pub components: HealthComponents,
}

#[derive(Debug, Serialize)]
pub struct HealthComponents {
    pub analyzer: &'static str,
    pub formatter: &'static str,
    pub api: &'static str,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub description: &'static str,
    pub purpose: &'static str,
    pub capabilities: &'static [&'static str],
    pub supported_assets: &'static [&'static str],
    pub analysis_types: &'static [&'static str],
    pub limitations: &'static [&'static str],
    pub disclaimer: &'static str,
    pub version: String,
    pub endpoints: InfoEndpoints,
}

#[derive(Debug, Serialize)]
pub struct InfoEndpoints {
    pub analyze: &'static str,
    pub research: &'static str,
    pub health: &'static str,
    pub info: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub message: String,
    pub available_endpoints: &'static [&'static str],
    pub timestamp: String,
}

const CAPABILITIES: &[&str] = &[
    "Deep research pipeline with deterministic methodology",
    "Macroeconomic analysis with liquidity and policy context",
    "Market sentiment assessment with volatility and momentum",
    "On-chain dynamics analysis with network fundamentals",
    "Market structure analysis with trading context",
    "Cross-phase correlation and synthesis",
    "Professional research report generation",
    "Risk assessment and uncertainty quantification",
];

const SUPPORTED_ASSETS: &[&str] = &["bitcoin", "ethereum", "major cryptocurrencies"];

const ANALYSIS_TYPES: &[&str] = &["macroeconomic", "sentiment", "onchain", "combined"];

const LIMITATIONS: &[&str] = &[
    "Educational purposes only - no financial advice",
    "No price predictions or trading signals",
    "Conceptual analysis framework, not real-time data",
    "Research-grade methodology with documented limitations",
    "Market complexity exceeds analytical frameworks",
    "Unforeseen events can invalidate current analysis",
];

const INFO_DISCLAIMER: &str = "MacroChain AI provides research-grade cryptocurrency market analysis \
for educational purposes only. It does not provide financial advice, trading signals, or price \
predictions. Cryptocurrency markets are highly volatile and risky. Always conduct your own research \
and consult with qualified financial professionals.";

// ============================================================================
// Handlers
// ============================================================================

/// Service banner
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "MacroChain AI - Cryptocurrency Market Analysis API",
        description: "Educational crypto market analysis without financial advice",
        version: state.api.version.clone(),
        health: "/health",
    })
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_timestamp(),
        version: state.api.version.clone(),
        components: HealthComponents {
            analyzer: "healthy",
            formatter: "healthy",
            api: "healthy",
        },
    })
}

/// Run the pipeline and return the condensed analysis
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Json(request) = payload?;
    let (pipeline, research) = run_research(&state, &request)?;

    let response = state
        .formatter
        .to_api_response(&research, &pipeline, &request.query);
    tracing::info!(research_id = %pipeline.research_metadata.research_id, "Analysis completed");
    Ok(Json(response))
}

/// Run the pipeline and return the full research report
pub async fn research(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<ResearchReport>, AppError> {
    let Json(request) = payload?;
    let (pipeline, research) = run_research(&state, &request)?;

    tracing::info!(research_id = %pipeline.research_metadata.research_id, "Research report completed");
    Ok(Json(research))
}

fn run_research(state: &AppState, request: &AnalysisRequest) -> Result<(PipelineReport, ResearchReport), AppError> {
    tracing::info!(query = %request.query, "Received analysis request");

    let query = request.validate(&state.pipeline.config().limits)?;
    let pipeline = state.pipeline.execute(&query)?;
    let research = state
        .formatter
        .format_research_report(&pipeline, &request.query);

    Ok((pipeline, research))
}

/// Capabilities and limitations of the service
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "MacroChain AI",
        description: "AI-powered cryptocurrency market analysis agent",
        purpose: "Educational market analysis without financial advice",
        capabilities: CAPABILITIES,
        supported_assets: SUPPORTED_ASSETS,
        analysis_types: ANALYSIS_TYPES,
        limitations: LIMITATIONS,
        disclaimer: INFO_DISCLAIMER,
        version: state.api.version.clone(),
        endpoints: InfoEndpoints {
            analyze: "POST /analyze - Perform market analysis",
            research: "POST /research - Generate the full research report",
            health: "GET /health - Check system health",
            info: "GET /info - Get API information",
        },
    })
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Endpoint not found",
            message: format!("The requested endpoint {} does not exist", uri.path()),
            available_endpoints: AVAILABLE_ENDPOINTS,
            timestamp: now_timestamp(),
        }),
    )
}
