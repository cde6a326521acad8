//! MacroChain HTTP Server
//!
//! Serves educational crypto market research over a small JSON API.

use macrochain_server::{build_router, config::Settings, logging::init_logging, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    init_logging(&settings.logging)?;

    let analysis = &settings.analysis;
    tracing::info!(
        title = %settings.api.title,
        version = %settings.api.version,
        "MacroChain AI API starting up"
    );
    tracing::info!(
        macro_phase = analysis.enable_macro,
        sentiment = analysis.enable_sentiment,
        onchain = analysis.enable_onchain,
        market_structure = analysis.enable_market_structure,
        timeout_secs = analysis.timeout_secs,
        "Analysis phases configured"
    );

    let app = build_router(AppState::new(&settings));

    let addr = settings.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("MacroChain AI API running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /          - Service banner");
    tracing::info!("  GET  /health    - Health check");
    tracing::info!("  GET  /info      - API information");
    tracing::info!("  POST /analyze   - Market analysis");
    tracing::info!("  POST /research  - Full research report");

    axum::serve(listener, app).await?;

    tracing::info!("MacroChain AI API shutting down");
    Ok(())
}
