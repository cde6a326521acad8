//! # macrochain-core
//!
//! Deterministic, educational crypto market research. A query runs through
//! four analysis phases and a synthesis step, and the result is formatted as a
//! professional research report. Nothing here gives financial advice: every
//! output carries a fixed disclaimer.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  AnalysisRequest ──validate──▶ ResearchQuery                  │
//! ├──────────────────────────────────────────────────────────────┤
//! │  1. macro            liquidity, rates, risk appetite         │
//! │  2. sentiment        fear & greed, social, news, momentum    │
//! │  3. onchain          activity, holders, fees, network health │
//! │  4. market_structure phase, volatility, liquidity, efficiency│
//! │  5. synthesis        correlations, market state, quality     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  PipelineReport ──format──▶ ResearchReport / AnalysisResponse│
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failing phase is recorded and the run continues; the report renders
//! that phase as an unavailable section.

pub mod config;
pub mod error;
pub mod formatter;
pub mod intake;
pub mod model;
pub mod pipeline;
pub mod svckit;

pub use config::{AnalysisConfig, IntakeLimits};
pub use error::{AnalysisError, Result};
pub use formatter::{AnalysisResponse, ReportFormatter, ResearchReport, REPORT_DISCLAIMER};
pub use intake::{AnalysisRequest, ResearchQuery};
pub use model::{Confidence, ResearchPhase, DEFAULT_ASSETS, PIPELINE_VERSION};
pub use pipeline::{PipelineReport, ResearchPipeline};

/// Re-export analyzers for custom pipelines
pub mod analyzers {
    pub use crate::svckit::{
        default_analyzers, MacroAnalyzer, MarketStructureAnalyzer, OnchainAnalyzer, PhaseAnalyzer,
        PhaseReport, SentimentAnalyzer,
    };
}
