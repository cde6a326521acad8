//! Compact API response built from a research report

use serde::Serialize;

use super::report::{
    MacroContext, MarketSentiment, MarketStructure, OnchainOverview, ReportMetadata, Section,
};
use crate::model::Confidence;

/// Body returned by `POST /analyze`
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisResponse {
    pub query: String,
    pub timestamp: String,
    pub summary: String,
    pub market_conditions: MarketConditions,
    pub analysis_sections: AnalysisSections,
    pub key_insights: Vec<String>,
    pub risk_factors: Vec<String>,
    pub educational_context: String,
    pub disclaimer: &'static str,
    pub metadata: ReportMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MarketConditions {
    pub overall_state: &'static str,
    pub key_factors: Vec<String>,
    pub confidence_level: Confidence,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnalysisSections {
    pub macroeconomic: Section<MacroContext>,
    pub sentiment: Section<MarketSentiment>,
    pub onchain: Section<OnchainOverview>,
    pub market_structure: Section<MarketStructure>,
}
