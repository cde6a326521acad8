//! Service Kit - Phase Analyzers
//!
//! The four analysis phases of the research pipeline. Each analyzer is a
//! pure function of constant indicator tables: the same context always
//! produces the same report.

mod macro_analyzer;
mod onchain_analyzer;
mod sentiment_analyzer;
mod structure_analyzer;

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::model::{Confidence, ResearchContext, ResearchPhase};

pub use macro_analyzer::{MacroAnalyzer, MacroConditions, MacroOverall, MacroReport};
pub use onchain_analyzer::{
    EfficiencyMetrics, HolderPatterns, NetworkConditions, OnchainAnalyzer, OnchainReport, UsagePatterns,
};
pub use sentiment_analyzer::{
    FearGreedLevel, MediaBiasAnalysis, OverallSentiment, SentimentAnalyzer, SentimentReport,
};
pub use structure_analyzer::{
    LiquidityCondition, MarketPhase, MarketStructureAnalyzer, StructureReport, StructureRiskContext,
    VolatilityRegime,
};

/// One stage of the research pipeline
pub trait PhaseAnalyzer: Send + Sync {
    /// Phase this analyzer fills in
    fn phase(&self) -> ResearchPhase;

    /// Produce the phase report for a request
    fn analyze(&self, ctx: &ResearchContext) -> Result<PhaseReport>;
}

/// The standard analyzer set, in pipeline order
pub fn default_analyzers() -> Vec<Arc<dyn PhaseAnalyzer>> {
    vec![
        Arc::new(MacroAnalyzer::new()),
        Arc::new(SentimentAnalyzer::new()),
        Arc::new(OnchainAnalyzer::new()),
        Arc::new(MarketStructureAnalyzer::new()),
    ]
}

/// Output of a single analyzer
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum PhaseReport {
    Macro(MacroReport),
    Sentiment(SentimentReport),
    Onchain(OnchainReport),
    MarketStructure(StructureReport),
}

impl PhaseReport {
    pub const fn phase(&self) -> ResearchPhase {
        match self {
            Self::Macro(_) => ResearchPhase::Macro,
            Self::Sentiment(_) => ResearchPhase::Sentiment,
            Self::Onchain(_) => ResearchPhase::Onchain,
            Self::MarketStructure(_) => ResearchPhase::MarketStructure,
        }
    }

    pub fn insights(&self) -> &[String] {
        match self {
            Self::Macro(r) => &r.insights,
            Self::Sentiment(r) => &r.insights,
            Self::Onchain(r) => &r.insights,
            Self::MarketStructure(r) => &r.insights,
        }
    }

    /// Confidence the phase reports in its own assessment
    pub fn confidence(&self) -> Confidence {
        match self {
            Self::Macro(r) => r.global_risk_sentiment.overall_sentiment.confidence,
            Self::Sentiment(r) => r.overall_sentiment.confidence,
            Self::Onchain(_) => Confidence::default(),
            Self::MarketStructure(r) => r.market_phase.phase_confidence,
        }
    }

    /// Headline label used when weighing phases against each other
    pub fn state_label(&self) -> &'static str {
        match self {
            Self::Macro(r) => r.overall_conditions.overall.as_str(),
            Self::Sentiment(r) => r.overall_sentiment.overall_sentiment,
            Self::Onchain(r) => r.network_conditions.overall_status,
            Self::MarketStructure(r) => r.market_phase.overall_bias,
        }
    }

    pub fn assumptions(&self) -> Vec<String> {
        match self {
            Self::MarketStructure(r) => r.assumptions.iter().map(|s| (*s).to_string()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn limitations(&self) -> Vec<String> {
        match self {
            Self::MarketStructure(r) => r.limitations.iter().map(|s| (*s).to_string()).collect(),
            _ => Vec::new(),
        }
    }

    pub const fn as_macro(&self) -> Option<&MacroReport> {
        match self {
            Self::Macro(r) => Some(r),
            _ => None,
        }
    }

    pub const fn as_sentiment(&self) -> Option<&SentimentReport> {
        match self {
            Self::Sentiment(r) => Some(r),
            _ => None,
        }
    }

    pub const fn as_onchain(&self) -> Option<&OnchainReport> {
        match self {
            Self::Onchain(r) => Some(r),
            _ => None,
        }
    }

    pub const fn as_structure(&self) -> Option<&StructureReport> {
        match self {
            Self::MarketStructure(r) => Some(r),
            _ => None,
        }
    }
}

/// Counts how many labels fall into the positive and negative sets and
/// returns `positive`, `negative` or `neutral` for the majority.
pub(crate) fn majority_label<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    positive: &[&str],
    negative: &[&str],
) -> &'static str {
    let (mut pos, mut neg) = (0usize, 0usize);
    for label in labels {
        if positive.contains(&label) {
            pos += 1;
        } else if negative.contains(&label) {
            neg += 1;
        }
    }
    match pos.cmp(&neg) {
        std::cmp::Ordering::Greater => "positive",
        std::cmp::Ordering::Less => "negative",
        std::cmp::Ordering::Equal => "neutral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::ResearchQuery;

    fn ctx() -> ResearchContext {
        ResearchContext::new(&ResearchQuery {
            query: "How are macro conditions shaping bitcoin?".into(),
            assets: None,
        })
    }

    #[test]
    fn test_default_analyzers_cover_every_analysis_phase() {
        let phases: Vec<_> = default_analyzers().iter().map(|a| a.phase()).collect();
        assert_eq!(phases, ResearchPhase::ANALYSIS.to_vec());
    }

    #[test]
    fn test_reports_match_their_analyzer_phase() {
        let ctx = ctx();
        for analyzer in default_analyzers() {
            let report = analyzer.analyze(&ctx).unwrap();
            assert_eq!(report.phase(), analyzer.phase());
            assert_eq!(report.confidence(), Confidence::Moderate);
        }
    }

    #[test]
    fn test_majority_label() {
        let pos = ["up"];
        let neg = ["down"];
        assert_eq!(majority_label(["up", "up", "down"], &pos, &neg), "positive");
        assert_eq!(majority_label(["down", "flat"], &pos, &neg), "negative");
        assert_eq!(majority_label(["up", "down"], &pos, &neg), "neutral");
        assert_eq!(majority_label([], &pos, &neg), "neutral");
    }
}
