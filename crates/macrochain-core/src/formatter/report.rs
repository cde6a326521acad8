//! Research report shapes

use serde::Serialize;
use uuid::Uuid;

use crate::model::{Characteristics, Confidence, ResearchPhase};
use crate::pipeline::ResearchQuality;
use crate::svckit::{
    EfficiencyMetrics, HolderPatterns, LiquidityCondition, MacroOverall, MarketPhase, MediaBiasAnalysis,
    StructureRiskContext, UsagePatterns, VolatilityRegime,
};

/// Full professional research report for one pipeline run
#[derive(Clone, Debug, Serialize)]
pub struct ResearchReport {
    pub report_header: ReportHeader,
    pub research_focus: ResearchFocus,
    pub macro_context: Section<MacroContext>,
    pub market_sentiment: Section<MarketSentiment>,
    pub onchain_overview: Section<OnchainOverview>,
    pub market_structure: Section<MarketStructure>,
    pub key_insights: KeyInsights,
    pub risks_uncertainty: RisksUncertainty,
    pub disclaimer: &'static str,
    pub report_metadata: ReportMetadata,
}

/// A phase section, or the placeholder rendered when its phase produced nothing
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Section<T> {
    Available(T),
    Unavailable(SectionError),
}

impl<T> Section<T> {
    pub const fn available(&self) -> Option<&T> {
        match self {
            Self::Available(section) => Some(section),
            Self::Unavailable(_) => None,
        }
    }

    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionError {
    pub section_title: String,
    pub error: bool,
    pub message: String,
    pub status: &'static str,
    pub confidence_level: Confidence,
}

impl SectionError {
    pub fn for_phase(phase: ResearchPhase) -> Self {
        let name = format!("{} Analysis", phase.display_name());
        Self {
            section_title: name.to_uppercase(),
            error: true,
            message: format!("{name} data unavailable"),
            status: "section_failed",
            confidence_level: Confidence::Low,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ReportHeader {
    pub title: &'static str,
    pub subtitle: String,
    pub research_query: String,
    pub publication_date: String,
    pub report_id: Uuid,
    pub version: &'static str,
    pub classification: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResearchFocus {
    pub research_objective: String,
    pub methodology: &'static [&'static str],
    pub scope: String,
    pub analytical_framework: &'static str,
    pub time_horizon: &'static str,
}

// ============================================================================
// Phase sections
// ============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct MacroContext {
    pub section_title: &'static str,
    pub overall_assessment: MacroOverall,
    pub key_observations: Vec<String>,
    pub liquidity_analysis: LiquiditySummary,
    pub monetary_policy_context: MonetaryPolicySummary,
    pub risk_considerations: &'static [&'static str],
    pub confidence_level: Confidence,
}

#[derive(Clone, Debug, Serialize)]
pub struct LiquiditySummary {
    pub status: &'static str,
    pub trend: &'static str,
    pub key_considerations: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct MonetaryPolicySummary {
    pub implications: &'static str,
    pub trend: &'static str,
    pub key_considerations: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct MarketSentiment {
    pub section_title: &'static str,
    pub overall_assessment: &'static str,
    pub sentiment_indicators: SentimentIndicators,
    pub psychological_factors: Vec<String>,
    pub contrarian_signals: Vec<String>,
    pub confidence_level: Confidence,
}

#[derive(Clone, Debug, Serialize)]
pub struct SentimentIndicators {
    pub fear_greed_index: FearGreedSummary,
    pub social_media: SocialSummary,
    pub news_sentiment: MediaBiasAnalysis,
}

#[derive(Clone, Debug, Serialize)]
pub struct FearGreedSummary {
    pub level: &'static str,
    pub interpretation: Vec<&'static str>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SocialSummary {
    pub overall: &'static str,
    pub volume_trends: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct OnchainOverview {
    pub section_title: &'static str,
    pub network_health: &'static str,
    pub activity_trends: ActivityTrends,
    pub holder_dynamics: HolderDynamics,
    pub fundamental_indicators: Vec<String>,
    pub network_efficiency: EfficiencyMetrics,
    pub confidence_level: Confidence,
}

#[derive(Clone, Debug, Serialize)]
pub struct ActivityTrends {
    pub overall_trend: &'static str,
    pub growth_indicators: &'static [&'static str],
    pub usage_patterns: UsagePatterns,
}

#[derive(Clone, Debug, Serialize)]
pub struct HolderDynamics {
    pub distribution_trends: HolderPatterns,
    pub market_maturity: &'static str,
    pub risk_indicators: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct MarketStructure {
    pub section_title: &'static str,
    pub structure_quality: &'static str,
    pub market_phase: PhaseSummary,
    pub volatility_regime: VolatilitySummary,
    pub liquidity_analysis: ConditionSummary,
    pub structural_assessment: Vec<String>,
    pub risk_context: StructureRiskContext,
    pub confidence_level: Confidence,
}

#[derive(Clone, Debug, Serialize)]
pub struct PhaseSummary {
    pub current_phase: MarketPhase,
    pub confidence: Confidence,
    pub characteristics: Characteristics,
    pub transition_risks: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct VolatilitySummary {
    pub current_regime: VolatilityRegime,
    pub stability: &'static str,
    pub characteristics: Characteristics,
    pub risk_implications: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConditionSummary {
    pub condition: LiquidityCondition,
    pub stability: &'static str,
    pub characteristics: Characteristics,
    pub execution_considerations: Vec<String>,
}

// ============================================================================
// Insights & risks
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    CrossPhaseCorrelation,
    KeyInsight,
    MarketStateFactor,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InsightEntry {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub insight: String,
    pub strength: &'static str,
    pub phases: Vec<&'static str>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InsightCategories {
    pub cross_phase_correlations: usize,
    pub market_state_factors: usize,
    pub synthesis_insights: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct KeyInsights {
    pub section_title: &'static str,
    /// Count before truncation
    pub total_insights: usize,
    pub insight_categories: InsightCategories,
    pub insights: Vec<InsightEntry>,
    pub confidence_level: Confidence,
    pub research_quality: ResearchQuality,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    MethodologicalLimitation,
    AnalyticalAssumption,
    MarketRisk,
}

impl RiskCategory {
    pub const fn mitigation(self) -> &'static str {
        match self {
            Self::MethodologicalLimitation => "Recognize limitation in interpretation",
            Self::AnalyticalAssumption => "Validate assumption with additional research",
            Self::MarketRisk => "Comprehensive risk management and diversification",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RiskFactor {
    pub category: RiskCategory,
    pub risk: String,
    pub mitigation: &'static str,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RiskCategories {
    pub methodological_limitations: usize,
    pub analytical_assumptions: usize,
    pub market_risks: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct RisksUncertainty {
    pub section_title: &'static str,
    pub risk_categories: RiskCategories,
    pub risk_factors: Vec<RiskFactor>,
    pub uncertainty_level: Confidence,
    pub research_limitations: Vec<String>,
    pub key_assumptions: Vec<String>,
    pub confidence_caveats: &'static [&'static str],
}

// ============================================================================
// Metadata
// ============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct ReportMetadata {
    pub research_metadata: MetadataSummary,
    pub execution_summary: ExecutionSummary,
    pub quality_metrics: ResearchQuality,
    pub data_sources: &'static str,
    pub analytical_approach: &'static str,
    pub report_classification: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct MetadataSummary {
    pub report_id: Uuid,
    pub query: String,
    pub assets_analyzed: Vec<String>,
    pub timestamp: String,
    pub execution_time_seconds: f64,
    pub pipeline_version: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExecutionSummary {
    pub phases_completed: usize,
    pub total_phases: usize,
    /// Percentage with one decimal, e.g. `"100.0%"`
    pub success_rate: String,
}
