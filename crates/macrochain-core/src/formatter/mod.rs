//! Report Formatter
//!
//! Reshapes a [`PipelineReport`] into the professional research report served
//! by `/research`, and condenses that report into the `/analyze` response.
//! Lists are cut to their top entries; a phase with no report renders as a
//! section error instead of failing the whole report.

mod report;
mod response;

use crate::model::{title_case, Confidence, ResearchPhase};
use crate::pipeline::PipelineReport;
use crate::svckit::{MacroReport, OnchainReport, PhaseReport, SentimentReport, StructureReport};

pub use report::{
    ActivityTrends, ConditionSummary, ExecutionSummary, FearGreedSummary, HolderDynamics, InsightCategories,
    InsightEntry, InsightKind, KeyInsights, LiquiditySummary, MacroContext, MarketSentiment, MarketStructure,
    MetadataSummary, MonetaryPolicySummary, OnchainOverview, PhaseSummary, ReportHeader, ReportMetadata,
    ResearchFocus, ResearchReport, RiskCategories, RiskCategory, RiskFactor, RisksUncertainty, Section,
    SectionError, SentimentIndicators, SocialSummary, VolatilitySummary,
};
pub use response::{AnalysisResponse, AnalysisSections, MarketConditions};

pub const REPORT_TITLE: &str = "MACROCHAIN - CRYPTO MARKET RESEARCH REPORT";
pub const REPORT_VERSION: &str = "1.0";
pub const REPORT_CLASSIFICATION: &str = "EDUCATIONAL RESEARCH";

/// Maximum entries in the key insights section
pub const INSIGHT_LIMIT: usize = 10;
/// Maximum entries in the risk factor list
pub const RISK_FACTOR_LIMIT: usize = 15;

const MACRO_FACTOR_LIMIT: usize = 3;
const SENTIMENT_DRIVER_LIMIT: usize = 3;
const FEAR_GREED_NOTE_LIMIT: usize = 2;
const ONCHAIN_POINT_LIMIT: usize = 2;

const METHODOLOGY: &[&str] = &[
    "Multi-dimensional market analysis framework",
    "Macroeconomic context assessment",
    "Market sentiment and psychology evaluation",
    "On-chain metrics analysis",
    "Market structure and risk context examination",
    "Cross-correlation synthesis",
];

const ANALYTICAL_FRAMEWORK: &str = "Structured research pipeline with deterministic methodology";

const STANDARD_MARKET_RISKS: &[&str] = &[
    "Cryptocurrency market volatility and price fluctuations",
    "Regulatory uncertainty and policy changes",
    "Technology and security risks including hacks and vulnerabilities",
    "Liquidity risks and market manipulation potential",
    "Correlation risks with traditional financial markets",
];

const CONFIDENCE_CAVEATS: &[&str] = &[
    "Analysis based on educational frameworks, not real-time data",
    "Market conditions can change rapidly and unpredictably",
    "Historical patterns may not repeat in future conditions",
    "Multiple factors influence cryptocurrency market dynamics",
];

/// Disclaimer carried by every report and API response
pub const REPORT_DISCLAIMER: &str = "**DISCLAIMER**\n\n\
This research report is for **EDUCATIONAL AND INFORMATIONAL PURPOSES ONLY**. \
It does **NOT** constitute financial advice, investment recommendations, \
trading signals, or price predictions.\n\n\
**RISK WARNING:** Cryptocurrency markets are **HIGHLY VOLATILE AND RISKY**. \
Prices can fluctuate dramatically, and you may lose ALL of your invested capital.\n\n\
**NO INVESTMENT ADVICE:** This analysis is designed to help you UNDERSTAND market dynamics, \
NOT to tell you when to buy, sell, or hold any cryptocurrency.\n\n\
**DO YOUR OWN RESEARCH:** Always conduct your own thorough research and consult with \
qualified financial professionals before making any investment decisions.\n\n\
**PAST PERFORMANCE:** Past performance does not indicate future results. \
Historical patterns may not repeat in current or future market conditions.\n\n\
**MARKET UNCERTAINTY:** Cryptocurrency markets are inherently unpredictable and \
subject to numerous risks including regulatory changes, technological failures, \
and market manipulation.\n\n\
By reading this report, you acknowledge that you understand these risks and \
agree that this information is for educational purposes only.";

/// Builds research reports and API responses from pipeline output
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportFormatter;

impl ReportFormatter {
    pub const fn new() -> Self {
        Self
    }

    pub fn format_research_report(&self, report: &PipelineReport, query: &str) -> ResearchReport {
        tracing::info!(research_id = %report.research_metadata.research_id, "Formatting research report");

        let assets = title_case(&report.research_metadata.assets_analyzed.join(", "));

        let formatted = ResearchReport {
            report_header: header(report, query, &assets),
            research_focus: research_focus(query, &assets),
            macro_context: section(report, ResearchPhase::Macro, PhaseReport::as_macro, macro_context),
            market_sentiment: section(report, ResearchPhase::Sentiment, PhaseReport::as_sentiment, market_sentiment),
            onchain_overview: section(report, ResearchPhase::Onchain, PhaseReport::as_onchain, onchain_overview),
            market_structure: section(
                report,
                ResearchPhase::MarketStructure,
                PhaseReport::as_structure,
                market_structure,
            ),
            key_insights: key_insights(report),
            risks_uncertainty: risks_uncertainty(report),
            disclaimer: REPORT_DISCLAIMER,
            report_metadata: report_metadata(report),
        };

        tracing::debug!(
            insights = formatted.key_insights.insights.len(),
            risk_factors = formatted.risks_uncertainty.risk_factors.len(),
            "Research report formatted"
        );
        formatted
    }

    /// Condense a research report into the `/analyze` response body
    pub fn to_api_response(&self, research: &ResearchReport, report: &PipelineReport, query: &str) -> AnalysisResponse {
        let state = &report.research_findings.overall_market_state;

        AnalysisResponse {
            query: query.to_string(),
            timestamp: research.report_header.publication_date.clone(),
            summary: format!(
                "{} - {}",
                research.report_header.title, research.research_focus.research_objective
            ),
            market_conditions: MarketConditions {
                overall_state: state.overall_state,
                key_factors: state.dominant_factors.clone(),
                confidence_level: state.state_confidence,
            },
            analysis_sections: AnalysisSections {
                macroeconomic: research.macro_context.clone(),
                sentiment: research.market_sentiment.clone(),
                onchain: research.onchain_overview.clone(),
                market_structure: research.market_structure.clone(),
            },
            key_insights: research
                .key_insights
                .insights
                .iter()
                .map(|entry| entry.insight.clone())
                .collect(),
            risk_factors: research
                .risks_uncertainty
                .risk_factors
                .iter()
                .map(|factor| factor.risk.clone())
                .collect(),
            educational_context: research.research_focus.methodology.join("\n"),
            disclaimer: research.disclaimer,
            metadata: research.report_metadata.clone(),
        }
    }
}

fn header(report: &PipelineReport, query: &str, assets: &str) -> ReportHeader {
    ReportHeader {
        title: REPORT_TITLE,
        subtitle: format!("Analysis of {assets} Markets"),
        research_query: query.to_string(),
        publication_date: report.research_metadata.timestamp.clone(),
        report_id: report.research_metadata.research_id,
        version: REPORT_VERSION,
        classification: REPORT_CLASSIFICATION,
    }
}

fn research_focus(query: &str, assets: &str) -> ResearchFocus {
    ResearchFocus {
        research_objective: format!(
            "Comprehensive analysis of {assets} market dynamics based on query: '{query}'"
        ),
        methodology: METHODOLOGY,
        scope: format!("Analysis covers {assets} with focus on educational market understanding"),
        analytical_framework: ANALYTICAL_FRAMEWORK,
        time_horizon: "Current market conditions with educational context",
    }
}

/// Render `phase` with `build`, or a section error if it has no usable report
fn section<R, T>(
    report: &PipelineReport,
    phase: ResearchPhase,
    pick: fn(&PhaseReport) -> Option<&R>,
    build: fn(&R, Confidence) -> T,
) -> Section<T> {
    let completed = report
        .phase(phase)
        .and_then(|result| pick(result.report()?).map(|r| (r, result.confidence)));

    match completed {
        Some((r, confidence)) => Section::Available(build(r, confidence)),
        None => {
            tracing::debug!(phase = phase.as_str(), "Phase data unavailable, rendering section error");
            Section::Unavailable(SectionError::for_phase(phase))
        }
    }
}

fn macro_context(report: &MacroReport, confidence: Confidence) -> MacroContext {
    let liquidity = &report.liquidity_conditions;
    let rates = &report.interest_rate_environment;
    let overall = &report.overall_conditions;

    let mut key_observations = vec![
        format!("Global liquidity conditions appear {}", liquidity.overall_status),
        format!("Interest rate environment presents {} implications", rates.implications.overall),
        format!("Overall macroeconomic conditions assessed as {}", overall.overall.as_str()),
    ];
    key_observations.extend(
        overall
            .key_drivers
            .iter()
            .take(MACRO_FACTOR_LIMIT)
            .map(|factor| format!("Key factor: {factor}")),
    );

    MacroContext {
        section_title: "MACRO CONTEXT",
        overall_assessment: overall.overall,
        key_observations,
        liquidity_analysis: LiquiditySummary {
            status: liquidity.overall_status,
            trend: liquidity.trend,
            key_considerations: liquidity.key_observations,
        },
        monetary_policy_context: MonetaryPolicySummary {
            implications: rates.implications.overall,
            trend: rates.trend,
            key_considerations: rates.educational_context,
        },
        risk_considerations: report.educational_notes,
        confidence_level: confidence,
    }
}

fn market_sentiment(report: &SentimentReport, confidence: Confidence) -> MarketSentiment {
    let overall = &report.overall_sentiment;
    let fear_greed = &report.fear_greed_index;
    let social = &report.social_media_sentiment;

    let mut psychological_factors = vec![
        format!("Overall market sentiment assessed as {}", overall.overall_sentiment),
        format!("Fear & Greed indicators show {} sentiment", fear_greed.sentiment_level.as_str()),
        format!("Social media sentiment appears {}", social.overall_social_sentiment),
    ];
    psychological_factors.extend(
        overall
            .key_drivers
            .iter()
            .take(SENTIMENT_DRIVER_LIMIT)
            .map(|driver| format!("Driver: {driver}")),
    );

    MarketSentiment {
        section_title: "MARKET SENTIMENT",
        overall_assessment: overall.overall_sentiment,
        sentiment_indicators: SentimentIndicators {
            fear_greed_index: FearGreedSummary {
                level: fear_greed.sentiment_level.as_str(),
                interpretation: fear_greed
                    .educational_notes
                    .iter()
                    .take(FEAR_GREED_NOTE_LIMIT)
                    .copied()
                    .collect(),
            },
            social_media: SocialSummary {
                overall: social.overall_social_sentiment,
                volume_trends: social.volume_trends,
            },
            news_sentiment: report.news_sentiment.media_bias_analysis.clone(),
        },
        psychological_factors,
        contrarian_signals: overall.contrarian_signals.clone(),
        confidence_level: confidence,
    }
}

fn onchain_overview(report: &OnchainReport, confidence: Confidence) -> OnchainOverview {
    let conditions = &report.network_conditions;
    let activity = &report.network_activity;
    let holders = &report.holder_behavior;

    let mut fundamental_indicators = vec![
        format!("Network health assessed as {}", conditions.overall_status),
        format!("Network activity shows {} trend", activity.overall_activity.trend),
        format!(
            "Long-term holder behavior indicates {}",
            holders.behavioral_insights.long_term_trend
        ),
    ];
    fundamental_indicators.extend(
        conditions
            .strengths
            .iter()
            .take(ONCHAIN_POINT_LIMIT)
            .map(|s| format!("Strength: {s}")),
    );
    fundamental_indicators.extend(
        conditions
            .concerns
            .iter()
            .take(ONCHAIN_POINT_LIMIT)
            .map(|c| format!("Concern: {c}")),
    );

    OnchainOverview {
        section_title: "ON-CHAIN OVERVIEW",
        network_health: conditions.overall_status,
        activity_trends: ActivityTrends {
            overall_trend: activity.overall_activity.trend,
            growth_indicators: activity.growth_indicators,
            usage_patterns: activity.usage_patterns.clone(),
        },
        holder_dynamics: HolderDynamics {
            distribution_trends: holders.behavioral_insights.clone(),
            market_maturity: holders.market_maturity,
            risk_indicators: holders.risk_indicators,
        },
        fundamental_indicators,
        network_efficiency: report.transaction_metrics.efficiency_metrics.clone(),
        confidence_level: confidence,
    }
}

fn market_structure(report: &StructureReport, confidence: Confidence) -> MarketStructure {
    let assessment = &report.structure_assessment;
    let phase = &report.market_phase;
    let volatility = &report.volatility_regime;
    let liquidity = &report.liquidity_conditions;

    let structural_assessment = vec![
        format!("Market structure quality assessed as {}", assessment.structure_quality),
        format!("Current market phase identified as {}", phase.current_phase.as_str()),
        format!("Volatility regime classified as {}", volatility.current_regime.as_str()),
        format!("Liquidity conditions are {}", liquidity.current_condition.as_str()),
        format!("Overall structural risk context: {}", assessment.risk_context.overall_risk),
    ];

    MarketStructure {
        section_title: "MARKET STRUCTURE",
        structure_quality: assessment.structure_quality,
        market_phase: PhaseSummary {
            current_phase: phase.current_phase,
            confidence: phase.phase_confidence,
            characteristics: phase.phase_characteristics,
            transition_risks: phase.transition_risks.clone(),
        },
        volatility_regime: VolatilitySummary {
            current_regime: volatility.current_regime,
            stability: volatility.regime_stability,
            characteristics: volatility.regime_characteristics,
            risk_implications: volatility.risk_implications.clone(),
        },
        liquidity_analysis: ConditionSummary {
            condition: liquidity.current_condition,
            stability: liquidity.condition_stability,
            characteristics: liquidity.condition_characteristics,
            execution_considerations: liquidity.execution_considerations.clone(),
        },
        structural_assessment,
        risk_context: assessment.risk_context.clone(),
        confidence_level: confidence,
    }
}

fn key_insights(report: &PipelineReport) -> KeyInsights {
    let findings = &report.research_findings;

    let correlations = findings.cross_phase_correlations.iter().map(|c| InsightEntry {
        kind: InsightKind::CrossPhaseCorrelation,
        insight: c.observation.to_string(),
        strength: c.strength,
        phases: c.phases.to_vec(),
    });
    let synthesis = findings.key_insights.iter().map(|insight| InsightEntry {
        kind: InsightKind::KeyInsight,
        insight: insight.clone(),
        strength: "moderate",
        phases: vec![ResearchPhase::Synthesis.as_str()],
    });
    let factors = findings
        .overall_market_state
        .dominant_factors
        .iter()
        .map(|factor| InsightEntry {
            kind: InsightKind::MarketStateFactor,
            insight: factor.clone(),
            strength: "moderate",
            phases: vec![ResearchPhase::Synthesis.as_str()],
        });

    let all: Vec<InsightEntry> = correlations.chain(synthesis).chain(factors).collect();

    let mut categories = InsightCategories::default();
    for entry in &all {
        match entry.kind {
            InsightKind::CrossPhaseCorrelation => categories.cross_phase_correlations += 1,
            InsightKind::KeyInsight => categories.synthesis_insights += 1,
            InsightKind::MarketStateFactor => categories.market_state_factors += 1,
        }
    }

    KeyInsights {
        section_title: "KEY INSIGHTS",
        total_insights: all.len(),
        insight_categories: categories,
        insights: all.into_iter().take(INSIGHT_LIMIT).collect(),
        confidence_level: findings.confidence_level,
        research_quality: findings.research_quality.clone(),
    }
}

fn risks_uncertainty(report: &PipelineReport) -> RisksUncertainty {
    let tagged = report
        .limitations
        .iter()
        .map(|l| (RiskCategory::MethodologicalLimitation, l.clone()))
        .chain(
            report
                .assumptions
                .iter()
                .map(|a| (RiskCategory::AnalyticalAssumption, a.clone())),
        )
        .chain(
            STANDARD_MARKET_RISKS
                .iter()
                .map(|r| (RiskCategory::MarketRisk, (*r).to_string())),
        );

    let mut categories = RiskCategories::default();
    let mut risk_factors = Vec::with_capacity(RISK_FACTOR_LIMIT);
    for (category, risk) in tagged {
        match category {
            RiskCategory::MethodologicalLimitation => categories.methodological_limitations += 1,
            RiskCategory::AnalyticalAssumption => categories.analytical_assumptions += 1,
            RiskCategory::MarketRisk => categories.market_risks += 1,
        }
        if risk_factors.len() < RISK_FACTOR_LIMIT {
            risk_factors.push(RiskFactor {
                category,
                risk,
                mitigation: category.mitigation(),
            });
        }
    }

    RisksUncertainty {
        section_title: "KEY RISKS & UNCERTAINTY",
        risk_categories: categories,
        risk_factors,
        uncertainty_level: Confidence::ModerateToHigh,
        research_limitations: report.limitations.clone(),
        key_assumptions: report.assumptions.clone(),
        confidence_caveats: CONFIDENCE_CAVEATS,
    }
}

fn report_metadata(report: &PipelineReport) -> ReportMetadata {
    let meta = &report.research_metadata;
    let execution = &report.pipeline_execution;

    ReportMetadata {
        research_metadata: MetadataSummary {
            report_id: meta.research_id,
            query: meta.query.clone(),
            assets_analyzed: meta.assets_analyzed.clone(),
            timestamp: meta.timestamp.clone(),
            execution_time_seconds: meta.total_execution_time,
            pipeline_version: meta.pipeline_version,
        },
        execution_summary: ExecutionSummary {
            phases_completed: execution.phases_completed,
            total_phases: execution.total_phases,
            success_rate: success_rate(execution.phases_completed, execution.total_phases),
        },
        quality_metrics: report.research_findings.research_quality.clone(),
        data_sources: "Educational and conceptual frameworks",
        analytical_approach: ANALYTICAL_FRAMEWORK,
        report_classification: "EDUCATIONAL RESEARCH - NOT FINANCIAL ADVICE",
    }
}

#[allow(clippy::cast_precision_loss)]
fn success_rate(completed: usize, total: usize) -> String {
    let rate = completed as f64 / total.max(1) as f64 * 100.0;
    format!("{rate:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::intake::AnalysisRequest;
    use crate::pipeline::ResearchPipeline;

    fn run(config: AnalysisConfig, query: &str) -> PipelineReport {
        let request = AnalysisRequest::new(query);
        let validated = request.validate(&config.limits).unwrap();
        ResearchPipeline::new(config).execute(&validated).unwrap()
    }

    fn full_report() -> (PipelineReport, ResearchReport) {
        let pipeline = run(AnalysisConfig::default(), "bitcoin market outlook");
        let research = ReportFormatter::new().format_research_report(&pipeline, "bitcoin market outlook");
        (pipeline, research)
    }

    #[test]
    fn test_header_and_focus() {
        let (pipeline, research) = full_report();
        let header = &research.report_header;

        assert_eq!(header.title, REPORT_TITLE);
        assert_eq!(header.subtitle, "Analysis of Bitcoin, Ethereum Markets");
        assert_eq!(header.report_id, pipeline.research_metadata.research_id);
        assert_eq!(header.publication_date, pipeline.research_metadata.timestamp);
        assert_eq!(
            research.research_focus.research_objective,
            "Comprehensive analysis of Bitcoin, Ethereum market dynamics based on query: 'bitcoin market outlook'"
        );
        assert_eq!(research.research_focus.methodology.len(), 6);
    }

    #[test]
    fn test_phase_sections() {
        let (_, research) = full_report();

        let macro_ctx = research.macro_context.available().unwrap();
        assert_eq!(
            macro_ctx.key_observations,
            vec![
                "Global liquidity conditions appear neutral",
                "Interest rate environment presents neutral implications",
                "Overall macroeconomic conditions assessed as supportive",
            ]
        );

        let sentiment = research.market_sentiment.available().unwrap();
        assert_eq!(sentiment.sentiment_indicators.fear_greed_index.interpretation.len(), 2);
        assert_eq!(sentiment.psychological_factors[1], "Fear & Greed indicators show neutral sentiment");

        let onchain = research.onchain_overview.available().unwrap();
        assert!(onchain
            .fundamental_indicators
            .contains(&"Long-term holder behavior indicates accumulation".to_string()));

        let structure = research.market_structure.available().unwrap();
        assert_eq!(structure.structural_assessment.len(), 5);
        assert_eq!(structure.confidence_level, Confidence::Moderate);
    }

    #[test]
    fn test_skipped_phase_renders_section_error() {
        let config = AnalysisConfig {
            enable_onchain: false,
            ..AnalysisConfig::default()
        };
        let pipeline = run(config, "ethereum network health");
        let research = ReportFormatter::new().format_research_report(&pipeline, "ethereum network health");

        let Section::Unavailable(err) = &research.onchain_overview else {
            panic!("expected section error");
        };
        assert_eq!(err.section_title, "ON-CHAIN ANALYSIS");
        assert_eq!(err.message, "On-Chain Analysis data unavailable");
        assert_eq!(err.status, "section_failed");
        assert_eq!(err.confidence_level, Confidence::Low);
        assert!(!research.macro_context.is_unavailable());

        let value = serde_json::to_value(&research.onchain_overview).unwrap();
        assert_eq!(value["error"], true);
    }

    #[test]
    fn test_key_insights_ordering() {
        let (_, research) = full_report();
        let insights = &research.key_insights;

        assert_eq!(
            insights.insight_categories,
            InsightCategories {
                cross_phase_correlations: 1,
                market_state_factors: 2,
                synthesis_insights: 2,
            }
        );
        assert_eq!(insights.total_insights, 5);
        assert_eq!(insights.insights[0].kind, InsightKind::CrossPhaseCorrelation);
        assert_eq!(
            insights.insights[0].insight,
            "Neutral sentiment coincides with range-bound market structure"
        );
        assert_eq!(insights.insights[4].insight, "Onchain: positive");
        assert_eq!(insights.insights[4].phases, vec!["synthesis"]);
    }

    #[test]
    fn test_risks_truncated() {
        let (pipeline, research) = full_report();
        let risks = &research.risks_uncertainty;

        assert_eq!(risks.risk_factors.len(), RISK_FACTOR_LIMIT);
        assert_eq!(
            risks.risk_categories,
            RiskCategories {
                methodological_limitations: pipeline.limitations.len(),
                analytical_assumptions: pipeline.assumptions.len(),
                market_risks: 5,
            }
        );
        assert_eq!(risks.risk_factors[0].category, RiskCategory::MethodologicalLimitation);
        assert_eq!(risks.risk_factors[0].mitigation, "Recognize limitation in interpretation");
        assert_eq!(risks.uncertainty_level, Confidence::ModerateToHigh);
        assert_eq!(risks.confidence_caveats.len(), 4);
    }

    #[test]
    fn test_metadata_success_rate() {
        let (_, research) = full_report();
        assert_eq!(research.report_metadata.execution_summary.success_rate, "100.0%");
        assert_eq!(success_rate(4, 5), "80.0%");
        assert_eq!(success_rate(0, 0), "0.0%");
    }

    #[test]
    fn test_api_response() {
        let (pipeline, research) = full_report();
        let response = ReportFormatter::new().to_api_response(&research, &pipeline, "bitcoin market outlook");

        assert_eq!(response.query, "bitcoin market outlook");
        assert!(response.summary.starts_with("MACROCHAIN - CRYPTO MARKET RESEARCH REPORT - "));
        assert_eq!(response.market_conditions.overall_state, "positive");
        assert_eq!(response.market_conditions.key_factors, vec!["Macro: supportive", "Onchain: positive"]);
        assert_eq!(response.key_insights.len(), 5);
        assert_eq!(response.risk_factors.len(), RISK_FACTOR_LIMIT);
        assert_eq!(response.educational_context.lines().count(), 6);
        assert_eq!(response.disclaimer, REPORT_DISCLAIMER);

        let value = serde_json::to_value(&response).unwrap();
        for key in [
            "query",
            "timestamp",
            "summary",
            "market_conditions",
            "analysis_sections",
            "key_insights",
            "risk_factors",
            "educational_context",
            "disclaimer",
            "metadata",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["analysis_sections"]["macroeconomic"]["section_title"], "MACRO CONTEXT");
    }
}
