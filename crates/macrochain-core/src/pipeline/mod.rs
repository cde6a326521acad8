//! Research Pipeline
//!
//! Runs the enabled analysis phases in fixed order, then synthesis, and
//! compiles the result into a [`PipelineReport`]. A failing phase is recorded
//! and the run carries on.

mod synthesis;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::intake::ResearchQuery;
use crate::model::{
    Confidence, PhaseOutcome, PhaseResult, PhaseStatus, ResearchContext, ResearchPhase,
    PIPELINE_VERSION,
};
use crate::svckit::{default_analyzers, PhaseAnalyzer};

pub use synthesis::{synthesize, Correlation, MarketState, ResearchFindings, ResearchQuality, KEY_INSIGHT_LIMIT};

/// Disclaimer attached to every pipeline report
pub const RESEARCH_DISCLAIMER: &str = "This research report is for educational and informational purposes only. \
It does not constitute financial advice, investment recommendations, or trading signals. \
Cryptocurrency markets are highly volatile and risky. Always conduct your own research \
and consult with qualified financial professionals before making any investment decisions.";

/// Analysis phases plus synthesis
pub const TOTAL_PHASES: usize = ResearchPhase::ANALYSIS.len() + 1;

/// Sequential multi-phase research pipeline
pub struct ResearchPipeline {
    analyzers: Vec<Arc<dyn PhaseAnalyzer>>,
    config: AnalysisConfig,
}

impl ResearchPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_analyzers(config, default_analyzers())
    }

    /// Build a pipeline over a custom analyzer set. Phases with no analyzer
    /// registered are recorded as failed.
    pub fn with_analyzers(config: AnalysisConfig, analyzers: Vec<Arc<dyn PhaseAnalyzer>>) -> Self {
        Self { analyzers, config }
    }

    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn analyzer(&self, phase: ResearchPhase) -> Option<&Arc<dyn PhaseAnalyzer>> {
        self.analyzers.iter().find(|a| a.phase() == phase)
    }

    /// Run the pipeline for a validated query
    pub fn execute(&self, query: &ResearchQuery) -> Result<PipelineReport> {
        if !ResearchPhase::ANALYSIS.iter().any(|p| self.config.is_enabled(*p)) {
            return Err(AnalysisError::Pipeline("no analysis phases are enabled".into()));
        }

        let ctx = ResearchContext::new(query);
        tracing::info!(
            research_id = %ctx.research_id,
            assets = ?ctx.assets,
            "Starting research pipeline"
        );

        let started = Instant::now();
        let mut results = Vec::with_capacity(ResearchPhase::ANALYSIS.len());

        for phase in ResearchPhase::ANALYSIS {
            let result = self.run_phase(phase, &ctx);
            tracing::info!(
                research_id = %ctx.research_id,
                phase = phase.as_str(),
                status = ?result.outcome.status(),
                "Completed phase"
            );
            results.push(result);
        }

        let synthesis_started = Instant::now();
        let findings = synthesize(&results);
        let synthesis_detail = PhaseDetail {
            execution_time: synthesis_started.elapsed().as_secs_f64(),
            confidence: findings.confidence_level,
            status: PhaseStatus::Success,
        };

        let total_execution_time = started.elapsed().as_secs_f64();
        tracing::info!(
            research_id = %ctx.research_id,
            elapsed_secs = total_execution_time,
            "Research pipeline completed"
        );

        Ok(PipelineReport::compile(ctx, results, synthesis_detail, findings, total_execution_time))
    }

    fn run_phase(&self, phase: ResearchPhase, ctx: &ResearchContext) -> PhaseResult {
        if !self.config.is_enabled(phase) {
            tracing::debug!(phase = phase.as_str(), "Phase disabled, skipping");
            return PhaseResult::skipped(phase);
        }

        let started = Instant::now();
        let Some(analyzer) = self.analyzer(phase) else {
            tracing::error!(phase = phase.as_str(), "No analyzer registered");
            return PhaseResult::failed(phase, "no analyzer registered", 0.0);
        };

        match analyzer.analyze(ctx) {
            Ok(report) if report.phase() == phase => {
                PhaseResult::completed(report, started.elapsed().as_secs_f64())
            }
            Ok(report) => {
                let message = format!("analyzer returned a {} report", report.phase());
                tracing::error!(phase = phase.as_str(), %message, "Phase produced the wrong report");
                PhaseResult::failed(phase, message, started.elapsed().as_secs_f64())
            }
            Err(e) => {
                tracing::warn!(phase = phase.as_str(), error = %e, "Phase failed");
                let message = match e {
                    AnalysisError::PhaseFailed { message, .. } => message,
                    other => other.to_string(),
                };
                PhaseResult::failed(phase, message, started.elapsed().as_secs_f64())
            }
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Everything one pipeline run produced
#[derive(Clone, Debug, Serialize)]
pub struct PipelineReport {
    pub research_metadata: ResearchMetadata,
    pub pipeline_execution: PipelineExecution,
    pub research_findings: ResearchFindings,
    #[serde(rename = "phase_results", serialize_with = "serialize_outcomes")]
    pub phases: Vec<PhaseResult>,
    pub research_quality: ResearchQuality,
    pub assumptions: Vec<String>,
    pub limitations: Vec<String>,
    pub disclaimer: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResearchMetadata {
    pub research_id: Uuid,
    pub query: String,
    pub assets_analyzed: Vec<String>,
    pub timestamp: String,
    pub total_execution_time: f64,
    pub pipeline_version: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct PipelineExecution {
    pub phases_completed: usize,
    pub total_phases: usize,
    pub phase_details: BTreeMap<ResearchPhase, PhaseDetail>,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PhaseDetail {
    pub execution_time: f64,
    pub confidence: Confidence,
    pub status: PhaseStatus,
}

fn serialize_outcomes<S: Serializer>(phases: &[PhaseResult], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(phases.iter().map(|r| (r.phase, &r.outcome)))
}

impl PipelineReport {
    fn compile(
        ctx: ResearchContext,
        phases: Vec<PhaseResult>,
        synthesis: PhaseDetail,
        findings: ResearchFindings,
        total_execution_time: f64,
    ) -> Self {
        let mut phase_details: BTreeMap<_, _> = phases
            .iter()
            .map(|r| {
                let detail = PhaseDetail {
                    execution_time: r.execution_time,
                    confidence: r.confidence,
                    status: r.outcome.status(),
                };
                (r.phase, detail)
            })
            .collect();
        phase_details.insert(ResearchPhase::Synthesis, synthesis);

        let phases_completed = phase_details
            .values()
            .filter(|d| d.status == PhaseStatus::Success)
            .count();

        Self {
            research_metadata: ResearchMetadata {
                research_id: ctx.research_id,
                timestamp: ctx.timestamp_string(),
                query: ctx.query,
                assets_analyzed: ctx.assets,
                total_execution_time,
                pipeline_version: PIPELINE_VERSION,
            },
            pipeline_execution: PipelineExecution {
                phases_completed,
                total_phases: TOTAL_PHASES,
                phase_details,
            },
            research_quality: findings.research_quality.clone(),
            assumptions: findings.assumptions.clone(),
            limitations: findings.limitations.clone(),
            research_findings: findings,
            phases,
            disclaimer: RESEARCH_DISCLAIMER,
        }
    }

    pub fn phase(&self, phase: ResearchPhase) -> Option<&PhaseResult> {
        self.phases.iter().find(|r| r.phase == phase)
    }

    pub fn outcome(&self, phase: ResearchPhase) -> Option<&PhaseOutcome> {
        self.phase(phase).map(|r| &r.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svckit::{MacroAnalyzer, MarketStructureAnalyzer, OnchainAnalyzer, PhaseReport};

    struct BrokenAnalyzer;

    impl PhaseAnalyzer for BrokenAnalyzer {
        fn phase(&self) -> ResearchPhase {
            ResearchPhase::Sentiment
        }

        fn analyze(&self, _ctx: &ResearchContext) -> Result<PhaseReport> {
            Err(AnalysisError::PhaseFailed {
                phase: ResearchPhase::Sentiment,
                message: "social feed unreachable".into(),
            })
        }
    }

    fn query() -> ResearchQuery {
        ResearchQuery {
            query: "Is the market risk-on right now?".into(),
            assets: None,
        }
    }

    #[test]
    fn test_full_run() {
        let report = ResearchPipeline::new(AnalysisConfig::default()).execute(&query()).unwrap();

        assert_eq!(report.pipeline_execution.phases_completed, 5);
        assert_eq!(report.pipeline_execution.total_phases, 5);
        assert_eq!(report.research_metadata.assets_analyzed, vec!["bitcoin", "ethereum"]);
        assert_eq!(report.research_metadata.pipeline_version, "1.0.0");
        assert_eq!(report.disclaimer, RESEARCH_DISCLAIMER);
        assert_eq!(report.assumptions, report.research_findings.assumptions);
        assert!(report.phases.iter().all(PhaseResult::succeeded));
    }

    #[test]
    fn test_failing_phase_does_not_abort() {
        let analyzers: Vec<Arc<dyn PhaseAnalyzer>> = vec![
            Arc::new(MacroAnalyzer::new()),
            Arc::new(BrokenAnalyzer),
            Arc::new(OnchainAnalyzer::new()),
            Arc::new(MarketStructureAnalyzer::new()),
        ];
        let pipeline = ResearchPipeline::with_analyzers(AnalysisConfig::default(), analyzers);
        let report = pipeline.execute(&query()).unwrap();

        let sentiment = report.phase(ResearchPhase::Sentiment).unwrap();
        assert!(!sentiment.succeeded());
        assert_eq!(sentiment.confidence, Confidence::Low);
        assert_eq!(
            sentiment.assumptions,
            vec!["Analysis failed: social feed unreachable"]
        );
        assert_eq!(sentiment.limitations, vec!["Phase execution error"]);

        assert_eq!(report.pipeline_execution.phases_completed, 4);
        assert_eq!(report.research_quality.completeness, "3/4 phases completed");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["phase_results"]["sentiment"]["error"], true);
        assert_eq!(value["pipeline_execution"]["phase_details"]["sentiment"]["status"], "failed");
    }

    #[test]
    fn test_disabled_phase_is_skipped() {
        let config = AnalysisConfig {
            enable_macro: false,
            ..AnalysisConfig::default()
        };
        let report = ResearchPipeline::new(config).execute(&query()).unwrap();

        assert!(matches!(report.outcome(ResearchPhase::Macro), Some(PhaseOutcome::Skipped)));
        assert_eq!(report.pipeline_execution.phases_completed, 4);
        assert_eq!(
            report.research_findings.overall_market_state.dominant_factors,
            vec!["Onchain: positive"]
        );

        let value = serde_json::to_value(&report).unwrap();
        assert!(value["phase_results"]["macro"].is_null());
        assert_eq!(value["pipeline_execution"]["phase_details"]["macro"]["status"], "skipped");
    }

    #[test]
    fn test_nothing_enabled_is_an_error() {
        let config = AnalysisConfig {
            enable_macro: false,
            enable_sentiment: false,
            enable_onchain: false,
            enable_market_structure: false,
            ..AnalysisConfig::default()
        };
        let err = ResearchPipeline::new(config).execute(&query()).unwrap_err();
        assert!(!err.is_validation());
    }

    #[test]
    fn test_identical_queries_give_identical_findings() {
        let pipeline = ResearchPipeline::new(AnalysisConfig::default());
        let a = serde_json::to_value(pipeline.execute(&query()).unwrap().research_findings).unwrap();
        let b = serde_json::to_value(pipeline.execute(&query()).unwrap().research_findings).unwrap();
        assert_eq!(a, b);
    }
}
