//! Cross-Phase Synthesis
//!
//! Folds the four phase results into one set of findings: merged insights,
//! rule-based correlations, an overall market state, research quality and
//! an averaged confidence.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::model::{title_case, Confidence, PhaseResult, ResearchPhase};
use crate::svckit::{MarketPhase, PhaseReport};

/// Number of insights carried into `key_insights`
pub const KEY_INSIGHT_LIMIT: usize = 10;

const ANALYSIS_PHASE_COUNT: usize = ResearchPhase::ANALYSIS.len();

const POSITIVE_STATES: &[&str] = &["positive", "supportive", "strong"];
const NEGATIVE_STATES: &[&str] = &["negative", "challenging", "weak"];

const BASE_ASSUMPTIONS: &[&str] = &[
    "Analysis is based on conceptual and educational frameworks",
    "Market conditions are dynamic and may change rapidly",
    "Historical patterns may not repeat in future conditions",
    "Multiple factors influence cryptocurrency market dynamics",
];

const BASE_LIMITATIONS: &[&str] = &[
    "Analysis does not use real-time market data",
    "Educational focus limits predictive capabilities",
    "Market complexity exceeds analytical frameworks",
    "Unforeseen events can invalidate current analysis",
];

/// Output of the synthesis phase
#[derive(Clone, Debug, Serialize)]
pub struct ResearchFindings {
    pub synthesis_type: &'static str,
    /// Insight count before truncation
    pub total_insights: usize,
    pub key_insights: Vec<String>,
    pub cross_phase_correlations: Vec<Correlation>,
    pub overall_market_state: MarketState,
    pub research_quality: ResearchQuality,
    pub assumptions: Vec<String>,
    pub limitations: Vec<String>,
    pub confidence_level: Confidence,
}

/// A rule-based observation linking two phases
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Correlation {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub phases: [&'static str; 2],
    pub observation: &'static str,
    pub strength: &'static str,
    pub significance: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct MarketState {
    /// `positive`, `negative` or `neutral`
    pub overall_state: &'static str,
    #[serde(serialize_with = "serialize_pairs")]
    pub phase_indicators: Vec<(&'static str, &'static str)>,
    pub state_confidence: Confidence,
    pub dominant_factors: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResearchQuality {
    /// `high`, `moderate` or `low`
    pub quality_level: &'static str,
    pub successful_phases: usize,
    pub total_phases: usize,
    pub quality_score: f64,
    pub completeness: String,
}

fn serialize_pairs<S: Serializer>(pairs: &[(&'static str, &'static str)], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, value) in pairs {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// Successful reports of the four analysis phases, by phase
struct PhaseView<'a> {
    reports: Vec<(ResearchPhase, &'a PhaseReport)>,
}

impl<'a> PhaseView<'a> {
    fn new(results: &'a [PhaseResult]) -> Self {
        let reports = results
            .iter()
            .filter(|r| r.phase != ResearchPhase::Synthesis)
            .filter_map(|r| r.report().map(|report| (r.phase, report)))
            .collect();
        Self { reports }
    }

    fn get(&self, phase: ResearchPhase) -> Option<&'a PhaseReport> {
        self.reports.iter().find(|(p, _)| *p == phase).map(|(_, r)| *r)
    }

    fn label(&self, phase: ResearchPhase) -> &'static str {
        self.get(phase).map_or("neutral", PhaseReport::state_label)
    }
}

/// Combine phase results into findings. Failed and skipped phases contribute
/// nothing beyond lowering quality.
pub fn synthesize(results: &[PhaseResult]) -> ResearchFindings {
    let view = PhaseView::new(results);

    let all_insights: Vec<String> = view
        .reports
        .iter()
        .flat_map(|(_, report)| report.insights().iter().cloned())
        .collect();
    let total_insights = all_insights.len();
    let key_insights = all_insights.into_iter().take(KEY_INSIGHT_LIMIT).collect();

    ResearchFindings {
        synthesis_type: "comprehensive_market_analysis",
        total_insights,
        key_insights,
        cross_phase_correlations: correlations(&view),
        overall_market_state: market_state(&view),
        research_quality: research_quality(view.reports.len()),
        assumptions: compile(&view, BASE_ASSUMPTIONS, PhaseReport::assumptions),
        limitations: compile(&view, BASE_LIMITATIONS, PhaseReport::limitations),
        confidence_level: overall_confidence(&view),
    }
}

fn correlations(view: &PhaseView<'_>) -> Vec<Correlation> {
    let macro_overall = view.get(ResearchPhase::Macro).and_then(PhaseReport::as_macro);
    let sentiment = view.get(ResearchPhase::Sentiment).and_then(PhaseReport::as_sentiment);
    let onchain = view.get(ResearchPhase::Onchain).and_then(PhaseReport::as_onchain);
    let structure = view.get(ResearchPhase::MarketStructure).and_then(PhaseReport::as_structure);

    let sentiment_label = sentiment.map(|s| s.overall_sentiment.overall_sentiment);
    let mut found = Vec::new();

    if macro_overall.map(|m| m.overall_conditions.overall.as_str()) == Some("challenging")
        && sentiment_label == Some("negative")
    {
        found.push(Correlation {
            kind: "macro_sentiment",
            phases: ["macro", "sentiment"],
            observation: "Challenging macro conditions align with negative sentiment",
            strength: "strong",
            significance: "high",
        });
    }

    if onchain.map(|o| o.network_conditions.overall_status) == Some("positive")
        && structure.map(|s| s.market_phase.trend_strength) == Some("strong")
    {
        found.push(Correlation {
            kind: "onchain_structure",
            phases: ["onchain", "market_structure"],
            observation: "Strong network fundamentals support robust market structure",
            strength: "moderate",
            significance: "medium",
        });
    }

    if sentiment_label == Some("neutral")
        && structure.map(|s| s.market_phase.current_phase) == Some(MarketPhase::Range)
    {
        found.push(Correlation {
            kind: "sentiment_structure",
            phases: ["sentiment", "market_structure"],
            observation: "Neutral sentiment coincides with range-bound market structure",
            strength: "moderate",
            significance: "medium",
        });
    }

    found
}

fn market_state(view: &PhaseView<'_>) -> MarketState {
    let phase_indicators: Vec<_> = ResearchPhase::ANALYSIS
        .iter()
        .map(|phase| (phase.short_name(), view.label(*phase)))
        .collect();

    let overall_state = crate::svckit::majority_label(
        phase_indicators.iter().map(|(_, label)| *label),
        POSITIVE_STATES,
        NEGATIVE_STATES,
    );

    let dominant_factors = phase_indicators
        .iter()
        .filter(|(_, label)| *label != "neutral")
        .map(|(phase, label)| format!("{}: {label}", title_case(phase)))
        .collect();

    MarketState {
        overall_state,
        phase_indicators,
        state_confidence: Confidence::Moderate,
        dominant_factors,
    }
}

fn compile(view: &PhaseView<'_>, base: &[&str], entries: fn(&PhaseReport) -> Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = base.iter().map(|s| (*s).to_string()).collect();
    for (phase, report) in &view.reports {
        let prefix = title_case(phase.short_name());
        out.extend(entries(report).into_iter().map(|entry| format!("{prefix}: {entry}")));
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn research_quality(successful: usize) -> ResearchQuality {
    let quality_score = successful as f64 / ANALYSIS_PHASE_COUNT as f64;
    let quality_level = if quality_score >= 0.75 {
        "high"
    } else if quality_score >= 0.5 {
        "moderate"
    } else {
        "low"
    };

    ResearchQuality {
        quality_level,
        successful_phases: successful,
        total_phases: ANALYSIS_PHASE_COUNT,
        quality_score,
        completeness: format!("{successful}/{ANALYSIS_PHASE_COUNT} phases completed"),
    }
}

#[allow(clippy::cast_precision_loss)]
fn overall_confidence(view: &PhaseView<'_>) -> Confidence {
    if view.reports.is_empty() {
        return Confidence::Low;
    }
    let total: u32 = view
        .reports
        .iter()
        .map(|(_, report)| u32::from(report.confidence().score()))
        .sum();
    Confidence::from_average(f64::from(total) / view.reports.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::ResearchQuery;
    use crate::model::ResearchContext;
    use crate::svckit::default_analyzers;

    fn completed_results() -> Vec<PhaseResult> {
        let ctx = ResearchContext::new(&ResearchQuery {
            query: "overall crypto market".into(),
            assets: None,
        });
        default_analyzers()
            .iter()
            .map(|a| PhaseResult::completed(a.analyze(&ctx).unwrap(), 0.0))
            .collect()
    }

    #[test]
    fn test_full_synthesis() {
        let findings = synthesize(&completed_results());

        assert_eq!(findings.total_insights, 2);
        assert_eq!(findings.cross_phase_correlations.len(), 1);
        assert_eq!(findings.cross_phase_correlations[0].kind, "sentiment_structure");

        let state = &findings.overall_market_state;
        assert_eq!(state.overall_state, "positive");
        assert_eq!(state.dominant_factors, vec!["Macro: supportive", "Onchain: positive"]);

        assert_eq!(findings.research_quality.quality_level, "high");
        assert_eq!(findings.research_quality.completeness, "4/4 phases completed");
        assert_eq!(findings.confidence_level, Confidence::Moderate);

        assert_eq!(findings.assumptions.len(), 8);
        assert!(findings.assumptions[4].starts_with("Structure: "));
        assert_eq!(findings.limitations.len(), 8);
    }

    #[test]
    fn test_failed_phases_lower_quality() {
        let mut results = completed_results();
        for phase in [ResearchPhase::Macro, ResearchPhase::Onchain, ResearchPhase::MarketStructure] {
            let idx = results.iter().position(|r| r.phase == phase).unwrap();
            results[idx] = PhaseResult::failed(phase, "feed offline", 0.0);
        }

        let findings = synthesize(&results);
        assert_eq!(findings.research_quality.quality_level, "low");
        assert_eq!(findings.research_quality.completeness, "1/4 phases completed");
        assert_eq!(findings.overall_market_state.overall_state, "neutral");
        assert!(findings.cross_phase_correlations.is_empty());
        assert_eq!(findings.assumptions.len(), 4);
    }

    #[test]
    fn test_no_successful_phases() {
        let results: Vec<_> = ResearchPhase::ANALYSIS.iter().map(|p| PhaseResult::skipped(*p)).collect();
        let findings = synthesize(&results);
        assert_eq!(findings.confidence_level, Confidence::Low);
        assert_eq!(findings.total_insights, 0);
        assert_eq!(findings.research_quality.quality_score, 0.0);
    }

    #[test]
    fn test_phase_indicators_serialize_in_order() {
        let value = serde_json::to_value(synthesize(&completed_results())).unwrap();
        let indicators = value["overall_market_state"]["phase_indicators"].as_object().unwrap();
        assert_eq!(indicators["macro"], "supportive");
        assert_eq!(indicators["structure"], "neutral");
        assert_eq!(value["cross_phase_correlations"][0]["type"], "sentiment_structure");
    }
}
