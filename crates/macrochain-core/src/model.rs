//! Domain Models
//!
//! Shared types for the research pipeline: phases, confidence labels,
//! the per-request context and the canned indicator tables analyzers
//! are built from.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::intake::ResearchQuery;
use crate::svckit::PhaseReport;

/// Assets analyzed when a request names none
pub const DEFAULT_ASSETS: [&str; 2] = ["bitcoin", "ethereum"];

/// Version stamped into every pipeline report
pub const PIPELINE_VERSION: &str = "1.0.0";

/// Stages of the research pipeline, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchPhase {
    Macro,
    Sentiment,
    Onchain,
    MarketStructure,
    Synthesis,
}

impl ResearchPhase {
    /// The four analysis phases (synthesis excluded)
    pub const ANALYSIS: [Self; 4] = [
        Self::Macro,
        Self::Sentiment,
        Self::Onchain,
        Self::MarketStructure,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Macro => "macro",
            Self::Sentiment => "sentiment",
            Self::Onchain => "onchain",
            Self::MarketStructure => "market_structure",
            Self::Synthesis => "synthesis",
        }
    }

    /// Key used when phases are compared side by side during synthesis
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::MarketStructure => "structure",
            other => other.as_str(),
        }
    }

    /// Human-readable section name
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Macro => "Macroeconomic",
            Self::Sentiment => "Market Sentiment",
            Self::Onchain => "On-Chain",
            Self::MarketStructure => "Market Structure",
            Self::Synthesis => "Synthesis",
        }
    }
}

impl fmt::Display for ResearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Qualitative confidence attached to phases and findings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    #[default]
    Moderate,
    ModerateToHigh,
    High,
}

impl Confidence {
    /// Score used when averaging (high 3, moderate 2, low 1)
    pub const fn score(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Low => 1,
            Self::Moderate | Self::ModerateToHigh => 2,
        }
    }

    /// Band an averaged score back into a label
    pub fn from_average(avg: f64) -> Self {
        if avg >= 2.5 {
            Self::ModerateToHigh
        } else if avg >= 1.5 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// Everything a phase may know about the request it serves
#[derive(Clone, Debug, Serialize)]
pub struct ResearchContext {
    pub query: String,
    pub assets: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub research_id: Uuid,
}

impl ResearchContext {
    pub fn new(query: &ResearchQuery) -> Self {
        let assets = query
            .assets
            .clone()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_ASSETS.iter().map(|s| (*s).to_string()).collect());

        Self {
            query: query.query.clone(),
            assets,
            timestamp: Utc::now(),
            research_id: Uuid::new_v4(),
        }
    }

    /// ISO-8601 timestamp with microseconds and a `Z` suffix
    pub fn timestamp_string(&self) -> String {
        iso_timestamp(self.timestamp)
    }
}

pub fn iso_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time in the wire format used across responses
pub fn now_timestamp() -> String {
    iso_timestamp(Utc::now())
}

// ============================================================================
// Phase results
// ============================================================================

/// Error payload recorded in place of a phase's data
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseFailure {
    pub error: bool,
    pub message: String,
}

impl PhaseFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

/// What happened when a phase ran
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum PhaseOutcome {
    Completed(Box<PhaseReport>),
    Failed(PhaseFailure),
    /// Disabled by configuration
    Skipped,
}

impl PhaseOutcome {
    pub fn report(&self) -> Option<&PhaseReport> {
        match self {
            Self::Completed(report) => Some(report.as_ref()),
            _ => None,
        }
    }

    pub const fn status(&self) -> PhaseStatus {
        match self {
            Self::Completed(_) => PhaseStatus::Success,
            Self::Failed(_) => PhaseStatus::Failed,
            Self::Skipped => PhaseStatus::Skipped,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Success,
    Failed,
    Skipped,
}

/// Result of one analysis phase for one request
#[derive(Clone, Debug, Serialize)]
pub struct PhaseResult {
    pub phase: ResearchPhase,
    pub outcome: PhaseOutcome,
    pub confidence: Confidence,
    pub assumptions: Vec<String>,
    pub limitations: Vec<String>,
    /// Wall time spent in the phase, seconds
    pub execution_time: f64,
}

impl PhaseResult {
    pub fn completed(report: PhaseReport, execution_time: f64) -> Self {
        Self {
            phase: report.phase(),
            confidence: report.confidence(),
            assumptions: report.assumptions(),
            limitations: report.limitations(),
            outcome: PhaseOutcome::Completed(Box::new(report)),
            execution_time,
        }
    }

    pub fn failed(phase: ResearchPhase, message: impl Into<String>, execution_time: f64) -> Self {
        let message = message.into();
        Self {
            phase,
            confidence: Confidence::Low,
            assumptions: vec![format!("Analysis failed: {message}")],
            limitations: vec!["Phase execution error".into()],
            outcome: PhaseOutcome::Failed(PhaseFailure::new(message)),
            execution_time,
        }
    }

    pub const fn skipped(phase: ResearchPhase) -> Self {
        Self {
            phase,
            outcome: PhaseOutcome::Skipped,
            confidence: Confidence::Low,
            assumptions: Vec::new(),
            limitations: Vec::new(),
            execution_time: 0.0,
        }
    }

    pub fn report(&self) -> Option<&PhaseReport> {
        self.outcome.report()
    }

    pub const fn succeeded(&self) -> bool {
        matches!(self.outcome, PhaseOutcome::Completed(_))
    }
}

// ============================================================================
// Indicator tables
// ============================================================================

/// A single labelled reading inside an indicator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reading {
    Text(&'static str),
    List(&'static [&'static str]),
}

/// A canned indicator: a handful of readings plus a plain-language explanation
#[derive(Clone, Copy, Debug)]
pub struct Indicator {
    pub name: &'static str,
    pub readings: &'static [(&'static str, Reading)],
    pub explanation: &'static str,
}

impl Indicator {
    /// Text reading by key
    pub fn reading(&self, key: &str) -> Option<&'static str> {
        self.readings.iter().find_map(|(k, v)| match v {
            Reading::Text(text) if *k == key => Some(*text),
            _ => None,
        })
    }
}

impl Serialize for Indicator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.readings.len() + 1))?;
        for (key, value) in self.readings {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("explanation", self.explanation)?;
        map.end()
    }
}

/// An ordered set of indicators, serialized as `{name: {reading: value, ...}}`
#[derive(Clone, Copy, Debug)]
pub struct IndicatorTable(pub &'static [Indicator]);

impl IndicatorTable {
    pub fn get(&self, name: &str) -> Option<&'static Indicator> {
        self.0.iter().find(|i| i.name == name)
    }

    /// Shorthand for `get(indicator)?.reading(key)`
    pub fn reading(&self, indicator: &str, key: &str) -> Option<&'static str> {
        self.get(indicator).and_then(|i| i.reading(key))
    }
}

impl Serialize for IndicatorTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for indicator in self.0 {
            map.serialize_entry(indicator.name, indicator)?;
        }
        map.end()
    }
}

/// Flat descriptive traits attached to a classification, serialized as a map
#[derive(Clone, Copy, Debug)]
pub struct Characteristics(pub &'static [(&'static str, &'static str)]);

impl Characteristics {
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

impl Serialize for Characteristics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// `"holder_sentiment"` -> `"Holder Sentiment"`
pub fn humanize_key(key: &str) -> String {
    title_case(&key.replace('_', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: IndicatorTable = IndicatorTable(&[Indicator {
        name: "dollar_strength",
        readings: &[
            ("status", Reading::Text("neutral")),
            ("themes", Reading::List(&["fx", "rates"])),
        ],
        explanation: "A stronger dollar weighs on risk assets.",
    }]);

    #[test]
    fn test_indicator_lookup() {
        assert_eq!(SAMPLE.reading("dollar_strength", "status"), Some("neutral"));
        assert_eq!(SAMPLE.reading("dollar_strength", "themes"), None);
        assert_eq!(SAMPLE.reading("missing", "status"), None);
    }

    #[test]
    fn test_indicator_table_serializes_as_nested_map() {
        let value = serde_json::to_value(SAMPLE).unwrap();
        assert_eq!(value["dollar_strength"]["status"], "neutral");
        assert_eq!(value["dollar_strength"]["themes"][1], "rates");
        assert!(value["dollar_strength"]["explanation"].is_string());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("bitcoin, ethereum"), "Bitcoin, Ethereum");
        assert_eq!(title_case("onchain"), "Onchain");
        assert_eq!(humanize_key("network_vitality"), "Network Vitality");
    }

    #[test]
    fn test_confidence_banding() {
        assert_eq!(Confidence::from_average(3.0), Confidence::ModerateToHigh);
        assert_eq!(Confidence::from_average(2.0), Confidence::Moderate);
        assert_eq!(Confidence::from_average(1.0), Confidence::Low);
    }

    #[test]
    fn test_context_defaults_assets() {
        let ctx = ResearchContext::new(&ResearchQuery {
            query: "bitcoin market outlook".into(),
            assets: None,
        });
        assert_eq!(ctx.assets, vec!["bitcoin", "ethereum"]);
        assert!(ctx.timestamp_string().ends_with('Z'));
    }
}
