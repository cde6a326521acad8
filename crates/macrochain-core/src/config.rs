//! Analysis Configuration

use serde::{Deserialize, Serialize};

use crate::model::ResearchPhase;

/// Bounds enforced on incoming requests
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeLimits {
    /// Minimum query length in characters, after trimming
    pub min_query_length: usize,
    /// Maximum query length in characters
    pub max_query_length: usize,
    /// Maximum number of asset entries per request
    pub max_assets: usize,
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self {
            min_query_length: 3,
            max_query_length: 2000,
            max_assets: 10,
        }
    }
}

/// Which phases run and how requests are bounded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub limits: IntakeLimits,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub enable_macro: bool,
    pub enable_sentiment: bool,
    pub enable_onchain: bool,
    pub enable_market_structure: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            limits: IntakeLimits::default(),
            timeout_secs: 30,
            enable_macro: true,
            enable_sentiment: true,
            enable_onchain: true,
            enable_market_structure: true,
        }
    }
}

impl AnalysisConfig {
    /// Whether the pipeline should run `phase`. Synthesis always runs.
    pub const fn is_enabled(&self, phase: ResearchPhase) -> bool {
        match phase {
            ResearchPhase::Macro => self.enable_macro,
            ResearchPhase::Sentiment => self.enable_sentiment,
            ResearchPhase::Onchain => self.enable_onchain,
            ResearchPhase::MarketStructure => self.enable_market_structure,
            ResearchPhase::Synthesis => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        let config = AnalysisConfig::default();
        assert!(ResearchPhase::ANALYSIS.iter().all(|p| config.is_enabled(*p)));
        assert_eq!(config.limits.max_assets, 10);
        assert_eq!(config.limits.max_query_length, 2000);
    }

    #[test]
    fn test_disabled_phase() {
        let config = AnalysisConfig {
            enable_onchain: false,
            ..Default::default()
        };
        assert!(!config.is_enabled(ResearchPhase::Onchain));
        assert!(config.is_enabled(ResearchPhase::Synthesis));
    }
}
