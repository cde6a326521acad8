//! Request Intake
//!
//! Validates and normalizes incoming analysis requests before any phase runs.

use serde::{Deserialize, Serialize};

use crate::config::IntakeLimits;
use crate::error::{AnalysisError, Result};

/// Raw request body for `/analyze` and `/research`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Free-text research question
    pub query: String,

    /// Optional asset identifiers (e.g. `bitcoin`, `ethereum`)
    #[serde(default)]
    pub assets: Option<Vec<String>>,
}

/// A request that passed intake
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResearchQuery {
    /// Query exactly as submitted
    pub query: String,
    /// Normalized assets; `None` when none were usable
    pub assets: Option<Vec<String>>,
}

impl AnalysisRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            assets: None,
        }
    }

    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets = Some(assets.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self, limits: &IntakeLimits) -> Result<ResearchQuery> {
        let len = self.query.trim().chars().count();
        if len < limits.min_query_length {
            return Err(AnalysisError::InvalidQuery(format!(
                "Query must be at least {} characters long",
                limits.min_query_length
            )));
        }

        let total = self.query.chars().count();
        if total > limits.max_query_length {
            return Err(AnalysisError::QueryTooLong {
                len: total,
                max: limits.max_query_length,
            });
        }

        let assets = match &self.assets {
            Some(raw) if raw.len() > limits.max_assets => {
                return Err(AnalysisError::TooManyAssets {
                    count: raw.len(),
                    max: limits.max_assets,
                });
            }
            Some(raw) => normalize_assets(raw),
            None => None,
        };

        Ok(ResearchQuery {
            query: self.query.clone(),
            assets,
        })
    }
}

/// Trim and lower-case each entry, dropping blanks
fn normalize_assets(raw: &[String]) -> Option<Vec<String>> {
    let assets: Vec<String> = raw
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(str::to_lowercase)
        .collect();

    (!assets.is_empty()).then_some(assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> IntakeLimits {
        IntakeLimits::default()
    }

    #[test]
    fn test_short_query_rejected() {
        let err = AnalysisRequest::new("  ab  ").validate(&limits()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Query must be at least 3 characters long");
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(AnalysisRequest::new("₿₿₿").validate(&limits()).is_ok());
    }

    #[test]
    fn test_long_query_rejected() {
        let limits = IntakeLimits {
            max_query_length: 10,
            ..IntakeLimits::default()
        };
        let err = AnalysisRequest::new("x".repeat(11)).validate(&limits).unwrap_err();
        assert!(matches!(err, AnalysisError::QueryTooLong { len: 11, max: 10 }));
    }

    #[test]
    fn test_too_many_assets_counted_before_filtering() {
        let mut assets = vec!["bitcoin"; 10];
        assets.push("   ");
        let err = AnalysisRequest::new("compare majors")
            .with_assets(assets)
            .validate(&limits())
            .unwrap_err();
        assert_eq!(err.to_string(), "Maximum 10 assets allowed per request");
    }

    #[test]
    fn test_assets_normalized() {
        let query = AnalysisRequest::new("compare majors")
            .with_assets([" Bitcoin ", "", "ETHEREUM"])
            .validate(&limits())
            .unwrap();
        assert_eq!(query.assets, Some(vec!["bitcoin".to_string(), "ethereum".to_string()]));
        assert_eq!(query.query, "compare majors");
    }

    #[test]
    fn test_blank_assets_become_none() {
        let query = AnalysisRequest::new("compare majors")
            .with_assets(["  ", ""])
            .validate(&limits())
            .unwrap();
        assert_eq!(query.assets, None);
    }
}
