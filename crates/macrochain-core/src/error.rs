//! Error Types for the Research Pipeline

use thiserror::Error;

use crate::model::ResearchPhase;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidQuery(String),

    #[error("Query exceeds {max} characters (got {len})")]
    QueryTooLong { len: usize, max: usize },

    #[error("Maximum {max} assets allowed per request")]
    TooManyAssets { count: usize, max: usize },

    #[error("{phase} analysis failed: {message}")]
    PhaseFailed {
        phase: ResearchPhase,
        message: String,
    },

    #[error("Research pipeline failed: {0}")]
    Pipeline(String),
}

impl AnalysisError {
    /// Whether the caller sent bad input (as opposed to an internal failure)
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuery(_) | Self::QueryTooLong { .. } | Self::TooManyAssets { .. }
        )
    }

    /// Message safe to hand back to an API client
    pub fn user_message(&self) -> String {
        if self.is_validation() {
            self.to_string()
        } else {
            "An unexpected error occurred while processing your request.".into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_pass_through() {
        let err = AnalysisError::TooManyAssets { count: 11, max: 10 };
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Maximum 10 assets allowed per request");
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let err = AnalysisError::Pipeline("boom".into());
        assert!(!err.is_validation());
        assert!(!err.user_message().contains("boom"));
    }
}
