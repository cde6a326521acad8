//! Application State

use std::sync::Arc;

use macrochain_core::{ReportFormatter, ResearchPipeline};

use crate::config::{ApiSettings, Settings};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Research pipeline built from the analysis settings
    pub pipeline: Arc<ResearchPipeline>,

    pub formatter: ReportFormatter,

    /// Service identity reported by `/` and `/health`
    pub api: Arc<ApiSettings>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pipeline: Arc::new(ResearchPipeline::new(settings.analysis.clone())),
            formatter: ReportFormatter::new(),
            api: Arc::new(settings.api.clone()),
        }
    }
}
