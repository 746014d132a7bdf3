//! One grading run, passed explicitly to renderers and exporters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::scoring::compute_scores;
use crate::signals::RealSignalBundle;
use crate::types::ScoreResult;
use crate::url_utils::{report_domain, report_filename};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub id: Uuid,
    /// Normalized URL that was scored
    pub url: String,
    pub email: Option<String>,
    pub analyzed_at: DateTime<Utc>,
    pub scores: ScoreResult,
    pub signals: Option<RealSignalBundle>,
}

impl AnalysisSession {
    /// Score `url` and capture the result with the current time.
    pub fn new(url: impl Into<String>, email: Option<String>, signals: Option<RealSignalBundle>) -> Self {
        Self::at(url, email, signals, Utc::now())
    }

    /// Same as [`AnalysisSession::new`] with a fixed timestamp.
    pub fn at(
        url: impl Into<String>,
        email: Option<String>,
        signals: Option<RealSignalBundle>,
        analyzed_at: DateTime<Utc>,
    ) -> Self {
        let url = url.into();
        let scores = compute_scores(&url, signals.as_ref());
        let session = Self {
            id: Uuid::new_v4(),
            url,
            email,
            analyzed_at,
            scores,
            signals,
        };
        info!(
            session = %session.id,
            url = %session.url,
            overall = session.scores.overall,
            real_data = session.real_data_used(),
            "analysis complete"
        );
        session
    }

    /// True when a live probe contributed data beyond the URL.
    pub fn real_data_used(&self) -> bool {
        self.signals.as_ref().is_some_and(RealSignalBundle::has_live_data)
    }

    pub fn domain(&self) -> String {
        report_domain(&self.url)
    }

    pub fn pdf_filename(&self) -> String {
        report_filename(&self.url)
    }
}
