//! Submission logging to a Supabase (PostgREST) project

use serde::Serialize;
use tracing::info;

use crate::config::SupabaseConfig;
use crate::error::{GraderError, Result};
use crate::session::AnalysisSession;

pub const URL_SUBMISSIONS_TABLE: &str = "url_submissions";
pub const LEAD_CAPTURES_TABLE: &str = "lead_captures";

/// One graded URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlSubmission {
    pub url: String,
    pub email: Option<String>,
    pub overall_score: u32,
    pub real_data_used: bool,
    pub user_agent: String,
}

impl UrlSubmission {
    pub fn from_session(session: &AnalysisSession, user_agent: impl Into<String>) -> Self {
        Self {
            url: session.url.clone(),
            email: session.email.clone(),
            overall_score: session.scores.overall,
            real_data_used: session.real_data_used(),
            user_agent: user_agent.into(),
        }
    }
}

/// A consultation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadCapture {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub company_size: Option<String>,
    pub challenge: Option<String>,
    pub analyzed_url: Option<String>,
    pub overall_score: Option<u32>,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct SubmissionStore {
    http: reqwest::Client,
    config: SupabaseConfig,
}

impl SubmissionStore {
    pub fn new(http: reqwest::Client, config: SupabaseConfig) -> Self {
        Self { http, config }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.url.trim_end_matches('/'))
    }

    pub async fn record_submission(&self, row: &UrlSubmission) -> Result<()> {
        self.insert(URL_SUBMISSIONS_TABLE, row).await?;
        info!(url = %row.url, score = row.overall_score, "URL submission recorded");
        Ok(())
    }

    pub async fn record_lead(&self, row: &LeadCapture) -> Result<()> {
        self.insert(LEAD_CAPTURES_TABLE, row).await?;
        info!(email = %row.email, "lead captured");
        Ok(())
    }

    async fn insert<T: Serialize>(&self, table: &str, row: &T) -> Result<()> {
        let response = self
            .http
            .post(self.table_url(table))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GraderError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
