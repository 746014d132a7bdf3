//! Live probes of the graded site
//!
//! Both probes are best effort. Any failure is logged and the affected
//! facts are left absent from the returned [`RealSignalBundle`].

pub mod content_fetch;
pub mod pagespeed;

use tracing::{info, warn};

use crate::config::GraderConfig;
use crate::content::analyze_html_content;
use crate::domain::analyze_domain;
use crate::error::Result;
use crate::signals::RealSignalBundle;

pub use content_fetch::{ContentSource, extract_html, fetch_html, proxy_request_url};
pub use pagespeed::{fetch_page_speed, pagespeed_request_url, parse_pagespeed};

pub fn user_agent() -> String {
    format!("Mozilla/5.0 (compatible; aeo-grader/{})", env!("CARGO_PKG_VERSION"))
}

/// Shared HTTP client plus the settings the probes read.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    http: reqwest::Client,
    config: GraderConfig,
}

impl ProbeClient {
    pub fn new(config: GraderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(user_agent())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GraderConfig {
        &self.config
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Run the technical and content probes concurrently for a normalized URL.
pub async fn gather_signals(url: &str, client: &ProbeClient) -> RealSignalBundle {
    info!(url, "gathering live signals");

    let technical = async {
        let page_speed = match fetch_page_speed(client, url).await {
            Ok(data) => data,
            Err(err) => {
                warn!(error = %err, "PageSpeed Insights unavailable");
                None
            }
        };
        (url.starts_with("https://"), analyze_domain(url), page_speed)
    };

    let content = async {
        match fetch_html(client, url).await {
            Some(html) => Some(analyze_html_content(&html, url)),
            None => {
                warn!(url, "content analysis unavailable; every provider failed");
                None
            }
        }
    };

    let ((https_enabled, domain, page_speed), content) = tokio::join!(technical, content);

    RealSignalBundle {
        https_enabled: Some(https_enabled),
        domain,
        page_speed,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn unreachable_site_degrades_to_url_facts() {
        let config = GraderConfig {
            content_proxies: Vec::new(),
            http_timeout: Duration::from_secs(2),
            ..GraderConfig::default()
        };
        let client = ProbeClient::new(config).unwrap();

        let bundle = gather_signals("https://127.0.0.1:1", &client).await;

        assert_eq!(bundle.https_enabled, Some(true));
        assert!(bundle.domain.is_some());
        assert!(bundle.page_speed.is_none());
        assert!(bundle.content.is_none());
        assert!(!bundle.has_live_data());
    }

    #[test]
    fn user_agent_names_the_crate() {
        assert!(user_agent().contains("aeo-grader/"));
    }
}
