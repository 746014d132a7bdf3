//! PageSpeed Insights client

use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use super::ProbeClient;
use crate::config::PageSpeedStrategy;
use crate::error::{GraderError, Result};
use crate::signals::PageSpeedData;

pub const PAGESPEED_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

#[derive(Debug, Deserialize)]
struct PageSpeedResponse {
    #[serde(rename = "lighthouseResult")]
    lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Default, Deserialize)]
struct LighthouseResult {
    #[serde(default)]
    categories: LighthouseCategories,
    #[serde(default)]
    audits: HashMap<String, LighthouseAudit>,
}

#[derive(Debug, Default, Deserialize)]
struct LighthouseCategories {
    performance: Option<LighthouseCategory>,
    accessibility: Option<LighthouseCategory>,
    seo: Option<LighthouseCategory>,
}

#[derive(Debug, Deserialize)]
struct LighthouseCategory {
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LighthouseAudit {
    #[serde(rename = "displayValue")]
    display_value: Option<String>,
}

pub fn pagespeed_request_url(target: &str, api_key: &str, strategy: PageSpeedStrategy) -> String {
    format!(
        "{PAGESPEED_ENDPOINT}?url={}&key={}&strategy={}",
        urlencoding::encode(target),
        urlencoding::encode(api_key),
        strategy.as_str()
    )
}

fn percent(category: Option<&LighthouseCategory>) -> Option<u8> {
    category
        .and_then(|c| c.score)
        .map(|score| (score * 100.0).round().clamp(0.0, 100.0) as u8)
}

/// Parse a runPagespeed response. Returns `None` when it carries no
/// Lighthouse result.
pub fn parse_pagespeed(body: &str) -> Result<Option<PageSpeedData>> {
    let response: PageSpeedResponse = serde_json::from_str(body)
        .map_err(|e| GraderError::Network(format!("unexpected PageSpeed response: {e}")))?;

    Ok(response.lighthouse_result.map(|lighthouse| {
        let display = |audit: &str| {
            lighthouse
                .audits
                .get(audit)
                .and_then(|a| a.display_value.clone())
                .unwrap_or_else(|| "N/A".to_string())
        };
        PageSpeedData {
            performance: percent(lighthouse.categories.performance.as_ref()),
            accessibility: percent(lighthouse.categories.accessibility.as_ref()),
            seo: percent(lighthouse.categories.seo.as_ref()),
            first_contentful_paint: Some(display("first-contentful-paint")),
            largest_contentful_paint: Some(display("largest-contentful-paint")),
        }
    }))
}

/// Query PageSpeed Insights. Returns `Ok(None)` without a configured API key.
pub async fn fetch_page_speed(client: &ProbeClient, url: &str) -> Result<Option<PageSpeedData>> {
    let Some(api_key) = client.config().pagespeed_api_key.as_deref() else {
        debug!("no PageSpeed API key configured; skipping");
        return Ok(None);
    };

    let request_url = pagespeed_request_url(url, api_key, client.config().pagespeed_strategy);
    debug!(url, "requesting PageSpeed Insights");
    let response = client.http().get(&request_url).send().await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(GraderError::Api {
            status: status.as_u16(),
            message,
        });
    }

    parse_pagespeed(&response.text().await?)
}
