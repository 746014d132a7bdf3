//! Page HTML retrieval through an ordered list of providers

use serde_json::Value;
use std::fmt;
use tracing::debug;

use super::ProbeClient;
use crate::error::{GraderError, Result};
use crate::fallback::first_success;

/// Bodies this short are treated as a failed fetch.
pub const MIN_HTML_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    Direct,
    /// Proxy URL template
    Proxy(String),
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Direct => f.write_str("direct"),
            ContentSource::Proxy(template) => write!(f, "proxy {template}"),
        }
    }
}

/// Expand a proxy template: `{url}` takes the percent-encoded target and
/// `{raw}` the target unchanged.
pub fn proxy_request_url(template: &str, target: &str) -> String {
    template
        .replace("{url}", &urlencoding::encode(target))
        .replace("{raw}", target)
}

/// Pull page HTML out of a proxy body.
///
/// JSON bodies are unwrapped from `contents`, `response` or a bare string;
/// a JSON object without either field yields nothing. Anything that is not
/// JSON is taken as the HTML itself.
pub fn extract_html(body: &str) -> Option<String> {
    let html = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(html)) => html,
        Ok(Value::Object(map)) => ["contents", "response"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).map(str::to_string))?,
        Ok(_) => return None,
        Err(_) => body.to_string(),
    };
    long_enough(html)
}

fn long_enough(html: String) -> Option<String> {
    (html.chars().count() > MIN_HTML_LENGTH).then_some(html)
}

async fn fetch_text(client: &ProbeClient, url: &str) -> Result<String> {
    let response = client.http().get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(GraderError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.text().await?)
}

async fn fetch_from(client: &ProbeClient, source: &ContentSource, url: &str) -> Result<String> {
    debug!(%source, url, "fetching page content");
    let html = match source {
        ContentSource::Direct => long_enough(fetch_text(client, url).await?),
        ContentSource::Proxy(template) => {
            extract_html(&fetch_text(client, &proxy_request_url(template, url)).await?)
        }
    };
    html.ok_or_else(|| GraderError::Network(format!("{source} returned no usable HTML")))
}

/// Fetch the page directly, then through each configured proxy, and return
/// the first usable HTML.
pub async fn fetch_html(client: &ProbeClient, url: &str) -> Option<String> {
    let sources: Vec<ContentSource> = std::iter::once(ContentSource::Direct)
        .chain(
            client
                .config()
                .content_proxies
                .iter()
                .cloned()
                .map(ContentSource::Proxy),
        )
        .collect();

    first_success(
        sources.iter(),
        |source| fetch_from(client, source, url),
        |index, err| debug!(provider = index, error = %err, "content provider failed"),
    )
    .await
}
