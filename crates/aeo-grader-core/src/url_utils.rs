use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::{GraderError, Result};

static RE_SCHEME_WWW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://(?:www\.)?").expect("invalid scheme regex"));
static RE_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://").expect("invalid scheme regex"));
static RE_NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("invalid non-word regex"));

/// Normalize user input into the URL string the grader scores.
///
/// Bare domains get an `https://` prefix and a leading `www.` label is
/// dropped. The returned string keeps the input text as typed; no trailing
/// slash is added since the score seed is hashed from it.
pub fn normalize_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let prefixed = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let normalized = RE_SCHEME_WWW
        .replace(&prefixed, "https://")
        .into_owned();

    match Url::parse(&normalized) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(normalized),
        _ => Err(GraderError::InvalidUrl("Please enter a valid URL".to_string())),
    }
}

/// The URL with its scheme and one trailing slash removed, as shown in report headers.
pub fn report_domain(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .strip_suffix('/')
        .unwrap_or(without_scheme)
        .to_string()
}

/// File name for the exported PDF report.
pub fn report_filename(url: &str) -> String {
    let scheme_free = RE_SCHEME.replace(url, "");
    format!("AEO-Report-{}.pdf", RE_NON_WORD.replace_all(&scheme_free, "-"))
}
