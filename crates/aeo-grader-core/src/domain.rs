//! Host and path classification

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::signals::DomainAnalysis;

static RE_MEDICAL_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(med|health|clinic|hospital|pharma|bio|medical)\b")
        .expect("invalid medical host regex")
});
static RE_HEALTH_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(health|medical|clinical|patient|drug|disease)\b")
        .expect("invalid health path regex")
});

/// Classify the host and path of a URL. Returns `None` if it does not parse.
pub fn analyze_domain(url: &str) -> Option<DomainAnalysis> {
    let parsed = Url::parse(url).ok()?;
    let domain = parsed.host_str()?.to_lowercase();
    let path = parsed.path().to_lowercase();

    Some(DomainAnalysis {
        is_educational: domain.contains(".edu"),
        is_government: domain.contains(".gov"),
        is_organization: domain.contains(".org"),
        is_medical: RE_MEDICAL_HOST.is_match(&domain),
        has_www: domain.starts_with("www."),
        is_secure: url.starts_with("https://"),
        domain_length: domain.chars().count(),
        has_hyphens: domain.contains('-'),
        top_level_domain: domain.rsplit('.').next().unwrap_or_default().to_string(),
        has_health_path: RE_HEALTH_PATH.is_match(&path),
        subdomain_count: domain.split('.').count().saturating_sub(2),
    })
}
