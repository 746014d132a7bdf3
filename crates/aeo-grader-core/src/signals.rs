//! Real-signal bundle gathered by live probes
//!
//! Every fact is optional. A missing fact never fails scoring; it only
//! suppresses the adjustment, finding or recommendation that depends on it.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Facts gathered from live probes of a site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealSignalBundle {
    #[serde(deserialize_with = "lenient")]
    pub https_enabled: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub domain: Option<DomainAnalysis>,
    #[serde(deserialize_with = "lenient")]
    pub page_speed: Option<PageSpeedData>,
    #[serde(deserialize_with = "lenient")]
    pub content: Option<ContentAnalysis>,
}

/// Classification of the URL's host and path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainAnalysis {
    #[serde(deserialize_with = "lenient_or_default")]
    pub is_educational: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub is_government: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub is_organization: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub is_medical: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_www: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub is_secure: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub domain_length: usize,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_hyphens: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub top_level_domain: String,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_health_path: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub subdomain_count: usize,
}

/// Lighthouse category scores from PageSpeed Insights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSpeedData {
    #[serde(deserialize_with = "lenient")]
    pub performance: Option<u8>,
    #[serde(deserialize_with = "lenient")]
    pub accessibility: Option<u8>,
    #[serde(deserialize_with = "lenient")]
    pub seo: Option<u8>,
    #[serde(deserialize_with = "lenient")]
    pub first_contentful_paint: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub largest_contentful_paint: Option<String>,
}

/// Everything learned from the fetched HTML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentAnalysis {
    #[serde(deserialize_with = "lenient")]
    pub structure: Option<StructureAnalysis>,
    #[serde(deserialize_with = "lenient")]
    pub technical: Option<TechnicalSeo>,
    #[serde(deserialize_with = "lenient")]
    pub healthcare: Option<HealthcareAnalysis>,
    #[serde(deserialize_with = "lenient")]
    pub quality: Option<ContentQuality>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureAnalysis {
    #[serde(deserialize_with = "lenient")]
    pub has_h1: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub heading_count: Option<usize>,
    #[serde(deserialize_with = "lenient")]
    pub heading_hierarchy: Option<HeadingHierarchy>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_meta_description: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub meta_description_length: usize,
    #[serde(deserialize_with = "lenient_or_default")]
    pub title_length: usize,
}

impl StructureAnalysis {
    pub fn proper_hierarchy(&self) -> Option<bool> {
        self.heading_hierarchy.as_ref().map(|h| h.proper)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingHierarchy {
    /// No heading is more than one level deeper than the one before it
    #[serde(deserialize_with = "lenient_or_default")]
    pub proper: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub h1_count: usize,
    #[serde(deserialize_with = "lenient_or_default")]
    pub h2_count: usize,
    #[serde(deserialize_with = "lenient_or_default")]
    pub h3_count: usize,
    #[serde(deserialize_with = "lenient_or_default")]
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalSeo {
    #[serde(deserialize_with = "lenient")]
    pub has_schema: Option<bool>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_canonical: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_open_graph: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_twitter_cards: bool,
    #[serde(deserialize_with = "lenient")]
    pub has_viewport_meta: Option<bool>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub alt_tags: AltTagCoverage,
    #[serde(deserialize_with = "lenient_or_default")]
    pub internal_links_count: usize,
    #[serde(deserialize_with = "lenient_or_default")]
    pub external_links_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltTagCoverage {
    pub total: usize,
    pub with_alt: usize,
    pub percentage: u32,
}

impl Default for AltTagCoverage {
    fn default() -> Self {
        Self {
            total: 0,
            with_alt: 0,
            percentage: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthcareAnalysis {
    /// Keyword group name to percentage of the group's keywords present
    #[serde(deserialize_with = "lenient_or_default")]
    pub relevance_scores: BTreeMap<String, u32>,
    #[serde(deserialize_with = "lenient")]
    pub has_author_credentials: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub has_disclaimers: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub has_dates: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub has_citations: Option<bool>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_contact_info: bool,
    #[serde(deserialize_with = "lenient")]
    pub regulatory_mentions: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentQuality {
    #[serde(deserialize_with = "lenient_or_default")]
    pub word_count: usize,
    #[serde(deserialize_with = "lenient_or_default")]
    pub readability_score: u32,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_contact_info: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_faq_section: bool,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_navigation: bool,
}

/// A field value that either parses as `T` or is swallowed.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

/// Deserialize an optional fact, treating a malformed value as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Valid(value)) => Some(value),
        Some(Lenient::Invalid(_)) | None => None,
    })
}

/// Like [`lenient`] for facts that fall back to their default.
fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}

impl RealSignalBundle {
    pub fn performance(&self) -> Option<u8> {
        self.page_speed.as_ref().and_then(|p| p.performance)
    }

    pub fn accessibility(&self) -> Option<u8> {
        self.page_speed.as_ref().and_then(|p| p.accessibility)
    }

    pub fn structure(&self) -> Option<&StructureAnalysis> {
        self.content.as_ref().and_then(|c| c.structure.as_ref())
    }

    pub fn technical(&self) -> Option<&TechnicalSeo> {
        self.content.as_ref().and_then(|c| c.technical.as_ref())
    }

    pub fn healthcare(&self) -> Option<&HealthcareAnalysis> {
        self.content.as_ref().and_then(|c| c.healthcare.as_ref())
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn has_page_speed(&self) -> bool {
        self.page_speed.is_some()
    }

    /// True when at least one live probe returned data beyond the URL itself.
    pub fn has_live_data(&self) -> bool {
        self.has_content() || self.has_page_speed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_deserialize_as_absent() {
        let bundle: RealSignalBundle =
            serde_json::from_str(r#"{"page_speed": {"performance": 92}}"#).unwrap();

        assert_eq!(bundle.https_enabled, None);
        assert_eq!(bundle.performance(), Some(92));
        assert_eq!(bundle.accessibility(), None);
        assert!(bundle.structure().is_none());
        assert!(bundle.has_live_data());
    }

    #[test]
    fn partial_content_sections_are_accepted() {
        let bundle: RealSignalBundle = serde_json::from_str(
            r#"{"content": {"healthcare": {"has_disclaimers": true}}}"#,
        )
        .unwrap();

        let hc = bundle.healthcare().unwrap();
        assert_eq!(hc.has_disclaimers, Some(true));
        assert_eq!(hc.has_dates, None);
        assert!(bundle.technical().is_none());
    }

    #[test]
    fn malformed_field_is_skipped_and_other_facts_kept() {
        let bundle: RealSignalBundle = serde_json::from_str(
            r#"{"https_enabled": true, "page_speed": {"performance": "fast", "accessibility": 95}}"#,
        )
        .unwrap();

        assert_eq!(bundle.https_enabled, Some(true));
        assert_eq!(bundle.performance(), None);
        assert_eq!(bundle.accessibility(), Some(95));

        let bundle: RealSignalBundle =
            serde_json::from_str(r#"{"page_speed": {"performance": 300, "seo": 88}}"#).unwrap();
        assert_eq!(bundle.performance(), None);
        assert_eq!(bundle.page_speed.unwrap().seo, Some(88));
    }

    #[test]
    fn malformed_sections_become_absent() {
        let bundle: RealSignalBundle = serde_json::from_str(
            r#"{
                "https_enabled": "yes",
                "domain": 7,
                "content": {
                    "structure": {"has_h1": true, "heading_count": -2, "title_length": "long"},
                    "technical": {"alt_tags": "none", "has_schema": false},
                    "healthcare": {"relevance_scores": [1, 2], "has_dates": true}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(bundle.https_enabled, None);
        assert!(bundle.domain.is_none());

        let structure = bundle.structure().unwrap();
        assert_eq!(structure.has_h1, Some(true));
        assert_eq!(structure.heading_count, None);
        assert_eq!(structure.title_length, 0);

        let technical = bundle.technical().unwrap();
        assert_eq!(technical.has_schema, Some(false));
        assert_eq!(technical.alt_tags, AltTagCoverage::default());

        let hc = bundle.healthcare().unwrap();
        assert!(hc.relevance_scores.is_empty());
        assert_eq!(hc.has_dates, Some(true));
    }

    #[test]
    fn null_fact_is_absent() {
        let bundle: RealSignalBundle =
            serde_json::from_str(r#"{"https_enabled": null, "content": null}"#).unwrap();
        assert_eq!(bundle, RealSignalBundle::default());
    }

    #[test]
    fn empty_bundle_has_no_live_data() {
        assert!(!RealSignalBundle::default().has_live_data());
    }
}
