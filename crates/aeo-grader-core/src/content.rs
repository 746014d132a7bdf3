//! Page content analysis
//!
//! Pattern checks over fetched HTML: heading structure, technical SEO
//! markers, healthcare trust signals and a simple readability estimate.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use url::Url;

use crate::signals::{
    AltTagCoverage, ContentAnalysis, ContentQuality, HealthcareAnalysis, HeadingHierarchy,
    StructureAnalysis, TechnicalSeo,
};

const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// Healthcare keyword groups used for topical relevance.
const HEALTHCARE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "drugs",
        &["medication", "drug", "treatment", "therapy", "pharmaceutical", "dosage", "prescription"],
    ),
    (
        "conditions",
        &["disease", "condition", "syndrome", "disorder", "symptoms", "diagnosis", "patient"],
    ),
    (
        "authority",
        &["fda", "nih", "cdc", "clinical trial", "peer reviewed", "study", "research", "clinical"],
    ),
    (
        "safety",
        &["side effects", "contraindications", "warnings", "precautions", "adverse", "safety"],
    ),
    (
        "medical",
        &["doctor", "physician", "medical", "healthcare", "clinical", "hospital", "medicine"],
    ),
];

const AUTHOR_PATTERNS: &[&str] = &[
    "md", "phd", "pharmd", "doctor", "dr.", "physician", "author:", "by:", "written by",
];
const DISCLAIMER_PATTERNS: &[&str] = &[
    "disclaimer",
    "medical advice",
    "consult",
    "healthcare provider",
    "not intended to",
];
const DATE_PATTERNS: &[&str] = &["updated", "published", "last modified", "2023", "2024", "2025"];
const CITATION_PATTERNS: &[&str] = &["[", "]", "reference", "study", "journal", "pubmed", "doi:"];
const REGULATORY_TERMS: &[&str] = &[
    "fda",
    "ema",
    "health canada",
    "tga",
    "approval",
    "clearance",
    "indication",
];
const CONTACT_PATTERNS: &[&str] = &["contact", "phone", "email", "@", "address", "location"];

static RE_SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("invalid sentence regex"));
static RE_SILENT_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").expect("invalid suffix regex")
});
static RE_LEADING_Y: Lazy<Regex> = Lazy::new(|| Regex::new(r"^y").expect("invalid y regex"));
static RE_VOWEL_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[aeiouy]{1,2}").expect("invalid vowel regex"));

/// Analyze fetched HTML for the page at `url`.
pub fn analyze_html_content(html: &str, url: &str) -> ContentAnalysis {
    let document = Html::parse_document(html);
    let text_content = body_text(&document).to_lowercase();
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();

    ContentAnalysis {
        structure: Some(analyze_structure(&document)),
        technical: Some(analyze_technical(html, &document, &host)),
        healthcare: Some(analyze_healthcare(&text_content)),
        quality: Some(analyze_quality(&text_content, &document)),
    }
}

fn analyze_structure(document: &Html) -> StructureAnalysis {
    let meta_description = select_first(document, r#"meta[name="description"]"#);
    let title_length = select_first(document, "title")
        .map(|title| title.text().collect::<String>().chars().count())
        .unwrap_or(0);

    StructureAnalysis {
        has_h1: Some(select_exists(document, "h1")),
        heading_count: Some(count_elements(document, HEADING_SELECTOR)),
        heading_hierarchy: Some(analyze_heading_hierarchy(document)),
        has_meta_description: meta_description.is_some(),
        meta_description_length: meta_description
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| content.chars().count())
            .unwrap_or(0),
        title_length,
    }
}

/// Walk headings in document order; a heading more than one level deeper
/// than its predecessor (starting from level 0) breaks the hierarchy.
pub fn analyze_heading_hierarchy(document: &Html) -> HeadingHierarchy {
    let levels: Vec<usize> = match Selector::parse(HEADING_SELECTOR) {
        Ok(selector) => document
            .select(&selector)
            .filter_map(|heading| heading.value().name()[1..].parse().ok())
            .collect(),
        Err(_) => Vec::new(),
    };

    let mut proper = true;
    let mut previous = 0;
    for &level in &levels {
        if level > previous + 1 {
            proper = false;
        }
        previous = level;
    }

    HeadingHierarchy {
        proper,
        h1_count: levels.iter().filter(|&&l| l == 1).count(),
        h2_count: levels.iter().filter(|&&l| l == 2).count(),
        h3_count: levels.iter().filter(|&&l| l == 3).count(),
        total: levels.len(),
    }
}

fn analyze_technical(html: &str, document: &Html, host: &str) -> TechnicalSeo {
    let hrefs: Vec<&str> = match Selector::parse("a[href]") {
        Ok(selector) => document
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .collect(),
        Err(_) => Vec::new(),
    };

    let on_host = |href: &&str| !host.is_empty() && href.contains(host);
    let internal_links_count = hrefs
        .iter()
        .filter(|href| href.starts_with('/') || on_host(href))
        .count();
    let absolute_links = hrefs.iter().filter(|href| href.starts_with("http")).count();
    let host_links = hrefs.iter().filter(|href| on_host(href)).count();

    TechnicalSeo {
        has_schema: Some(html.contains("application/ld+json") || html.contains("itemscope")),
        has_canonical: html.contains(r#"rel="canonical""#),
        has_open_graph: html.contains("og:"),
        has_twitter_cards: html.contains("twitter:"),
        has_viewport_meta: Some(html.contains(r#"name="viewport""#)),
        alt_tags: alt_tag_coverage(document),
        internal_links_count,
        external_links_count: absolute_links.saturating_sub(host_links),
    }
}

fn alt_tag_coverage(document: &Html) -> AltTagCoverage {
    let images: Vec<ElementRef<'_>> = match Selector::parse("img") {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    };
    let total = images.len();
    let with_alt = images
        .iter()
        .filter(|img| img.value().attr("alt").is_some_and(|alt| !alt.trim().is_empty()))
        .count();

    AltTagCoverage {
        total,
        with_alt,
        percentage: if total > 0 {
            (with_alt as f64 / total as f64 * 100.0).round() as u32
        } else {
            100
        },
    }
}

/// Trust and topical signals from lowercased page text.
pub fn analyze_healthcare(text_content: &str) -> HealthcareAnalysis {
    let relevance_scores = HEALTHCARE_KEYWORDS
        .iter()
        .map(|(group, keywords)| {
            let matches = keywords.iter().filter(|k| text_content.contains(*k)).count();
            let pct = (matches as f64 / keywords.len() as f64 * 100.0).round() as u32;
            (group.to_string(), pct)
        })
        .collect::<BTreeMap<_, _>>();

    HealthcareAnalysis {
        relevance_scores,
        has_author_credentials: Some(contains_any(text_content, AUTHOR_PATTERNS)),
        has_disclaimers: Some(contains_any(text_content, DISCLAIMER_PATTERNS)),
        has_dates: Some(contains_any(text_content, DATE_PATTERNS)),
        has_citations: Some(contains_any(text_content, CITATION_PATTERNS)),
        has_contact_info: contains_any(text_content, CONTACT_PATTERNS),
        regulatory_mentions: Some(
            REGULATORY_TERMS
                .iter()
                .filter(|term| text_content.contains(*term))
                .count(),
        ),
    }
}

fn analyze_quality(text_content: &str, document: &Html) -> ContentQuality {
    ContentQuality {
        word_count: text_content.split_whitespace().count(),
        readability_score: readability_score(text_content),
        has_contact_info: contains_any(text_content, CONTACT_PATTERNS),
        has_faq_section: text_content.contains("faq") || text_content.contains("frequently asked"),
        has_navigation: select_exists(document, "nav")
            || select_exists(document, r#"[role="navigation"]"#),
    }
}

/// Simplified Flesch reading ease, clamped to [0, 100].
pub fn readability_score(text: &str) -> u32 {
    let sentences = RE_SENTENCE_BREAK
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count();
    let words: Vec<&str> = text.split_whitespace().collect();
    if sentences == 0 || words.is_empty() {
        return 0;
    }

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    let score = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    score.round().clamp(0.0, 100.0) as u32
}

/// Vowel-group syllable heuristic.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    if word.chars().count() <= 3 {
        return 1;
    }
    let trimmed = RE_SILENT_SUFFIX.replace(&word, "");
    let trimmed = RE_LEADING_Y.replace(&trimmed, "");
    match RE_VOWEL_GROUP.find_iter(&trimmed).count() {
        0 => 1,
        n => n,
    }
}

fn body_text(document: &Html) -> String {
    select_first(document, "body")
        .map(|body| body.text().collect::<String>())
        .unwrap_or_default()
}

fn contains_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

// Helper functions
fn select_first<'a>(document: &'a Html, selector_str: &str) -> Option<ElementRef<'a>> {
    Selector::parse(selector_str)
        .ok()
        .and_then(|selector| document.select(&selector).next())
}

fn select_exists(document: &Html, selector_str: &str) -> bool {
    select_first(document, selector_str).is_some()
}

fn count_elements(document: &Html, selector_str: &str) -> usize {
    if let Ok(selector) = Selector::parse(selector_str) {
        document.select(&selector).count()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHARMA_PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Drug X Prescribing Information</title>
            <meta name="description" content="Dosage and safety information">
            <meta name="viewport" content="width=device-width">
            <link rel="canonical" href="https://pharma.example/drug-x">
            <script type="application/ld+json">{"@type": "Drug"}</script>
        </head>
        <body>
            <nav><a href="/">Home</a><a href="https://pharma.example/about">About</a></nav>
            <h1>Drug X</h1>
            <h2>How it works</h2>
            <h3>Mechanism</h3>
            <h2>Dosage</h2>
            <p>Written by Jane Doe, PharmD. Last updated March 2024.</p>
            <p>This is not intended to replace medical advice. Consult your healthcare provider.</p>
            <p>FDA approval was granted after a clinical trial [1].</p>
            <img src="a.png" alt="Pill">
            <img src="b.png" alt="  ">
            <a href="https://pubmed.ncbi.nlm.nih.gov/1">Study</a>
        </body>
        </html>
    "#;

    #[test]
    fn extracts_structure() {
        let analysis = analyze_html_content(PHARMA_PAGE, "https://pharma.example/drug-x");
        let structure = analysis.structure.unwrap();

        assert_eq!(structure.has_h1, Some(true));
        assert_eq!(structure.heading_count, Some(4));
        assert_eq!(structure.proper_hierarchy(), Some(true));
        assert!(structure.has_meta_description);
        assert_eq!(structure.meta_description_length, 29);
        assert_eq!(structure.title_length, 30);
    }

    #[test]
    fn extracts_technical_markers() {
        let analysis = analyze_html_content(PHARMA_PAGE, "https://pharma.example/drug-x");
        let technical = analysis.technical.unwrap();

        assert_eq!(technical.has_schema, Some(true));
        assert_eq!(technical.has_viewport_meta, Some(true));
        assert!(technical.has_canonical);
        assert_eq!(technical.alt_tags.total, 2);
        assert_eq!(technical.alt_tags.with_alt, 1);
        assert_eq!(technical.alt_tags.percentage, 50);
        assert_eq!(technical.internal_links_count, 2);
        assert_eq!(technical.external_links_count, 1);
    }

    #[test]
    fn links_on_own_host_are_not_external() {
        let html = r#"<body>
            <a href="/a">A</a>
            <a href="https://clinic.example/b">B</a>
            <a href="https://clinic.example/c">C</a>
            <a href="https://other.org/d">D</a>
            <a href="mailto:info@other.org">Mail</a>
        </body>"#;
        let technical = analyze_html_content(html, "https://clinic.example/")
            .technical
            .unwrap();

        assert_eq!(technical.internal_links_count, 3);
        assert_eq!(technical.external_links_count, 1);

        // Without a host only root-relative links are internal
        let technical = analyze_html_content(html, "not a url").technical.unwrap();
        assert_eq!(technical.internal_links_count, 1);
        assert_eq!(technical.external_links_count, 3);
    }

    #[test]
    fn extracts_healthcare_signals() {
        let analysis = analyze_html_content(PHARMA_PAGE, "https://pharma.example/drug-x");
        let hc = analysis.healthcare.unwrap();

        assert_eq!(hc.has_author_credentials, Some(true));
        assert_eq!(hc.has_disclaimers, Some(true));
        assert_eq!(hc.has_dates, Some(true));
        assert_eq!(hc.has_citations, Some(true));
        // fda, approval
        assert_eq!(hc.regulatory_mentions, Some(2));
        assert!(hc.relevance_scores["authority"] > 0);
        assert_eq!(hc.relevance_scores.len(), 5);

        let quality = analysis.quality.unwrap();
        assert!(quality.has_navigation);
        assert!(quality.word_count > 20);
    }

    #[test]
    fn skipped_heading_level_breaks_hierarchy() {
        let document = Html::parse_document("<h1>A</h1><h3>B</h3><h2>C</h2>");
        let hierarchy = analyze_heading_hierarchy(&document);
        assert!(!hierarchy.proper);
        assert_eq!(hierarchy.total, 3);

        // Starting below h1 is also a skip from level 0
        let document = Html::parse_document("<h2>A</h2>");
        assert!(!analyze_heading_hierarchy(&document).proper);

        let document = Html::parse_document("<p>No headings</p>");
        assert!(analyze_heading_hierarchy(&document).proper);
    }

    #[test]
    fn bare_page_reports_missing_signals() {
        let analysis = analyze_html_content("<html><body><div>hi</div></body></html>", "https://x.io");
        let structure = analysis.structure.unwrap();
        assert_eq!(structure.has_h1, Some(false));
        assert_eq!(structure.heading_count, Some(0));

        let technical = analysis.technical.unwrap();
        assert_eq!(technical.has_schema, Some(false));
        assert_eq!(technical.alt_tags.percentage, 100);

        let hc = analysis.healthcare.unwrap();
        assert_eq!(hc.has_disclaimers, Some(false));
        assert_eq!(hc.regulatory_mentions, Some(0));
    }

    #[test]
    fn syllable_heuristic() {
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("medication"), 4);
        assert_eq!(count_syllables("tablet"), 2);
        assert_eq!(count_syllables("rhythm"), 1);
    }

    #[test]
    fn readability_bounds() {
        assert_eq!(readability_score(""), 0);
        let simple = readability_score("the cat sat. the dog ran. we ate.");
        assert!(simple > 90);
        let dense = readability_score(
            "pharmacokinetic characterization demonstrates considerable interindividual variability",
        );
        assert!(dense < simple);
    }
}
