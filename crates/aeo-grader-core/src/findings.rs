//! Finding and recommendation synthesis
//!
//! Findings describe one category; recommendations rank the weakest
//! categories and turn them into next steps. Both are pure functions of
//! the scores and the optional real-signal bundle.

use crate::signals::RealSignalBundle;
use crate::types::{Category, Finding, ScoreResult};

pub const MAX_FINDINGS: usize = 4;
/// Recommendation cap for the on-screen report
pub const SCREEN_RECOMMENDATIONS: usize = 8;
/// Recommendation cap for the PDF export
pub const PDF_RECOMMENDATIONS: usize = 6;

/// Categories scoring at or above this need no recommendation.
const RECOMMENDATION_THRESHOLD: u32 = 75;
const WORST_CATEGORY_COUNT: usize = 4;
const GOVERNANCE_THRESHOLD: u32 = 70;

/// Up to four findings for one category: signal-derived first, then the
/// generic findings for the score band.
pub fn findings(category: Category, score: u32, signals: Option<&RealSignalBundle>) -> Vec<Finding> {
    let mut out = match signals {
        Some(signals) => signal_findings(category, signals),
        None => Vec::new(),
    };
    out.extend(band_findings(category, score, signals));
    out.truncate(MAX_FINDINGS);
    out
}

fn signal_findings(category: Category, signals: &RealSignalBundle) -> Vec<Finding> {
    let mut out = Vec::new();

    match category {
        Category::TechnicalOptimization => {
            match signals.https_enabled {
                Some(true) => out.push(Finding::positive("SSL certificate properly configured")),
                Some(false) => out.push(Finding::deficiency(
                    "Missing SSL certificate - critical for YMYL content",
                )),
                None => {}
            }
            if let Some(ps) = signals.page_speed.as_ref() {
                if let Some(perf) = ps.performance {
                    if perf > 80 {
                        out.push(Finding::positive(format!("Strong performance score: {perf}/100")));
                    } else {
                        out.push(Finding::caution(format!(
                            "Performance needs improvement: {perf}/100"
                        )));
                    }
                }
                if let Some(acc) = ps.accessibility {
                    if acc > 90 {
                        out.push(Finding::positive(format!(
                            "Excellent accessibility score: {acc}/100"
                        )));
                    } else if acc < 70 {
                        out.push(Finding::deficiency(format!(
                            "Accessibility issues detected: {acc}/100"
                        )));
                    }
                }
            }
            match signals.technical().and_then(|t| t.has_schema) {
                Some(true) => out.push(Finding::positive("Structured data markup detected")),
                Some(false) => out.push(Finding::caution(
                    "Missing structured data for enhanced AI understanding",
                )),
                None => {}
            }
        }
        Category::ContentStructure => {
            if let Some(structure) = signals.structure() {
                match structure.has_h1 {
                    Some(true) => out.push(Finding::positive("Primary heading (H1) found")),
                    Some(false) => out.push(Finding::deficiency("Missing primary heading (H1) tag")),
                    None => {}
                }
                match structure.heading_count {
                    Some(n) if n > 5 => out.push(Finding::positive(format!(
                        "Good heading structure with {n} headings"
                    ))),
                    Some(n) if n < 3 => out.push(Finding::caution(
                        "Limited heading structure may impact scannability",
                    )),
                    _ => {}
                }
                match structure.proper_hierarchy() {
                    Some(true) => out.push(Finding::positive("Proper heading hierarchy maintained")),
                    Some(false) => out.push(Finding::caution("Heading hierarchy could be improved")),
                    None => {}
                }
            }
        }
        Category::AuthoritySignals => {
            if let Some(hc) = signals.healthcare() {
                match hc.has_author_credentials {
                    Some(true) => out.push(Finding::positive("Medical author credentials detected")),
                    Some(false) => out.push(Finding::caution("Author credentials not clearly displayed")),
                    None => {}
                }
                match hc.has_citations {
                    Some(true) => out.push(Finding::positive("Citations and references found")),
                    Some(false) => out.push(Finding::caution("Limited citation of medical sources")),
                    None => {}
                }
                if let Some(n) = hc.regulatory_mentions.filter(|n| *n > 0) {
                    out.push(Finding::positive(format!(
                        "Regulatory mentions found ({n} references)"
                    )));
                }
            }
        }
        Category::YmylCompliance => {
            if let Some(hc) = signals.healthcare() {
                match hc.has_disclaimers {
                    Some(true) => out.push(Finding::positive("Medical disclaimers present")),
                    Some(false) => out.push(Finding::deficiency("Missing critical medical disclaimers")),
                    None => {}
                }
                match hc.has_dates {
                    Some(true) => out.push(Finding::positive("Content freshness dates found")),
                    Some(false) => out.push(Finding::caution("Missing publication or update dates")),
                    None => {}
                }
            }
        }
        Category::ContentClarity | Category::UserExperience => {}
    }

    out
}

/// Generic findings for the score band. A positive claim is left out when
/// real signals already asserted the same fact.
fn band_findings(category: Category, score: u32, signals: Option<&RealSignalBundle>) -> Vec<Finding> {
    let structure_known = signals.is_some_and(|s| s.structure().is_some());
    let healthcare_known = signals.is_some_and(|s| s.healthcare().is_some());
    let page_speed_known = signals.is_some_and(|s| s.has_page_speed());
    let credentials_found = signals
        .and_then(|s| s.healthcare())
        .and_then(|hc| hc.has_author_credentials)
        == Some(true);
    let disclaimers_found = signals
        .and_then(|s| s.healthcare())
        .and_then(|hc| hc.has_disclaimers)
        == Some(true);

    let mut out = Vec::new();
    let high = score >= 80;
    let mid = (60..80).contains(&score);

    match category {
        Category::ContentStructure => {
            if high {
                if !structure_known {
                    out.push(Finding::positive("Content appears well-structured for healthcare topics"));
                }
                out.push(Finding::positive("Information hierarchy supports answer engine parsing"));
            } else if mid {
                out.push(Finding::caution("Content structure could better support AI comprehension"));
                if !structure_known {
                    out.push(Finding::positive("Basic organization detected"));
                }
            } else {
                out.push(Finding::deficiency("Content structure may hinder AI answer generation"));
                out.push(Finding::deficiency(
                    "Consider reorganizing with clear question-answer format",
                ));
            }
        }
        Category::AuthoritySignals => {
            if high {
                if !credentials_found {
                    out.push(Finding::positive("Domain suggests medical authority"));
                }
                out.push(Finding::positive("Content appears to follow medical writing standards"));
            } else if mid {
                out.push(Finding::caution("Author expertise could be more prominently displayed"));
                if !healthcare_known {
                    out.push(Finding::positive("Some authority indicators present"));
                }
            } else {
                out.push(Finding::deficiency("Limited medical authority signals detected"));
                out.push(Finding::deficiency(
                    "Consider adding clear author credentials and citations",
                ));
            }
        }
        Category::TechnicalOptimization => {
            if high {
                if !page_speed_known {
                    out.push(Finding::positive("Technical foundation appears solid"));
                }
                out.push(Finding::positive("Site structure supports AI crawling"));
            } else if mid {
                out.push(Finding::caution("Technical optimizations could improve AI accessibility"));
                if !page_speed_known {
                    out.push(Finding::positive("Basic technical setup detected"));
                }
            } else {
                out.push(Finding::deficiency("Technical issues may limit AI search visibility"));
                out.push(Finding::deficiency(
                    "Focus on page speed and structured data implementation",
                ));
            }
        }
        Category::ContentClarity => {
            if high {
                out.push(Finding::positive("Content style appears accessible to diverse audiences"));
                out.push(Finding::positive(
                    "Information presentation supports direct answer extraction",
                ));
            } else if mid {
                out.push(Finding::caution("Medical terminology may reduce AI comprehension"));
                out.push(Finding::positive("Some patient-friendly language detected"));
            } else {
                out.push(Finding::deficiency("Complex language may hinder AI answer generation"));
                out.push(Finding::deficiency("Consider simplifying medical explanations"));
            }
        }
        Category::YmylCompliance => {
            if high {
                if !disclaimers_found {
                    out.push(Finding::positive("Content approach aligns with YMYL best practices"));
                }
                out.push(Finding::positive("Safety and accuracy signals present"));
            } else if mid {
                out.push(Finding::caution("YMYL compliance could be strengthened"));
                if !healthcare_known {
                    out.push(Finding::positive("Basic safety considerations evident"));
                }
            } else {
                out.push(Finding::deficiency("Missing critical YMYL compliance elements"));
                out.push(Finding::deficiency(
                    "Add medical disclaimers and content governance indicators",
                ));
            }
        }
        Category::UserExperience => {
            if high {
                out.push(Finding::positive(
                    "User interface supports healthcare information seeking",
                ));
                out.push(Finding::positive(
                    "Navigation appears intuitive for patient and HCP users",
                ));
            } else if mid {
                out.push(Finding::caution("User experience could better serve healthcare audiences"));
                if !page_speed_known {
                    out.push(Finding::positive("Basic usability elements present"));
                }
            } else {
                out.push(Finding::deficiency(
                    "User experience may not meet healthcare content standards",
                ));
                out.push(Finding::deficiency("Focus on accessibility and mobile optimization"));
            }
        }
    }

    out
}

/// Prioritized next steps for the four weakest categories.
///
/// `limit` is the caller's cap (6 for the PDF, 8 on screen); the result
/// never exceeds [`SCREEN_RECOMMENDATIONS`].
pub fn recommendations(
    scores: &ScoreResult,
    signals: Option<&RealSignalBundle>,
    limit: usize,
) -> Vec<String> {
    let mut ranked: Vec<(Category, u32)> = scores.iter().collect();
    // Stable sort keeps declaration order between equal scores
    ranked.sort_by_key(|(_, score)| *score);

    let mut recs = Vec::new();
    for (category, score) in ranked.into_iter().take(WORST_CATEGORY_COUNT) {
        if score >= RECOMMENDATION_THRESHOLD {
            continue;
        }
        if let Some(signals) = signals {
            recs.extend(signal_recommendations(category, signals));
        }
        recs.extend(generic_recommendations(category).iter().map(|r| r.to_string()));
    }

    if scores.overall < GOVERNANCE_THRESHOLD {
        recs.push("Implement comprehensive content governance for medical accuracy".to_string());
        recs.push("Conduct competitive analysis of top-ranking healthcare content".to_string());
    }

    if recs.is_empty() {
        recs.extend(
            [
                "Excellent AEO foundation! Monitor AI search performance regularly",
                "Consider expanding structured data to include clinical trial information",
                "Regularly update content freshness signals for continued AI visibility",
            ]
            .iter()
            .map(|r| r.to_string()),
        );
    }

    recs.truncate(limit.min(SCREEN_RECOMMENDATIONS));
    recs
}

fn signal_recommendations(category: Category, signals: &RealSignalBundle) -> Vec<String> {
    let mut recs = Vec::new();

    match category {
        Category::TechnicalOptimization => {
            if signals.https_enabled == Some(false) {
                recs.push("URGENT: Install SSL certificate for healthcare content credibility".to_string());
            }
            if let Some(perf) = signals.performance().filter(|p| *p < 70) {
                recs.push(format!(
                    "Improve page speed (currently {perf}/100) for better AI accessibility"
                ));
            }
            if signals.technical().and_then(|t| t.has_schema) == Some(false) {
                recs.push(
                    "Add structured data markup to help AI understand your medical content".to_string(),
                );
            }
        }
        Category::ContentStructure => {
            if let Some(structure) = signals.structure() {
                if structure.has_h1 == Some(false) {
                    recs.push("Add a clear H1 heading to improve content hierarchy".to_string());
                }
                if structure.heading_count.is_some_and(|n| n < 3) {
                    recs.push("Increase heading structure to improve content scannability".to_string());
                }
            }
        }
        Category::AuthoritySignals => {
            if let Some(hc) = signals.healthcare() {
                if hc.has_author_credentials == Some(false) {
                    recs.push("Add clear medical author credentials to build content authority".to_string());
                }
                if hc.has_citations == Some(false) {
                    recs.push("Include medical citations and references to support claims".to_string());
                }
            }
        }
        Category::YmylCompliance => {
            if let Some(hc) = signals.healthcare() {
                if hc.has_disclaimers == Some(false) {
                    recs.push("CRITICAL: Add medical disclaimers for YMYL compliance".to_string());
                }
                if hc.has_dates == Some(false) {
                    recs.push("Add publication and last-updated dates to content".to_string());
                }
            }
        }
        Category::ContentClarity | Category::UserExperience => {}
    }

    recs
}

fn generic_recommendations(category: Category) -> [&'static str; 2] {
    match category {
        Category::ContentStructure => [
            "Restructure content with clear H2 sections for mechanism, dosing, and safety",
            "Add FAQ sections addressing common patient questions",
        ],
        Category::AuthoritySignals => [
            "Display medical author credentials (MD, PharmD) prominently",
            "Include direct citations to clinical trials and regulatory approvals",
        ],
        Category::TechnicalOptimization => [
            "Implement healthcare-specific schema markup for drug information",
            "Optimize page load speeds for better AI crawling",
        ],
        Category::ContentClarity => [
            "Create patient-friendly versions of complex medical content",
            "Use plain language while maintaining medical accuracy",
        ],
        Category::YmylCompliance => [
            "Add prominent medical disclaimers and safety information",
            "Include clear publication dates and content review processes",
        ],
        Category::UserExperience => [
            "Improve mobile experience for patient education content",
            "Ensure easy access to safety information and prescribing details",
        ],
    }
}
