//! Report assembly and terminal rendering
//!
//! [`ReportView`] gathers everything a renderer shows for one session so
//! that the terminal, JSON and PDF outputs all print the same integers.

use serde::Serialize;
use std::fmt::Write as _;

use crate::findings::{findings, recommendations};
use crate::session::AnalysisSession;
use crate::types::{Category, Finding};

/// Reports at or below this overall score include the consultation offer.
pub const CONSULTATION_THRESHOLD: u32 = 75;

const DIVIDER: &str = "─────────────────────────────────────────────────────────────";
const LABEL_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => ScoreBand::Excellent,
            80..=89 => ScoreBand::Good,
            70..=79 => ScoreBand::Fair,
            60..=69 => ScoreBand::Poor,
            _ => ScoreBand::Critical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::Poor => "Poor",
            ScoreBand::Critical => "Critical",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent! Your website is highly optimized for answer engines.",
            ScoreBand::Good => "Good work! Your website has solid AEO with room for improvement.",
            ScoreBand::Fair => {
                "Fair performance. Several AEO opportunities identified for better AI visibility."
            }
            ScoreBand::Poor => {
                "Needs improvement. Multiple issues preventing optimal answer engine performance."
            }
            ScoreBand::Critical => {
                "Critical issues detected. Significant AEO work needed for AI search visibility."
            }
        }
    }
}

/// Terms explained at the end of every exported report.
pub const GLOSSARY: [(&str, &str); 12] = [
    (
        "Answer Engine Optimization (AEO)",
        "The practice of structuring your website so AI-driven search engines and answer engines can easily understand and surface your content.",
    ),
    (
        "Content Structure",
        "The way your website's headings, subheadings, and sections are organized to improve clarity and crawlability.",
    ),
    (
        "Authority Signals",
        "Indicators like backlinks, citations, and expertise that show search engines your site is trustworthy.",
    ),
    (
        "Technical Optimization",
        "Behind-the-scenes improvements (speed, schema markup, mobile readiness) that help search engines access and understand your site.",
    ),
    (
        "Content Clarity",
        "Writing and formatting information so it is clear, direct, and easy for both users and algorithms to understand.",
    ),
    (
        "YMYL Compliance",
        "Ensuring content meets Google's \"Your Money or Your Life\" standards for accuracy, safety, and trustworthiness in sensitive topics.",
    ),
    (
        "User Experience (UX)",
        "How easy, helpful, and enjoyable your website feels for visitors, from navigation to readability.",
    ),
    (
        "Featured Snippets",
        "Short highlighted answers at the top of Google results, often pulled from well-structured AEO content.",
    ),
    (
        "Schema Markup",
        "A type of structured data code that helps search engines interpret and display your content more effectively.",
    ),
    (
        "E-E-A-T",
        "Google's quality framework: Experience, Expertise, Authoritativeness, and Trustworthiness.",
    ),
    (
        "Knowledge Graph",
        "Google's database of interconnected facts that powers quick answers and information panels.",
    ),
    (
        "Search Intent",
        "The underlying reason a user makes a query (informational, transactional, navigational), which guides how you should structure your content.",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub category: Category,
    pub name: &'static str,
    pub weight: u32,
    pub score: u32,
    pub description: &'static str,
    pub findings: Vec<Finding>,
}

/// One line of the "what was checked" summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedCheck {
    pub label: String,
    /// False for the domain-only fallback marker
    pub live: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub headline: &'static str,
    pub checks: Vec<CompletedCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub session_id: String,
    pub url: String,
    pub domain: String,
    pub analyzed_at: String,
    /// Long-form date shown in the PDF, e.g. "March 4, 2025"
    pub analysis_date: String,
    pub overall: u32,
    pub band: ScoreBand,
    pub band_description: &'static str,
    pub categories: Vec<CategoryView>,
    pub recommendations: Vec<String>,
    pub analysis: Option<AnalysisSummary>,
    pub real_data_used: bool,
    pub consultation_offered: bool,
}

impl ReportView {
    /// Collect the report for `session`, keeping at most `limit`
    /// recommendations.
    pub fn from_session(session: &AnalysisSession, limit: usize) -> Self {
        let signals = session.signals.as_ref();
        let overall = session.scores.overall;
        let band = ScoreBand::from_score(overall);

        let categories = session
            .scores
            .iter()
            .map(|(category, score)| CategoryView {
                category,
                name: category.name(),
                weight: category.weight(),
                score,
                description: category.description(),
                findings: findings(category, score, signals),
            })
            .collect();

        Self {
            session_id: session.id.to_string(),
            url: session.url.clone(),
            domain: session.domain(),
            analyzed_at: session.analyzed_at.to_rfc3339(),
            analysis_date: session.analyzed_at.format("%B %-d, %Y").to_string(),
            overall,
            band,
            band_description: band.description(),
            categories,
            recommendations: recommendations(&session.scores, signals, limit),
            analysis: signals.map(|_| analysis_summary(session)),
            real_data_used: session.real_data_used(),
            consultation_offered: overall <= CONSULTATION_THRESHOLD,
        }
    }
}

fn analysis_summary(session: &AnalysisSession) -> AnalysisSummary {
    let signals = session.signals.as_ref();
    let mut checks = Vec::new();
    let check = |label: String| CompletedCheck { label, live: true };

    if let Some(ps) = signals.and_then(|s| s.page_speed.as_ref()) {
        checks.push(check(format!(
            "Page Speed Analysis ({}/100)",
            display_score(ps.performance)
        )));
        checks.push(check(format!(
            "Accessibility Testing ({}/100)",
            display_score(ps.accessibility)
        )));
    }

    let has_content = signals.is_some_and(|s| s.has_content());
    if has_content {
        checks.push(check("Content Structure Analysis".to_string()));
        checks.push(check("Healthcare Content Review".to_string()));
        checks.push(check("Technical SEO Audit".to_string()));
    }

    checks.push(check("Domain Authority Assessment".to_string()));
    checks.push(check("Security Configuration Check".to_string()));

    if session.real_data_used() {
        checks.push(check("Live Website Data Retrieved".to_string()));
    } else {
        checks.push(CompletedCheck {
            label: "Rapid Domain-Based Assessment".to_string(),
            live: false,
        });
    }

    AnalysisSummary {
        headline: if has_content {
            "Comprehensive Analysis Completed"
        } else {
            "Rapid Analysis Completed"
        },
        checks,
    }
}

fn display_score(score: Option<u8>) -> String {
    score.map_or_else(|| "N/A".to_string(), |s| s.to_string())
}

/// Plain-text report for the terminal.
pub fn render_text(view: &ReportView) -> String {
    let mut output = String::new();

    push_section_header(&mut output, "🩺", &format!("AEO Report: {}", view.domain));
    push_key_value(&mut output, "URL", &view.url);
    push_key_value(&mut output, "Analysis Date", &view.analysis_date);
    push_key_value(&mut output, "Overall Score", &format!("{}/100", view.overall));
    push_key_value(&mut output, "Rating", view.band.label());
    let _ = writeln!(&mut output, "{}", view.band_description);
    let _ = writeln!(&mut output);

    if let Some(analysis) = view.analysis.as_ref() {
        push_section_header(&mut output, "✅", analysis.headline);
        for check in &analysis.checks {
            let marker = if check.live { "✓" } else { "⚡" };
            let _ = writeln!(&mut output, "  {marker} {}", check.label);
        }
        let _ = writeln!(&mut output);
    }

    push_section_header(&mut output, "📊", "Category Performance");
    for category in &view.categories {
        let _ = writeln!(
            &mut output,
            "• {:<24} {:>3}/100  ({}% weight)",
            category.name, category.score, category.weight
        );
        for finding in &category.findings {
            let _ = writeln!(&mut output, "    {} {}", finding.kind.marker(), finding.text);
        }
    }
    let _ = writeln!(&mut output);

    push_section_header(&mut output, "🎯", "Priority Recommendations");
    for (i, rec) in view.recommendations.iter().enumerate() {
        let _ = writeln!(&mut output, "{:>2}. {rec}", i + 1);
    }
    let _ = writeln!(&mut output);

    if view.consultation_offered {
        push_section_header(&mut output, "💬", "Free Consultation");
        let _ = writeln!(
            &mut output,
            "Your score leaves room to grow. Run `aeo-grader lead` to request a free AEO strategy session."
        );
        let _ = writeln!(&mut output);
    }

    output
}

fn push_section_header(buf: &mut String, icon: &str, title: &str) {
    let _ = writeln!(buf, "{DIVIDER}");
    let _ = writeln!(buf, "{icon} {title}");
    let _ = writeln!(buf, "{DIVIDER}");
}

fn push_key_value(buf: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(buf, "• {:<width$} : {}", label, value, width = LABEL_WIDTH);
}
