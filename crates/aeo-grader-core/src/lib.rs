//! # aeo-grader-core
//!
//! Answer-engine-optimization (AEO) grading for healthcare and life-sciences
//! websites.
//!
//! This library provides:
//! - A deterministic, seeded score generator over six weighted categories
//! - Finding and recommendation synthesis from scores and live signals
//! - URL, domain and HTML content analysis
//! - Terminal, JSON and PDF report rendering
//!
//! ## Features
//!
//! - `default`: Scoring, analysis and text/JSON reports (no network)
//! - `live-probes`: PageSpeed Insights, HTML fetch fallback chain and
//!   Supabase submission logging
//! - `pdf-export`: Styled PDF report via printpdf
//!
//! ## Example
//!
//! ```
//! use aeo_grader_core::{AnalysisSession, ReportView, normalize_url, render_text};
//!
//! # fn example() -> aeo_grader_core::Result<()> {
//! let url = normalize_url("www.example.edu")?;
//! let session = AnalysisSession::new(url, None, None);
//! assert_eq!(session.scores.overall, 70);
//!
//! let view = ReportView::from_session(&session, aeo_grader_core::SCREEN_RECOMMENDATIONS);
//! println!("{}", render_text(&view));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod config;
pub mod content;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod findings;
pub mod report;
pub mod scoring;
pub mod session;
pub mod signals;
pub mod types;
pub mod url_utils;

#[cfg(feature = "live-probes")]
pub mod probe;

#[cfg(feature = "live-probes")]
pub mod submissions;

#[cfg(feature = "pdf-export")]
pub mod pdf;

// Re-export commonly used types
pub use config::{GraderConfig, PageSpeedStrategy, SupabaseConfig};
pub use error::{GraderError, Result};
pub use findings::{PDF_RECOMMENDATIONS, SCREEN_RECOMMENDATIONS, findings, recommendations};
pub use report::{ReportView, ScoreBand, render_text};
pub use scoring::compute_scores;
pub use session::AnalysisSession;
pub use signals::RealSignalBundle;
pub use types::{Category, Finding, FindingKind, ScoreResult};
pub use url_utils::{normalize_url, report_domain, report_filename};

pub use content::analyze_html_content;
pub use domain::analyze_domain;
pub use fallback::first_success;

#[cfg(feature = "live-probes")]
pub use probe::{ProbeClient, gather_signals};

#[cfg(feature = "live-probes")]
pub use submissions::{LeadCapture, SubmissionStore, UrlSubmission};

#[cfg(feature = "pdf-export")]
pub use pdf::{layout_report, render_pdf, write_pdf};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_pipeline_is_deterministic() {
        let url = normalize_url("http://www.example.edu").unwrap();
        assert_eq!(url, "https://example.edu");

        let first = AnalysisSession::new(url.clone(), None, None);
        let second = AnalysisSession::new(url, None, None);
        let a = ReportView::from_session(&first, SCREEN_RECOMMENDATIONS);
        let b = ReportView::from_session(&second, SCREEN_RECOMMENDATIONS);

        assert_eq!(a.overall, b.overall);
        assert_eq!(a.categories, b.categories);
        assert_eq!(a.recommendations, b.recommendations);
    }

    #[test]
    fn analyzed_page_feeds_scoring() {
        let html = r#"<html><head><meta name="viewport" content="width=device-width"></head>
            <body><h1>Title</h1><p>Consult your healthcare provider. Updated 2024.</p></body></html>"#;
        let url = "https://example.com";
        let signals = RealSignalBundle {
            https_enabled: Some(true),
            domain: analyze_domain(url),
            page_speed: None,
            content: Some(analyze_html_content(html, url)),
        };

        let baseline = compute_scores(url, None);
        let graded = compute_scores(url, Some(&signals));

        assert!(graded.real_data_used);
        assert!(graded.category(Category::YmylCompliance) > baseline.category(Category::YmylCompliance));
        for (_, score) in graded.iter() {
            assert!((10..=100).contains(&score));
        }
    }

    #[test]
    fn invalid_input_is_rejected_before_scoring() {
        assert!(matches!(normalize_url("   "), Err(GraderError::InvalidUrl(_))));
    }
}
