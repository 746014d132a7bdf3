//! Deterministic score generator
//!
//! A URL always maps to the same grade. The seed is a 32-bit polynomial
//! rolling hash of the canonical URL; keyword heuristics move the base
//! score, the seed spreads the six categories around it, and an optional
//! real-signal bundle nudges the result.

use std::collections::BTreeMap;

use crate::signals::RealSignalBundle;
use crate::types::{Category, ScoreResult};

const BASE_SCORE: i64 = 60;
const FLOOR_BASELINE: i64 = 25;
const FLOOR_WITH_SIGNALS: i64 = 10;
const CEILING: i64 = 100;

/// Substring heuristics applied to the canonical URL, in order.
const KEYWORD_ADJUSTMENTS: &[(&[&str], i64)] = &[
    (&[".edu", ".gov"], 15),
    (&["pharma", "bio", "med"], 8),
    (&["health", "clinical"], 5),
    (&["fda", "nih"], 12),
    (&["wordpress", "wix", "squarespace"], -8),
    (&["blogspot", "tumblr"], -10),
];

/// Lowercase the URL and drop the first scheme and the first `www.` label.
pub fn canonicalize(url: &str) -> String {
    let lower = url.to_lowercase();
    let without_scheme = remove_first(&lower, &["https://", "http://"]);
    remove_first(&without_scheme, &["www."])
}

fn remove_first(haystack: &str, needles: &[&str]) -> String {
    let earliest = needles
        .iter()
        .filter_map(|needle| haystack.find(needle).map(|pos| (pos, needle.len())))
        .min_by_key(|(pos, _)| *pos);

    match earliest {
        Some((pos, len)) => format!("{}{}", &haystack[..pos], &haystack[pos + len..]),
        None => haystack.to_string(),
    }
}

/// Polynomial rolling hash over UTF-16 code units with `i32` wraparound.
///
/// Each step computes `(hash << 5) - hash + unit`, truncated to a signed
/// 32-bit integer.
pub fn string_hash(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Absolute value of [`string_hash`], widened so `i32::MIN` stays positive.
pub fn seed_for(canonical: &str) -> i64 {
    i64::from(string_hash(canonical)).abs()
}

/// Base score before per-category variation.
pub fn base_score(canonical: &str, signals: Option<&RealSignalBundle>) -> i64 {
    let mut base = BASE_SCORE;

    for (patterns, delta) in KEYWORD_ADJUSTMENTS {
        if patterns.iter().any(|p| canonical.contains(p)) {
            base += delta;
        }
    }

    if let Some(signals) = signals {
        if signals.https_enabled == Some(true) {
            base += 5;
        }
        if let Some(domain) = signals.domain.as_ref() {
            if domain.is_medical {
                base += 8;
            }
            if domain.is_educational {
                base += 10;
            }
        }
        if signals.performance().is_some_and(|p| p > 80) {
            base += 7;
        }
        if signals.accessibility().is_some_and(|a| a > 90) {
            base += 5;
        }
    }

    base
}

/// Deterministic offset in [-15, 14] for the category at `index`.
pub fn variation(seed: i64, index: usize) -> i64 {
    (seed + index as i64 * 1000).rem_euclid(30) - 15
}

/// Grade a normalized URL, optionally nudged by real signals.
///
/// Pure and total: identical inputs always give identical output, and no
/// input string can make it fail.
pub fn compute_scores(url: &str, signals: Option<&RealSignalBundle>) -> ScoreResult {
    let canonical = canonicalize(url);
    let seed = seed_for(&canonical);
    let base = base_score(&canonical, signals);

    let categories: BTreeMap<Category, u32> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, &category)| {
            let raw = (base + variation(seed, i)).clamp(FLOOR_BASELINE, CEILING);
            let score = match signals {
                Some(signals) => adjust_with_signals(category, raw, signals),
                None => raw,
            };
            (category, score as u32)
        })
        .collect();

    ScoreResult {
        overall: weighted_overall(&categories),
        categories,
        real_data_used: signals.is_some(),
    }
}

/// `round(Σ score * weight / 100)` with half rounding up, in exact integers.
pub fn weighted_overall(categories: &BTreeMap<Category, u32>) -> u32 {
    let weighted: u32 = categories
        .iter()
        .map(|(category, score)| score * category.weight())
        .sum();
    (weighted + 50) / 100
}

/// Per-category real-signal deltas, reclamped to [10, 100].
pub fn adjust_with_signals(category: Category, score: i64, signals: &RealSignalBundle) -> i64 {
    let mut adjusted = score;

    match category {
        Category::TechnicalOptimization => {
            if let Some(perf) = signals.performance() {
                if perf > 90 {
                    adjusted += 10;
                } else if perf > 75 {
                    adjusted += 5;
                } else if perf < 50 {
                    adjusted -= 15;
                }
            }
            if signals.https_enabled == Some(false) {
                adjusted -= 20;
            }
        }
        Category::ContentStructure => {
            if let Some(structure) = signals.structure() {
                let heading_count = structure.heading_count.unwrap_or(0);
                match structure.has_h1 {
                    Some(true) if heading_count > 3 => adjusted += 8,
                    Some(false) => adjusted -= 15,
                    _ => {}
                }
                if structure.proper_hierarchy() == Some(true) {
                    adjusted += 5;
                }
            }
        }
        Category::AuthoritySignals => {
            if let Some(hc) = signals.healthcare() {
                if hc.has_author_credentials == Some(true) {
                    adjusted += 10;
                }
                if hc.has_citations == Some(true) {
                    adjusted += 8;
                }
                if hc.regulatory_mentions.is_some_and(|n| n > 2) {
                    adjusted += 5;
                }
            }
        }
        Category::YmylCompliance => {
            if let Some(hc) = signals.healthcare() {
                match hc.has_disclaimers {
                    Some(true) => adjusted += 15,
                    Some(false) => adjusted -= 20,
                    None => {}
                }
                if hc.has_dates == Some(true) {
                    adjusted += 8;
                }
            }
        }
        Category::UserExperience => {
            if signals.accessibility().is_some_and(|a| a > 90) {
                adjusted += 10;
            }
            if signals.technical().and_then(|t| t.has_viewport_meta) == Some(true) {
                adjusted += 5;
            }
        }
        Category::ContentClarity => {}
    }

    adjusted.clamp(FLOOR_WITH_SIGNALS, CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{
        ContentAnalysis, DomainAnalysis, HealthcareAnalysis, HeadingHierarchy, PageSpeedData,
        StructureAnalysis, TechnicalSeo,
    };

    fn strong_bundle() -> RealSignalBundle {
        RealSignalBundle {
            https_enabled: Some(true),
            domain: Some(DomainAnalysis {
                is_medical: true,
                ..Default::default()
            }),
            page_speed: Some(PageSpeedData {
                performance: Some(95),
                accessibility: Some(96),
                seo: Some(90),
                ..Default::default()
            }),
            content: Some(ContentAnalysis {
                structure: Some(StructureAnalysis {
                    has_h1: Some(true),
                    heading_count: Some(8),
                    heading_hierarchy: Some(HeadingHierarchy {
                        proper: true,
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                technical: Some(TechnicalSeo {
                    has_schema: Some(true),
                    has_viewport_meta: Some(true),
                    ..Default::default()
                }),
                healthcare: Some(HealthcareAnalysis {
                    has_author_credentials: Some(true),
                    has_citations: Some(true),
                    has_disclaimers: Some(true),
                    has_dates: Some(true),
                    regulatory_mentions: Some(3),
                    ..Default::default()
                }),
                quality: None,
            }),
        }
    }

    #[test]
    fn hash_matches_pinned_values() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("example.edu"), -1_944_011_470);
        assert_eq!(string_hash("example.com"), -1_944_013_059);
        assert_eq!(string_hash("fda.gov/drugs"), -1_012_385_977);
        assert_eq!(string_hash("mywordpress.blogspot.com"), 1_536_846_136);
    }

    #[test]
    fn hash_walks_utf16_code_units() {
        // Includes a character outside the Basic Multilingual Plane
        assert_eq!(seed_for("héllo✓𝄞"), 404_989_231);
    }

    #[test]
    fn canonicalize_drops_scheme_and_www() {
        assert_eq!(canonicalize("https://www.Example.EDU"), "example.edu");
        assert_eq!(canonicalize("http://example.com/path"), "example.com/path");
        assert_eq!(canonicalize("example.com"), "example.com");
        assert_eq!(canonicalize("https://a.com/www.b"), "a.com/b");
    }

    #[test]
    fn example_edu_matches_pinned_computation() {
        let result = compute_scores("https://example.edu", None);
        let seed = seed_for("example.edu");
        assert_eq!(seed, 1_944_011_470);

        for (i, category) in Category::ALL.iter().enumerate() {
            let expected = (75 + (seed + i as i64 * 1000) % 30 - 15).clamp(25, 100) as u32;
            assert_eq!(result.category(*category), expected, "{category}");
        }

        let values: Vec<u32> = result.iter().map(|(_, s)| s).collect();
        assert_eq!(values, vec![70, 80, 60, 70, 80, 60]);
        assert_eq!(result.overall, 70);
        assert!(!result.real_data_used);
    }

    #[test]
    fn keyword_adjustments_stack() {
        let canonical = canonicalize("https://fda.gov/drugs");
        assert_eq!(base_score(&canonical, None), 60 + 15 + 12);

        let canonical = canonicalize("https://mywordpress.blogspot.com");
        assert_eq!(base_score(&canonical, None), 60 - 8 - 10);

        let canonical = canonicalize("https://biohealth-clinical.com");
        assert_eq!(base_score(&canonical, None), 60 + 8 + 5);
    }

    #[test]
    fn scores_are_deterministic() {
        for url in ["https://example.com", "https://pfizer.com/medicines", "", "not a url"] {
            assert_eq!(compute_scores(url, None), compute_scores(url, None));
        }
        let bundle = strong_bundle();
        assert_eq!(
            compute_scores("https://example.com", Some(&bundle)),
            compute_scores("https://example.com", Some(&bundle))
        );
    }

    #[test]
    fn empty_input_still_scores() {
        let result = compute_scores("", None);
        let values: Vec<u32> = result.iter().map(|(_, s)| s).collect();
        assert_eq!(values, vec![45, 55, 65, 45, 55, 65]);
        assert_eq!(result.overall, 54);
    }

    #[test]
    fn baseline_scores_stay_in_range() {
        let urls = [
            "https://fda.gov/nih/pharma/health",
            "https://wix.blogspot.com",
            "https://a",
            "https://example.com/some/very/long/path?with=query",
        ];
        for url in urls {
            let result = compute_scores(url, None);
            for (_, score) in result.iter() {
                assert!((25..=100).contains(&score), "{url}: {score}");
            }
        }
    }

    #[test]
    fn signal_scores_stay_in_range() {
        let harsh = RealSignalBundle {
            https_enabled: Some(false),
            page_speed: Some(PageSpeedData {
                performance: Some(10),
                accessibility: Some(20),
                ..Default::default()
            }),
            content: Some(ContentAnalysis {
                structure: Some(StructureAnalysis {
                    has_h1: Some(false),
                    ..Default::default()
                }),
                healthcare: Some(HealthcareAnalysis {
                    has_disclaimers: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        for bundle in [harsh, strong_bundle(), RealSignalBundle::default()] {
            for url in ["https://wix.blogspot.com", "https://fda.gov"] {
                let result = compute_scores(url, Some(&bundle));
                for (_, score) in result.iter() {
                    assert!((10..=100).contains(&score), "{url}: {score}");
                }
                assert!(result.real_data_used);
            }
        }
    }

    #[test]
    fn overall_is_weighted_sum_of_categories() {
        let bundle = strong_bundle();
        for url in ["https://example.com", "https://example.edu", "https://x.org/med"] {
            for signals in [None, Some(&bundle)] {
                let result = compute_scores(url, signals);
                let weighted: u32 = result.iter().map(|(c, s)| s * c.weight()).sum();
                let expected = (f64::from(weighted) / 100.0).round() as u32;
                assert_eq!(result.overall, expected);
            }
        }
    }

    #[test]
    fn weights_sum_to_one_hundred() {
        let total: u32 = Category::ALL.iter().map(|c| c.weight()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn https_disabled_penalizes_technical_optimization() {
        let url = "https://example.com";
        let baseline = compute_scores(url, None).category(Category::TechnicalOptimization);
        let bundle = RealSignalBundle {
            https_enabled: Some(false),
            ..Default::default()
        };

        let adjusted = compute_scores(url, Some(&bundle)).category(Category::TechnicalOptimization);
        assert_eq!(i64::from(adjusted), (i64::from(baseline) - 20).max(10));
    }

    #[test]
    fn empty_bundle_matches_baseline_scores() {
        let url = "https://example.com";
        let baseline = compute_scores(url, None);
        let with_empty = compute_scores(url, Some(&RealSignalBundle::default()));
        assert_eq!(baseline.categories, with_empty.categories);
        assert_eq!(baseline.overall, with_empty.overall);
    }

    #[test]
    fn strong_signals_lift_every_adjusted_category() {
        let url = "https://example.com";
        let bundle = strong_bundle();
        let result = compute_scores(url, Some(&bundle));

        // base 60 + https 5 + medical 8 + performance 7 + accessibility 5 = 85
        let seed = seed_for("example.com");
        let raw = |i: usize| (85 + variation(seed, i)).clamp(25, 100);
        assert_eq!(i64::from(result.category(Category::ContentStructure)), (raw(0) + 13).min(100));
        assert_eq!(i64::from(result.category(Category::AuthoritySignals)), (raw(1) + 23).min(100));
        assert_eq!(i64::from(result.category(Category::TechnicalOptimization)), (raw(2) + 10).min(100));
        assert_eq!(i64::from(result.category(Category::ContentClarity)), raw(3));
        assert_eq!(i64::from(result.category(Category::YmylCompliance)), (raw(4) + 23).min(100));
        assert_eq!(i64::from(result.category(Category::UserExperience)), (raw(5) + 15).min(100));
    }

    #[test]
    fn absent_facts_do_not_adjust() {
        let bundle = RealSignalBundle {
            content: Some(ContentAnalysis {
                structure: Some(StructureAnalysis::default()),
                healthcare: Some(HealthcareAnalysis::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        for category in Category::ALL {
            assert_eq!(adjust_with_signals(category, 50, &bundle), 50, "{category}");
        }
    }

    #[test]
    fn variation_spans_fixed_window() {
        for seed in [0, 1, 29, 1_944_011_470, i64::from(i32::MAX) + 1] {
            for i in 0..6 {
                assert!((-15..=14).contains(&variation(seed, i)));
            }
        }
    }
}
