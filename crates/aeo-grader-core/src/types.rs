//! Common types used across the grader

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the six fixed AEO scoring dimensions, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ContentStructure,
    AuthoritySignals,
    TechnicalOptimization,
    ContentClarity,
    YmylCompliance,
    UserExperience,
}

impl Category {
    /// All categories in declaration order. The index of a category in this
    /// array is its phase offset in the score generator.
    pub const ALL: [Category; 6] = [
        Category::ContentStructure,
        Category::AuthoritySignals,
        Category::TechnicalOptimization,
        Category::ContentClarity,
        Category::YmylCompliance,
        Category::UserExperience,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Category::ContentStructure => "content-structure",
            Category::AuthoritySignals => "authority-signals",
            Category::TechnicalOptimization => "technical-optimization",
            Category::ContentClarity => "content-clarity",
            Category::YmylCompliance => "ymyl-compliance",
            Category::UserExperience => "user-experience",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::ContentStructure => "Content Structure",
            Category::AuthoritySignals => "Authority Signals",
            Category::TechnicalOptimization => "Technical Optimization",
            Category::ContentClarity => "Content Clarity",
            Category::YmylCompliance => "YMYL Compliance",
            Category::UserExperience => "User Experience",
        }
    }

    /// Percentage contribution to the overall score.
    pub fn weight(self) -> u32 {
        match self {
            Category::ContentStructure => 25,
            Category::AuthoritySignals => 20,
            Category::TechnicalOptimization => 20,
            Category::ContentClarity => 15,
            Category::YmylCompliance => 10,
            Category::UserExperience => 10,
        }
    }

    pub fn checks(self) -> [&'static str; 4] {
        match self {
            Category::ContentStructure => [
                "Clear headings and subheadings",
                "Question-answer format",
                "Logical information hierarchy",
                "Scannable content blocks",
            ],
            Category::AuthoritySignals => [
                "Author credentials and bios",
                "Medical citations and references",
                "Regulatory mentions (FDA, EMA)",
                "Clinical trial references",
            ],
            Category::TechnicalOptimization => [
                "Schema markup implementation",
                "Page load speed",
                "Mobile responsiveness",
                "Clean URL structure",
            ],
            Category::ContentClarity => [
                "Plain language usage",
                "Direct answer provision",
                "Minimal medical jargon",
                "Clear call-to-actions",
            ],
            Category::YmylCompliance => [
                "Medical disclaimers",
                "Content freshness dates",
                "Expert review process",
                "Source attribution",
            ],
            Category::UserExperience => [
                "Easy navigation",
                "Readable typography",
                "Accessible design",
                "Contact information",
            ],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::ContentStructure => {
                "The way your website's headings, subheadings, and sections are organized to improve clarity and crawlability."
            }
            Category::AuthoritySignals => {
                "Indicators like backlinks, citations, and expertise that show search engines your site is trustworthy."
            }
            Category::TechnicalOptimization => {
                "Behind-the-scenes improvements (speed, schema markup, mobile readiness) that help search engines access and understand your site."
            }
            Category::ContentClarity => {
                "Writing and formatting information so it is clear, direct, and easy for both users and algorithms to understand."
            }
            Category::YmylCompliance => {
                "Ensuring content meets Google's \"Your Money or Your Life\" standards for accuracy, safety, and trustworthiness in sensitive topics."
            }
            Category::UserExperience => {
                "How easy, helpful, and enjoyable your website feels for visitors, from navigation to readability."
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Overall and per-category grade for one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall: u32,
    pub categories: BTreeMap<Category, u32>,
    /// Whether a real-signal bundle took part in scoring
    #[serde(default)]
    pub real_data_used: bool,
}

impl ScoreResult {
    /// Score of a single category. Every category is always present.
    pub fn category(&self, category: Category) -> u32 {
        self.categories.get(&category).copied().unwrap_or_default()
    }

    /// Categories in declaration order paired with their scores.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.category(c)))
    }
}

/// Tone of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Positive,
    Caution,
    Deficiency,
}

impl FindingKind {
    pub fn marker(self) -> &'static str {
        match self {
            FindingKind::Positive => "✓",
            FindingKind::Caution => "!",
            FindingKind::Deficiency => "✗",
        }
    }
}

/// A single observation about one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub text: String,
}

impl Finding {
    pub fn positive(text: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::Positive,
            text: text.into(),
        }
    }

    pub fn caution(text: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::Caution,
            text: text.into(),
        }
    }

    pub fn deficiency(text: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::Deficiency,
            text: text.into(),
        }
    }
}
