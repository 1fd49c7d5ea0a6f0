//! Vocabulary and thresholds for the service extractor.
//!
//! The values were tuned by hand against real answers from the backend. They are
//! kept as data so each list can be swapped or tested on its own.

use regex::{Regex, RegexBuilder};

/// Business, process and technology terms that mark a sentence or label as
/// being about an offering.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "automation",
    "business",
    "process",
    "technology",
    "software",
    "hardware",
    "solution",
    "service",
    "consulting",
    "strategy",
    "data",
    "analytics",
    "cloud",
    "integration",
    "workflow",
    "efficiency",
    "productivity",
    "digital",
    "transformation",
    "infrastructure",
    "security",
    "cybersecurity",
    "network",
    "system",
    "platform",
    "application",
    "development",
    "management",
    "operations",
    "optimization",
    "innovation",
    "training",
    "implementation",
    "enterprise",
    "crm",
    "erp",
    "chatbot",
    "website",
    "marketing",
    "compliance",
];

/// First-person offering phrasings; each match is worth two points
pub const BUSINESS_PATTERNS: &[&str] = &[
    r"\bwe\s+(?:provide|offer|deliver|speciali[sz]e|focus|help|assist|support)",
    r"\bour\s+(?:services|solutions|offerings|capabilities|expertise)\b",
];

pub const ACTION_VERBS: &[&str] = &[
    "provide",
    "offer",
    "deliver",
    "implement",
    "develop",
    "create",
    "build",
    "design",
    "optimize",
    "transform",
    "automate",
    "integrate",
];

pub const BENEFIT_VERBS: &[&str] = &[
    "improve",
    "enhance",
    "increase",
    "reduce",
    "optimize",
    "streamline",
    "accelerate",
    "boost",
    "maximize",
    "minimize",
];

/// Ordered title patterns for scored sentences; capture group 1 is the title
pub const TITLE_PATTERNS: &[&str] = &[
    r"^(?:we|our)\s+([^,:]+?)\s*(?:,|:|\s(?:is|are)\b)",
    r"\b(?:speciali[sz]e[sd]?|speciali[sz]ing|focus(?:es|ed|ing)?|experts?)\s+(?:in|on)\s+(.+?)(?:\s+(?:that|which|who|to|for|so|with)\b|[,.;:!?]|$)",
    r"\b(?:offer|provide|deliver)(?:s|ed|ing)?\s+(.+?)(?:\s+(?:that|which|who|to|for|so|with)\b|[,.;:!?]|$)",
    r"\b((?:[\w&/-]+\s+){0,2}(?:services|solutions|consulting))\b",
];

/// Words dropped from the front of a derived title
pub const TITLE_FILLERS: &[&str] = &["we", "our", "us", "you", "your", "i", "the", "a", "an"];

/// Title used when no pattern yields one
pub const FALLBACK_TITLE: &str = "Service";

/// Vocabulary the extractor matches against
#[derive(Debug, Clone)]
pub struct ExtractorTables {
    pub keywords: Vec<String>,
    pub business_patterns: Vec<String>,
    pub action_verbs: Vec<String>,
    pub benefit_verbs: Vec<String>,
    pub title_patterns: Vec<String>,
    pub title_fillers: Vec<String>,
    pub fallback_title: String,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ExtractorTables {
    fn default() -> Self {
        Self {
            keywords: owned(DOMAIN_KEYWORDS),
            business_patterns: owned(BUSINESS_PATTERNS),
            action_verbs: owned(ACTION_VERBS),
            benefit_verbs: owned(BENEFIT_VERBS),
            title_patterns: owned(TITLE_PATTERNS),
            title_fillers: owned(TITLE_FILLERS),
            fallback_title: FALLBACK_TITLE.to_string(),
        }
    }
}

/// Length bounds and score threshold. Ranges are inclusive unless noted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorLimits {
    pub min_title_len: usize,
    pub max_title_len: usize,
    pub min_description_len: usize,
    pub max_description_len: usize,
    /// Labels longer than this pass without a keyword
    pub short_title_len: usize,
    pub min_sentence_len: usize,
    pub min_score: u32,
    pub min_scored_sentence_len: usize,
    /// Exclusive
    pub max_scored_sentence_len: usize,
    pub min_derived_title_len: usize,
    /// Exclusive
    pub max_derived_title_len: usize,
}

impl Default for ExtractorLimits {
    fn default() -> Self {
        Self {
            min_title_len: 3,
            max_title_len: 60,
            min_description_len: 10,
            max_description_len: 250,
            short_title_len: 5,
            min_sentence_len: 15,
            min_score: 3,
            min_scored_sentence_len: 20,
            max_scored_sentence_len: 300,
            min_derived_title_len: 3,
            max_derived_title_len: 60,
        }
    }
}

/// A compiled, case-insensitive alternation over one table
#[derive(Debug, Clone)]
pub struct TermSet {
    regex: Option<Regex>,
}

impl TermSet {
    /// Whole terms, allowing a plural suffix
    pub fn words<S: AsRef<str>>(terms: &[S]) -> Result<Self, regex::Error> {
        Self::build(terms.iter().map(|t| {
            let term = regex::escape(t.as_ref());
            format!(r"\b{}(?:s|es)?\b", term.replace(' ', r"\s+"))
        }))
    }

    /// Verbs, allowing the common inflections
    pub fn verbs<S: AsRef<str>>(terms: &[S]) -> Result<Self, regex::Error> {
        Self::build(terms.iter().map(|t| {
            let verb = t.as_ref();
            match verb.strip_suffix('e') {
                Some(stem) => format!(r"\b{}(?:e|es|ed|ing)\b", regex::escape(stem)),
                None => format!(r"\b{}(?:s|es|ed|ing)?\b", regex::escape(verb)),
            }
        }))
    }

    /// Raw patterns
    pub fn patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        Self::build(patterns.iter().map(|p| p.as_ref().to_string()))
    }

    fn build(alternatives: impl Iterator<Item = String>) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = alternatives.map(|a| format!("(?:{})", a)).collect();
        if alternatives.is_empty() {
            return Ok(Self { regex: None });
        }
        let regex = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()?;
        Ok(Self { regex: Some(regex) })
    }

    pub fn count(&self, text: &str) -> u32 {
        self.regex
            .as_ref()
            .map(|r| r.find_iter(text).count() as u32)
            .unwrap_or(0)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().map(|r| r.is_match(text)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_match_whole_words_and_plurals() -> Result<(), regex::Error> {
        let keywords = TermSet::words(DOMAIN_KEYWORDS)?;
        assert_eq!(keywords.count("automation solutions"), 2);
        assert_eq!(keywords.count("Cloud and DATA services"), 3);
        assert_eq!(keywords.count("machine   learning"), 1);
        // "ai" must not fire inside other words
        assert_eq!(keywords.count("said maintain"), 0);
        assert!(!keywords.is_match("long walks on the beach"));
        Ok(())
    }

    #[test]
    fn test_verbs_match_inflections() -> Result<(), regex::Error> {
        let actions = TermSet::verbs(ACTION_VERBS)?;
        assert_eq!(actions.count("we provided and are providing"), 2);
        assert_eq!(actions.count("builds, designing, integrates"), 3);
        assert_eq!(actions.count("offerings"), 0);
        Ok(())
    }

    #[test]
    fn test_optimize_counts_in_both_verb_lists() -> Result<(), regex::Error> {
        let actions = TermSet::verbs(ACTION_VERBS)?;
        let benefits = TermSet::verbs(BENEFIT_VERBS)?;
        assert_eq!(actions.count("we optimize"), 1);
        assert_eq!(benefits.count("we optimize"), 1);
        Ok(())
    }

    #[test]
    fn test_business_patterns() -> Result<(), regex::Error> {
        let business = TermSet::patterns(BUSINESS_PATTERNS)?;
        assert_eq!(business.count("We specialize in data."), 1);
        assert_eq!(business.count("We offer training. Our expertise is deep."), 2);
        assert_eq!(business.count("We also love walks."), 0);
        Ok(())
    }

    #[test]
    fn test_empty_table_never_matches() -> Result<(), regex::Error> {
        let empty = TermSet::words::<&str>(&[])?;
        assert_eq!(empty.count("anything at all"), 0);
        assert!(!empty.is_match("anything"));
        Ok(())
    }

    #[test]
    fn test_default_limits() {
        let limits = ExtractorLimits::default();
        assert_eq!(limits.min_score, 3);
        assert_eq!((limits.min_title_len, limits.max_title_len), (3, 60));
        assert_eq!(
            (limits.min_description_len, limits.max_description_len),
            (10, 250)
        );
        assert_eq!(limits.max_scored_sentence_len, 300);
    }
}
