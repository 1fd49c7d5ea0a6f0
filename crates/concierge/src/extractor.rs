//! Heuristic extraction of service cards from free-form assistant answers.
//!
//! The backend's answers are unstructured prose. When the model happens to
//! enumerate offerings we surface them as cards; otherwise the answer is shown as
//! is. Extraction runs as an ordered list of phases and the first phase that finds
//! anything wins:
//!
//! 1. [`structural::StructuralPhase`] looks for `Label: description` layouts.
//! 2. [`semantic::SemanticPhase`] scores sentences for offering language.
//!
//! The extractor is a pure function of its input and its tables.
pub mod semantic;
pub mod structural;
pub mod tables;

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::models::service::{ExtractedService, Extraction};
use semantic::SemanticPhase;
use structural::StructuralPhase;
pub use tables::{ExtractorLimits, ExtractorTables, TermSet};

lazy_static! {
    static ref HORIZONTAL_SPACE: Regex = Regex::new(r"[ \t]+").unwrap();
    static ref SPACE_AROUND_NEWLINE: Regex = Regex::new(r" ?\n ?").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// What a single phase found, before post-processing
#[derive(Debug, Clone, Default)]
pub struct PhaseOutput {
    pub services: Vec<ExtractedService>,
    pub remaining: String,
}

/// One stage of the extraction pipeline
pub trait Phase: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, text: &str) -> PhaseOutput;
}

pub struct Extractor {
    phases: Vec<Box<dyn Phase>>,
}

impl Extractor {
    /// Build the standard two-phase pipeline from the given tables
    pub fn new(tables: ExtractorTables, limits: ExtractorLimits) -> Result<Self, regex::Error> {
        let keywords = TermSet::words(&tables.keywords)?;
        let structural = StructuralPhase::new(keywords, limits.clone());
        let semantic = SemanticPhase::new(&tables, limits)?;
        Ok(Self::with_phases(vec![
            Box::new(structural),
            Box::new(semantic),
        ]))
    }

    pub fn with_phases(phases: Vec<Box<dyn Phase>>) -> Self {
        Self { phases }
    }

    pub fn phase_names(&self) -> Vec<&'static str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    /// Split an answer into service cards and the narrative left around them
    pub fn extract(&self, text: &str) -> Extraction {
        for phase in &self.phases {
            let output = phase.extract(text);
            if output.services.is_empty() {
                continue;
            }
            tracing::debug!(
                phase = phase.name(),
                count = output.services.len(),
                "Extracted services"
            );
            let mut services = output.services;
            assign_unique_ids(&mut services);
            return Extraction {
                services,
                remaining_text: normalize_whitespace(&output.remaining),
            };
        }

        Extraction {
            services: Vec::new(),
            remaining_text: normalize_whitespace(text),
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractorTables::default(), ExtractorLimits::default())
            .expect("built-in extractor tables compile")
    }
}

/// Collapse runs of spaces, drop spaces hugging line breaks, squeeze blank lines
/// down to one, and trim.
pub fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = SPACE_AROUND_NEWLINE.replace_all(&text, "\n");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Suffix `-2`, `-3`, ... onto ids already taken in this batch
fn assign_unique_ids(services: &mut [ExtractedService]) {
    let mut seen: HashSet<String> = HashSet::new();
    for service in services.iter_mut() {
        if seen.insert(service.id.clone()) {
            continue;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", service.id, n);
            if seen.insert(candidate.clone()) {
                service.id = candidate;
                break;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert_eq!(Extractor::default().phase_names(), vec!["structural", "semantic"]);
    }

    #[test]
    fn test_general_it_consulting() {
        let text = "**General IT Consulting**: We help businesses utilize unique hardware or software solutions to drive efficiency.";
        let extraction = Extractor::default().extract(text);

        assert_eq!(extraction.services.len(), 1);
        let service = &extraction.services[0];
        assert_eq!(service.title, "General IT Consulting");
        assert_eq!(service.id, "general-it-consulting");
        assert_eq!(
            service.description,
            "We help businesses utilize unique hardware or software solutions to drive efficiency."
        );
        assert!(!extraction.remaining_text.contains("We help businesses"));
    }

    #[test]
    fn test_semantic_fallback() {
        let text = "We specialize in automation solutions that save you time. We also love long walks on the beach.";
        let extraction = Extractor::default().extract(text);

        assert_eq!(extraction.services.len(), 1);
        assert_eq!(
            extraction.services[0].description,
            "We specialize in automation solutions that save you time."
        );
        assert_eq!(
            extraction.remaining_text,
            "We also love long walks on the beach."
        );
    }

    #[test]
    fn test_structural_phase_takes_precedence() {
        let text = "- Cloud Migration: We move your workloads to the cloud safely.\n\n\
                    We provide automation solutions to improve your efficiency.";
        let extractor = Extractor::default();

        // On its own the second sentence would be picked up by scoring
        let semantic_only = extractor.extract(
            "We provide automation solutions to improve your efficiency.",
        );
        assert_eq!(semantic_only.services.len(), 1);

        let extraction = extractor.extract(text);
        assert_eq!(extraction.services.len(), 1);
        assert_eq!(extraction.services[0].title, "Cloud Migration");
        assert_eq!(
            extraction.remaining_text,
            "We provide automation solutions to improve your efficiency."
        );
    }

    #[test]
    fn test_no_services_leaves_normalized_text() {
        let text = "  Thanks for reaching out!   Let me know if you have other questions.\n\n\n\nHave a   great day.  ";
        let extraction = Extractor::default().extract(text);

        assert!(extraction.services.is_empty());
        assert_eq!(extraction.remaining_text, normalize_whitespace(text));
        assert_eq!(
            extraction.remaining_text,
            "Thanks for reaching out! Let me know if you have other questions.\n\nHave a great day."
        );
        assert_eq!(extraction.display_text(text), text);
    }

    #[test]
    fn test_case_insensitive_duplicates_collapse() {
        let text = "- AI Solutions: Custom models trained for your business.\n\
                    - ai solutions: Custom models trained for your business.";
        let extraction = Extractor::default().extract(text);
        assert_eq!(extraction.services.len(), 1);
        assert_eq!(extraction.services[0].id, "ai-solutions");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "Our offerings:\n\
                    1. **Data Strategy**: Roadmaps for analytics maturity.\n\
                    2. **Process Automation**: Remove manual steps from operations.\n\
                    We provide integration support to streamline your systems.";
        let extractor = Extractor::default();
        let first = extractor.extract(text);
        let second = extractor.extract(text);
        assert_eq!(first, second);
        assert_eq!(first, Extractor::default().extract(text));
        assert_eq!(first.services.len(), 2);
    }

    #[test]
    fn test_semantic_ids_are_disambiguated() {
        let text = "Automation can reduce and streamline rework. \
                    Cloud platforms reduce and streamline costs.";
        let extraction = Extractor::default().extract(text);
        let ids: Vec<&str> = extraction.services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["service", "service-2"]);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("a  \t b"), "a b");
        assert_eq!(normalize_whitespace("a \n  \n\n\n b"), "a\n\nb");
        assert_eq!(normalize_whitespace("a\r\nb"), "a\nb");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn test_assign_unique_ids() {
        let mut services = vec![
            ExtractedService::new("Data", "one"),
            ExtractedService::new("data", "two"),
            ExtractedService::new("Data 2", "three"),
            ExtractedService::new("DATA", "four"),
        ];
        assign_unique_ids(&mut services);
        let ids: Vec<&str> = services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["data", "data-2", "data-2-2", "data-3"]);
    }
}
