use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use std::ops::Range;

use super::structural::remove_spans;
use super::tables::{ExtractorLimits, ExtractorTables, TermSet};
use super::{Phase, PhaseOutput};
use crate::models::service::ExtractedService;

lazy_static! {
    /// A run of text up to and including its terminators, or a trailing fragment
    static ref SENTENCE: Regex = Regex::new(r"[^.!?\n]+[.!?]*").unwrap();
    static ref TRAILING_PUNCTUATION: Regex = Regex::new(r"[\s.,;:!?]+$").unwrap();
}

/// Scores each sentence for offering language and turns the strong ones into
/// services.
pub struct SemanticPhase {
    business: TermSet,
    keywords: TermSet,
    actions: TermSet,
    benefits: TermSet,
    title_patterns: Vec<Regex>,
    fillers: Regex,
    fallback_title: String,
    limits: ExtractorLimits,
}

impl SemanticPhase {
    pub fn new(tables: &ExtractorTables, limits: ExtractorLimits) -> Result<Self, regex::Error> {
        let title_patterns = tables
            .title_patterns
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;

        let fillers = tables
            .title_fillers
            .iter()
            .map(|f| regex::escape(f))
            .collect::<Vec<_>>()
            .join("|");
        let fillers = RegexBuilder::new(&format!(r"^(?:(?:{})\s+)+", fillers))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            business: TermSet::patterns(&tables.business_patterns)?,
            keywords: TermSet::words(&tables.keywords)?,
            actions: TermSet::verbs(&tables.action_verbs)?,
            benefits: TermSet::verbs(&tables.benefit_verbs)?,
            title_patterns,
            fillers,
            fallback_title: tables.fallback_title.clone(),
            limits,
        })
    }

    /// Two points per offering phrase, one per keyword, action verb and benefit verb
    pub fn score(&self, sentence: &str) -> u32 {
        self.business.count(sentence) * 2
            + self.keywords.count(sentence)
            + self.actions.count(sentence)
            + self.benefits.count(sentence)
    }

    /// Title for an accepted sentence, or `None` when the cleaned title is out of bounds
    pub fn derive_title(&self, sentence: &str) -> Option<String> {
        let raw = self
            .title_patterns
            .iter()
            .find_map(|p| p.captures(sentence).and_then(|c| c.get(1)))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| self.fallback_title.clone());

        let without_fillers = self.fillers.replace(raw.trim(), "");
        let cleaned = TRAILING_PUNCTUATION.replace(&without_fillers, "");
        let title = capitalize_first(cleaned.trim());

        let len = title.chars().count();
        if len < self.limits.min_derived_title_len || len >= self.limits.max_derived_title_len {
            return None;
        }
        Some(title)
    }

    fn qualifies(&self, sentence: &str) -> bool {
        let len = sentence.chars().count();
        len >= self.limits.min_scored_sentence_len
            && len < self.limits.max_scored_sentence_len
            && self.score(sentence) >= self.limits.min_score
    }
}

impl Phase for SemanticPhase {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn extract(&self, text: &str) -> PhaseOutput {
        let mut services = Vec::new();
        let mut spans = Vec::new();

        for span in sentence_spans(text) {
            let sentence = &text[span.clone()];
            if sentence.chars().count() < self.limits.min_sentence_len {
                continue;
            }
            if !self.qualifies(sentence) {
                continue;
            }
            let Some(title) = self.derive_title(sentence) else {
                continue;
            };

            tracing::trace!(%title, score = self.score(sentence), "Accepted scored sentence");
            services.push(ExtractedService::new(title, sentence));
            spans.push(span);
        }

        PhaseOutput {
            services,
            remaining: remove_spans(text, spans),
        }
    }
}

/// Sentences in order of appearance, trimmed. Line breaks end a sentence too, so
/// headings and list items are scored on their own.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_spans(text).into_iter().map(|r| &text[r]).collect()
}

/// Byte ranges of the trimmed sentences in `text`
fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    SENTENCE
        .find_iter(text)
        .filter_map(|m| {
            let raw = m.as_str();
            let start = m.start() + (raw.len() - raw.trim_start().len());
            let end = start + raw.trim().len();
            (start < end).then_some(start..end)
        })
        .collect()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
