use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

use super::tables::{ExtractorLimits, TermSet};
use super::{Phase, PhaseOutput};
use crate::models::service::ExtractedService;

lazy_static! {
    /// `**Label**: text` and `**Label:** text`
    static ref BOLD_LABEL: Regex =
        Regex::new(r"\*\*([^*\n]+?)\*\*[ \t]*:[ \t]*([^\n]+)").unwrap();
    static ref BOLD_LABEL_INNER_COLON: Regex =
        Regex::new(r"\*\*([^*\n]+?):\*\*[ \t]*([^\n]+)").unwrap();
    /// `- Label: text`, `* Label: text`, `• Label: text`
    static ref BULLET_LABEL: Regex =
        Regex::new(r"(?m)^[ \t]*[-*•][ \t]+([^:\n]{1,80}):[ \t]*([^\n]+)").unwrap();
    /// `1. Label: text`, `2) Label: text`
    static ref NUMBERED_LABEL: Regex =
        Regex::new(r"(?m)^[ \t]*\d+[.)][ \t]+([^:\n]{1,80}):[ \t]*([^\n]+)").unwrap();
    /// `Label: text` where the label opens a line with a capital letter
    static ref CAPITALIZED_LABEL: Regex =
        Regex::new(r"(?m)^[ \t]*([A-Z][A-Za-z0-9&/'()\- ]{2,59}):[ \t]*([^\n]+)").unwrap();
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?](?:\s|$)").unwrap();
    static ref LIST_MARKER_PREFIX: Regex = Regex::new(r"^[ \t]*(?:[-*•]|\d+[.)])?[ \t]*$").unwrap();
}

/// The label shapes recognised, in the order they are tried
pub fn label_patterns() -> [&'static Regex; 5] {
    [
        &*BOLD_LABEL,
        &*BOLD_LABEL_INNER_COLON,
        &*BULLET_LABEL,
        &*NUMBERED_LABEL,
        &*CAPITALIZED_LABEL,
    ]
}

/// Finds `Label: description` shapes laid out with markdown emphasis, bullets,
/// numbering or a leading capitalised phrase.
pub struct StructuralPhase {
    keywords: TermSet,
    limits: ExtractorLimits,
}

struct Candidate {
    span: Range<usize>,
    title: String,
    description: String,
}

impl StructuralPhase {
    pub fn new(keywords: TermSet, limits: ExtractorLimits) -> Self {
        Self { keywords, limits }
    }

    fn candidate(&self, text: &str, caps: &regex::Captures) -> Option<Candidate> {
        let whole = caps.get(0)?;
        let label = caps.get(1)?;
        let rest = caps.get(2)?;

        let title = strip_markup(label.as_str());
        let (description, end) = match SENTENCE_END.find(rest.as_str()) {
            Some(m) => (&rest.as_str()[..m.start() + 1], rest.start() + m.start() + 1),
            None => (rest.as_str(), whole.end()),
        };
        let description = description.trim().to_string();

        Some(Candidate {
            span: extend_over_list_marker(text, whole.start())..end,
            title,
            description,
        })
    }

    fn accepts(&self, candidate: &Candidate) -> bool {
        let limits = &self.limits;
        let title_len = candidate.title.chars().count();
        let description_len = candidate.description.chars().count();

        if title_len < limits.min_title_len || title_len > limits.max_title_len {
            return false;
        }
        if description_len < limits.min_description_len
            || description_len > limits.max_description_len
        {
            return false;
        }
        // `https://...` is a link, not a label
        if candidate.description.starts_with("//") {
            return false;
        }
        self.keywords.is_match(&candidate.title)
            || self.keywords.is_match(&candidate.description)
            || title_len > limits.short_title_len
    }
}

impl Phase for StructuralPhase {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn extract(&self, text: &str) -> PhaseOutput {
        let mut accepted: Vec<Candidate> = Vec::new();

        for pattern in label_patterns() {
            let mut pos = 0;
            while let Some(caps) = pattern.captures_at(text, pos) {
                let Some(whole) = caps.get(0) else {
                    break;
                };
                let candidate = self.candidate(text, &caps);
                // Resume after the description, which may stop mid-line
                pos = candidate.as_ref().map_or(whole.end(), |c| c.span.end);

                let Some(candidate) = candidate else {
                    continue;
                };
                if accepted.iter().any(|a| overlaps(&a.span, &candidate.span)) {
                    continue;
                }
                if self.accepts(&candidate) {
                    accepted.push(candidate);
                }
            }
        }

        // Services are reported in the order they appear in the answer
        accepted.sort_by_key(|c| c.span.start);

        let mut services: Vec<ExtractedService> = Vec::new();
        let mut spans: Vec<Range<usize>> = Vec::new();
        for candidate in accepted {
            let duplicate = services
                .iter()
                .any(|s| s.title.to_lowercase() == candidate.title.to_lowercase());
            if duplicate {
                continue;
            }

            tracing::trace!(title = %candidate.title, "Accepted structural service");
            spans.push(candidate.span);
            services.push(ExtractedService::new(candidate.title, candidate.description));
        }

        PhaseOutput {
            services,
            remaining: remove_spans(text, spans),
        }
    }
}

fn strip_markup(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '#' | '`'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Pull the span start back to the line start when only a list marker precedes it
fn extend_over_list_marker(text: &str, start: usize) -> usize {
    let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if LIST_MARKER_PREFIX.is_match(&text[line_start..start]) {
        line_start
    } else {
        start
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

pub(super) fn remove_spans(text: &str, mut spans: Vec<Range<usize>>) -> String {
    spans.sort_by_key(|s| s.start);
    let mut remaining = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        remaining.push_str(&text[cursor..span.start]);
        cursor = span.end;
    }
    remaining.push_str(&text[cursor..]);
    remaining
}
