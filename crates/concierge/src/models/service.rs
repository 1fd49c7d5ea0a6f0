use serde::{Deserialize, Serialize};

/// A service offering surfaced from an assistant answer, rendered as a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedService {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl ExtractedService {
    pub fn new<T: Into<String>, D: Into<String>>(title: T, description: D) -> Self {
        let title = title.into();
        Self {
            id: slugify(&title),
            title,
            description: description.into(),
        }
    }
}

/// Result of running the extractor over one answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub services: Vec<ExtractedService>,
    pub remaining_text: String,
}

impl Extraction {
    pub fn has_services(&self) -> bool {
        !self.services.is_empty()
    }

    /// The text for the chat bubble. Without cards the original answer is shown
    /// exactly as received.
    pub fn display_text<'a>(&'a self, original: &'a str) -> &'a str {
        if self.has_services() {
            &self.remaining_text
        } else {
            original
        }
    }
}

/// Lowercase, whitespace to hyphens, then drop anything outside `[a-z0-9-]`
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}
