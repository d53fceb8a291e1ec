//! Best-effort field extraction from translated problem write-ups.
//!
//! Each rule is an independent regex search over the whole text. A miss is not
//! an error: the field falls back to a fixed default. Documents that do not
//! follow the usual layout will get defaults, not a smarter guess.

pub mod complexity;
pub mod description;
pub mod prerequisites;
pub mod title;

use tracing::debug;

/// A single extracted value and whether its rule actually matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub value: String,
    pub matched: bool,
}

impl Field {
    pub fn found(value: impl Into<String>) -> Self {
        Field { value: value.into(), matched: true }
    }

    pub fn default_to(value: impl Into<String>) -> Self {
        Field { value: value.into(), matched: false }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub title: Field,
    pub description: Field,
    pub prerequisites: Field,
    pub complexity_time: Field,
    pub complexity_space: Field,
}

impl ExtractionResult {
    pub fn misses(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("prerequisites", &self.prerequisites),
            ("complexity_time", &self.complexity_time),
            ("complexity_space", &self.complexity_space),
        ]
        .into_iter()
        .filter(|(_, f)| !f.matched)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Run every rule against `text`. `source` feeds the title fallback.
pub fn extract_all(text: &str, source: &str) -> ExtractionResult {
    let result = ExtractionResult {
        title: title::extract(text, source),
        description: description::extract(text),
        prerequisites: prerequisites::extract(text),
        complexity_time: complexity::extract_time(text),
        complexity_space: complexity::extract_space(text),
    };

    let misses = result.misses();
    if !misses.is_empty() {
        debug!(source, ?misses, "extraction defaults applied");
    }
    result
}

// ── Tests ──
