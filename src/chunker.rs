use tracing::{debug, warn};

use crate::error::TranslationChunkError;
use crate::translate::Translate;

pub const PARAGRAPH_SEP: &str = "\n\n";

/// Outcome of translating a single chunk.
#[derive(Debug)]
pub enum ChunkResult {
    Translated(String),
    /// Whitespace-only chunk, kept as-is without a translation call.
    Blank(String),
    Skipped(TranslationChunkError),
}

/// Reassembled output of a chunked translation.
#[derive(Debug)]
pub struct TranslatedDocument {
    pub text: String,
    pub chunks: usize,
    pub translated: usize,
    pub skipped: Vec<TranslationChunkError>,
}

impl TranslatedDocument {
    /// True when no chunk produced translated content.
    pub fn is_empty(&self) -> bool {
        self.translated == 0
    }
}

pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split(PARAGRAPH_SEP).collect()
}

/// Greedily packs consecutive paragraphs into chunks of at most `ceiling` chars
/// (separators included). A paragraph longer than the ceiling becomes its own chunk.
pub fn chunk_paragraphs(paragraphs: &[&str], ceiling: usize) -> Vec<String> {
    let sep_len = PARAGRAPH_SEP.chars().count();
    let mut chunks = Vec::new();
    let mut current: Option<(String, usize)> = None;

    for p in paragraphs {
        let p_len = p.chars().count();
        current = match current.take() {
            Some((mut buf, len)) if len + sep_len + p_len <= ceiling => {
                buf.push_str(PARAGRAPH_SEP);
                buf.push_str(p);
                Some((buf, len + sep_len + p_len))
            }
            Some((buf, _)) => {
                chunks.push(buf);
                Some((p.to_string(), p_len))
            }
            None => Some((p.to_string(), p_len)),
        };
    }

    if let Some((buf, _)) = current {
        chunks.push(buf);
    }
    chunks
}

/// Translates long documents chunk by chunk under a per-call size ceiling.
pub struct ChunkTranslator<'a, T> {
    translator: &'a T,
    ceiling: usize,
}

impl<'a, T: Translate> ChunkTranslator<'a, T> {
    pub fn new(translator: &'a T, ceiling: usize) -> Self {
        ChunkTranslator { translator, ceiling }
    }

    pub async fn translate_chunk(&self, index: usize, chunk: &str) -> ChunkResult {
        if chunk.trim().is_empty() {
            return ChunkResult::Blank(chunk.to_string());
        }
        match self.translator.translate(chunk).await {
            Ok(t) if !t.trim().is_empty() => ChunkResult::Translated(t),
            Ok(_) => ChunkResult::Skipped(TranslationChunkError::Empty { index }),
            Err(e) => ChunkResult::Skipped(e.at(index)),
        }
    }

    /// Chunks run one after another; a failed chunk is logged and dropped.
    pub async fn translate_document(&self, text: &str) -> TranslatedDocument {
        let paragraphs = split_paragraphs(text);
        let chunks = chunk_paragraphs(&paragraphs, self.ceiling);
        let total = chunks.len();

        let mut parts = Vec::with_capacity(total);
        let mut translated = 0;
        let mut skipped = Vec::new();

        for (i, chunk) in chunks.iter().enumerate() {
            match self.translate_chunk(i, chunk).await {
                ChunkResult::Translated(t) => {
                    debug!(chunk = i + 1, total, chars = chunk.chars().count(), "chunk translated");
                    translated += 1;
                    parts.push(t);
                }
                ChunkResult::Blank(b) => parts.push(b),
                ChunkResult::Skipped(e) => {
                    warn!(chunk = e.index() + 1, total, "skipping chunk: {}", e);
                    skipped.push(e);
                }
            }
        }

        TranslatedDocument {
            text: parts.join(PARAGRAPH_SEP),
            chunks: total,
            translated,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct Identity;

    impl Translate for Identity {
        async fn translate(&self, text: &str) -> Result<String, TranslationChunkError> {
            Ok(text.to_string())
        }
    }

    /// Upper-cases text, fails on the listed call numbers, records every input.
    struct Scripted {
        fail_on: Vec<usize>,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(fail_on: Vec<usize>) -> Self {
            Scripted { fail_on, seen: RefCell::new(Vec::new()) }
        }
    }

    impl Translate for Scripted {
        async fn translate(&self, text: &str) -> Result<String, TranslationChunkError> {
            let call = {
                let mut seen = self.seen.borrow_mut();
                seen.push(text.to_string());
                seen.len() - 1
            };
            if self.fail_on.contains(&call) {
                return Err(TranslationChunkError::Request {
                    index: 0,
                    reason: "429 Too Many Requests".into(),
                });
            }
            Ok(text.to_uppercase())
        }
    }

    fn para(ch: char, n: usize) -> String {
        std::iter::repeat(ch).take(n).collect()
    }

    #[test]
    fn packs_paragraphs_greedily() {
        let (a, b, c) = (para('a', 4), para('b', 4), para('c', 4));
        let chunks = chunk_paragraphs(&[&a, &b, &c], 10);
        assert_eq!(chunks, vec![format!("{a}\n\n{b}"), c]);
    }

    #[test]
    fn chunks_respect_ceiling_except_oversized_paragraph() {
        let big = para('x', 50);
        let small = para('y', 8);
        let paragraphs = vec![small.as_str(), big.as_str(), small.as_str(), small.as_str()];
        let chunks = chunk_paragraphs(&paragraphs, 20);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1], big);
        for c in chunks.iter().filter(|c| **c != big) {
            assert!(c.chars().count() <= 20, "chunk too long: {c:?}");
        }
    }

    #[test]
    fn ceiling_counts_characters_not_bytes() {
        let zh = "两数之和";
        let chunks = chunk_paragraphs(&[zh, zh], 10);
        assert_eq!(chunks.len(), 1);
    }

    #[tokio::test]
    async fn identity_translation_reassembles_exactly() {
        let text = "# Title\n\nFirst paragraph\nwith two lines.\n\n```\ncode\n```\n\n\n\nTrailing";
        for ceiling in [1, 12, 30, 3000] {
            let doc = ChunkTranslator::new(&Identity, ceiling).translate_document(text).await;
            if ceiling > 30 {
                assert_eq!(doc.chunks, 1);
            }
            assert_eq!(doc.text, text, "ceiling {ceiling}");
            assert!(doc.skipped.is_empty());
        }
    }

    #[tokio::test]
    async fn failed_chunk_is_dropped_in_order() {
        let text = [para('a', 8), para('b', 8), para('c', 8)].join(PARAGRAPH_SEP);
        let translator = Scripted::new(vec![1]);
        let doc = ChunkTranslator::new(&translator, 8).translate_document(&text).await;

        assert_eq!(doc.chunks, 3);
        assert_eq!(doc.translated, 2);
        assert_eq!(doc.skipped.len(), 1);
        assert_eq!(doc.skipped[0].index(), 1);
        assert_eq!(doc.text, format!("{}\n\n{}", para('A', 8), para('C', 8)));
        assert!(!doc.is_empty());
    }

    /// Returns an empty string for the listed call numbers.
    struct Silent {
        empty_on: Vec<usize>,
        calls: RefCell<usize>,
    }

    impl Translate for Silent {
        async fn translate(&self, text: &str) -> Result<String, TranslationChunkError> {
            let call = {
                let mut calls = self.calls.borrow_mut();
                *calls += 1;
                *calls - 1
            };
            if self.empty_on.contains(&call) {
                return Ok(String::new());
            }
            Ok(text.to_uppercase())
        }
    }

    #[tokio::test]
    async fn empty_translation_counts_as_failure() {
        let text = [para('a', 8), para('b', 8), para('c', 8)].join(PARAGRAPH_SEP);
        let translator = Silent { empty_on: vec![1], calls: RefCell::new(0) };
        let doc = ChunkTranslator::new(&translator, 8).translate_document(&text).await;

        assert_eq!(doc.translated, 2);
        assert_eq!(doc.skipped.len(), 1);
        assert!(matches!(doc.skipped[0], TranslationChunkError::Empty { index: 1 }));
        assert_eq!(doc.text, format!("{}\n\n{}", para('A', 8), para('C', 8)));
    }

    #[tokio::test]
    async fn translator_never_sees_oversized_chunk() {
        let text = (0..40).map(|i| format!("paragraph {i}")).collect::<Vec<_>>().join(PARAGRAPH_SEP);
        let translator = Scripted::new(vec![]);
        ChunkTranslator::new(&translator, 50).translate_document(&text).await;

        let seen = translator.seen.borrow();
        assert!(seen.len() > 1);
        assert!(seen.iter().all(|c| c.chars().count() <= 50));
    }

    #[tokio::test]
    async fn all_chunks_failing_is_empty() {
        let text = [para('a', 8), para('b', 8)].join(PARAGRAPH_SEP);
        let translator = Scripted::new(vec![0, 1]);
        let doc = ChunkTranslator::new(&translator, 8).translate_document(&text).await;
        assert!(doc.is_empty());
        assert_eq!(doc.skipped.len(), 2);
    }

    #[tokio::test]
    async fn blank_input_is_empty_without_calls() {
        let translator = Scripted::new(vec![]);
        let doc = ChunkTranslator::new(&translator, 3000).translate_document("\n\n  \n\n").await;
        assert!(doc.is_empty());
        assert!(translator.seen.borrow().is_empty());
    }
}
