use async_trait::async_trait;

use crate::core::extractor::{EntityExtractor, ExtractionError};
use crate::models::EntitySpan;

/// Rule-based extractor backed by a gazetteer of technology terms
///
/// Terms match case-insensitively on word boundaries: the byte before and
/// after a hit must not be alphanumeric. The span keeps the text as written
/// in the source; normalization happens later in the engine.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    terms: Vec<String>,
    label: String,
}

pub const DEFAULT_KEYWORD_LABEL: &str = "TECH";

impl KeywordExtractor {
    pub fn new<I, S>(terms: I, label: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        // Longest first so "spring boot" wins over "spring" at the same offset
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        terms.dedup();

        Self {
            terms,
            label: label.into(),
        }
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    fn find_spans(&self, text: &str) -> Vec<EntitySpan> {
        // ASCII lowering keeps byte offsets aligned with the original text
        let haystack = text.to_ascii_lowercase();
        let bytes = haystack.as_bytes();
        let mut hits: Vec<(usize, usize)> = Vec::new();

        for term in &self.terms {
            let mut from = 0;
            while let Some(pos) = haystack[from..].find(term.as_str()) {
                let start = from + pos;
                let end = start + term.len();
                from = start + term.len().max(1);

                let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
                let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
                let overlaps = hits.iter().any(|&(s, e)| start < e && s < end);

                if before_ok && after_ok && !overlaps {
                    hits.push((start, end));
                }

                if from >= haystack.len() {
                    break;
                }
            }
        }

        hits.sort_unstable();
        hits.into_iter()
            .map(|(start, end)| EntitySpan::new(&text[start..end], self.label.clone()))
            .collect()
    }
}

#[async_trait]
impl EntityExtractor for KeywordExtractor {
    async fn extract_entities(&self, text: &str) -> Result<Vec<EntitySpan>, ExtractionError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let spans = self.find_spans(text);
        tracing::trace!("Keyword extractor found {} spans", spans.len());
        Ok(spans)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
