//! Schema-metadata retrieval for prompt context.
//!
//! Snippets registered at startup are ranked against the user's query by
//! token overlap and the best few are joined into the prompt context. A
//! catalog of a few schema snippets does not warrant an embedding model in
//! the loop.

use std::cmp::Ordering;
use std::collections::HashSet;

/// Context text handed to the translator when nothing is registered.
pub const NO_METADATA: &str = "No metadata available for retrieval.";

/// Separator between snippets in the joined context.
const SNIPPET_SEPARATOR: &str = "\n---\n";

#[derive(Debug, Clone)]
struct MetadataEntry {
    text: String,
    tokens: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct MetadataCatalog {
    entries: Vec<MetadataEntry>,
}

impl MetadataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metadata snippet. `source` only labels the log line.
    pub fn add_metadata(&mut self, text: &str, source: &str) {
        tracing::debug!("Registered metadata snippet from {source}");
        self.entries.push(MetadataEntry {
            text: text.to_string(),
            tokens: tokenize(text),
        });
    }

    /// Text of the first registered snippet (the schema registered at
    /// startup), used verbatim in the translator prompt.
    pub fn first_text(&self) -> Option<&str> {
        self.entries.first().map(|entry| entry.text.as_str())
    }

    /// Join the `k` snippets most relevant to `query`.
    pub fn retrieve_context(&self, query: &str, k: usize) -> String {
        if self.entries.is_empty() {
            return NO_METADATA.to_string();
        }

        let query_tokens = tokenize(query);
        let mut scored: Vec<(f64, &MetadataEntry)> = self
            .entries
            .iter()
            .map(|entry| (overlap_score(&query_tokens, &entry.tokens), entry))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        scored
            .into_iter()
            .take(k)
            .map(|(_, entry)| entry.text.as_str())
            .collect::<Vec<_>>()
            .join(SNIPPET_SEPARATOR)
    }
}

/// Lowercased word set; single characters carry no signal and are dropped.
fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.len() > 1)
        .map(str::to_lowercase)
        .collect()
}

/// Cosine similarity over binary token vectors.
fn overlap_score(query: &HashSet<String>, entry: &HashSet<String>) -> f64 {
    if query.is_empty() || entry.is_empty() {
        return 0.0;
    }
    let shared = query.intersection(entry).count() as f64;
    shared / ((query.len() as f64) * (entry.len() as f64)).sqrt()
}
