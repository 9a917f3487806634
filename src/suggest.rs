//! Follow-up question suggestions.
//!
//! Mines the single best-matching chunk for `Q:`-style question lines,
//! scores them against the user's query in a TF-IDF vector space, and
//! returns the runners-up. The top-scoring extracted question is always
//! dropped: the best chunk almost always contains the user's own
//! question verbatim, and echoing it back is noise.

use anyhow::Result;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::embedding::Embedder;
use crate::index::EmbeddingIndex;

/// A line is a question candidate when it starts with the letter `Q`,
/// an optional `.` or `:`, and whitespace before the question text.
/// Uppercase only; FAQ markup uses `Q`, and a lowercase `q` at line
/// start is far more likely to be prose.
fn question_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^\s*Q[.:]?\s+(.+)$").unwrap())
}

/// Extract all question lines from a chunk's text, in document order.
pub fn extract_questions(text: &str) -> Vec<String> {
    question_pattern()
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|q| !q.is_empty())
        .collect()
}

/// Suggest up to `top_n` follow-up questions for a query.
///
/// Returns an empty list when no chunk clears `top_match_threshold` or
/// the best chunk contains no question lines.
pub async fn suggest_questions(
    index: &EmbeddingIndex,
    embedder: &dyn Embedder,
    query: &str,
    top_match_threshold: f32,
    top_n: usize,
) -> Result<Vec<String>> {
    let top = index
        .search(embedder, query, top_match_threshold, 1)
        .await?;
    let Some(best) = top.into_iter().next() else {
        return Ok(Vec::new());
    };

    let questions = extract_questions(&best.chunk.text);
    Ok(rank_questions(query, &questions, top_n))
}

/// Rank extracted questions by TF-IDF cosine similarity to the query,
/// drop the single best (self) match, and return up to `top_n` of the
/// remainder in descending order.
pub fn rank_questions(query: &str, questions: &[String], top_n: usize) -> Vec<String> {
    if questions.is_empty() {
        return Vec::new();
    }

    let query_terms = word_terms(query);
    let docs: Vec<Vec<String>> = questions.iter().map(|q| word_terms(q)).collect();
    let scores = tfidf_scores(&query_terms, &docs);

    let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
    // Stable sort: equal scores keep extraction order.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ranked
        .into_iter()
        .skip(1) // self-match drop
        .take(top_n)
        .map(|(i, _)| questions[i].clone())
        .collect()
}

/// Lowercased alphanumeric word terms.
pub(crate) fn word_terms(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cosine similarity of a query against each document in a TF-IDF
/// vector space built over {query} ∪ documents.
///
/// IDF uses the smoothed form `ln((1 + n) / (1 + df)) + 1` so terms
/// appearing in every document still contribute.
pub(crate) fn tfidf_scores(query_terms: &[String], docs: &[Vec<String>]) -> Vec<f32> {
    let corpus_size = docs.len() + 1;

    let mut document_freq: HashMap<&str, usize> = HashMap::new();
    for doc in std::iter::once(query_terms).chain(docs.iter().map(|d| d.as_slice())) {
        let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
        for term in unique {
            *document_freq.entry(term).or_insert(0) += 1;
        }
    }

    let idf = |term: &str| -> f32 {
        let df = document_freq.get(term).copied().unwrap_or(0);
        ((1.0 + corpus_size as f32) / (1.0 + df as f32)).ln() + 1.0
    };

    let weigh = |doc: &[String]| -> HashMap<String, f32> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for term in doc {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(term, count)| (term.to_string(), count as f32 * idf(term)))
            .collect()
    };

    let query_vec = weigh(query_terms);
    let query_norm: f32 = query_vec.values().map(|w| w * w).sum::<f32>().sqrt();

    docs.iter()
        .map(|doc| {
            let doc_vec = weigh(doc);
            let dot: f32 = doc_vec
                .iter()
                .filter_map(|(term, w)| query_vec.get(term).map(|qw| qw * w))
                .sum();
            let doc_norm: f32 = doc_vec.values().map(|w| w * w).sum::<f32>().sqrt();
            let denom = query_norm * doc_norm;
            if denom < f32::EPSILON {
                0.0
            } else {
                dot / denom
            }
        })
        .collect()
}
