//! Lexical word suggestions over a static vocabulary.
//!
//! A simpler suggestion path with no retrieval involved: the user's
//! input is compared against the configured vocabulary by character
//! trigram similarity, reusing the TF-IDF scoring from the question
//! ranker. Unlike the follow-up ranker there is no self-match drop —
//! an exact vocabulary hit is a useful suggestion here.

use anyhow::{bail, Result};

use crate::suggest::tfidf_scores;

/// Character trigrams of a lowercased, padded word, so near-misses and
/// prefixes still overlap.
fn trigrams(word: &str) -> Vec<String> {
    let padded: Vec<char> = format!(" {} ", word.to_lowercase().trim()).chars().collect();
    if padded.len() < 3 {
        return vec![padded.into_iter().collect()];
    }
    padded.windows(3).map(|w| w.iter().collect()).collect()
}

/// Return up to `top_n` vocabulary entries lexically closest to
/// `user_input`, best first. Entries with no trigram overlap at all are
/// omitted.
pub fn suggest_words(vocabulary: &[String], user_input: &str, top_n: usize) -> Result<Vec<String>> {
    if user_input.trim().is_empty() {
        bail!("user_input must not be empty");
    }
    if vocabulary.is_empty() {
        bail!("no vocabulary configured");
    }

    let query = trigrams(user_input);
    let docs: Vec<Vec<String>> = vocabulary.iter().map(|w| trigrams(w)).collect();
    let scores = tfidf_scores(&query, &docs);

    let mut ranked: Vec<(usize, f32)> = scores
        .into_iter()
        .enumerate()
        .filter(|(_, score)| *score > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(ranked
        .into_iter()
        .take(top_n)
        .map(|(i, _)| vocabulary[i].clone())
        .collect())
}
