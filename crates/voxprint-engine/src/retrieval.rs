//! Lexical example retrieval.
//!
//! Scores candidates by word-set overlap with the topic: lowercase both,
//! split on whitespace, count the intersection. No stemming, no
//! embeddings — this is the documented extension point for anything
//! smarter, and nothing else depends on the scoring being lexical.

use std::collections::HashSet;

use voxprint_core::record::SourceRecord;

/// The top-`k` historical texts sharing at least one word with `topic`,
/// highest overlap first. Ties keep the input (recency) order.
pub fn similar_texts(
  records: &[SourceRecord],
  topic: &str,
  k: usize,
) -> Vec<String> {
  let topic_words: HashSet<String> =
    topic.to_lowercase().split_whitespace().map(str::to_owned).collect();

  let mut scored: Vec<(usize, &str)> = records
    .iter()
    .filter_map(|record| {
      let overlap = record
        .text
        .to_lowercase()
        .split_whitespace()
        .filter(|word| topic_words.contains(*word))
        .collect::<HashSet<_>>()
        .len();
      (overlap > 0).then_some((overlap, record.text.as_str()))
    })
    .collect();

  scored.sort_by(|a, b| b.0.cmp(&a.0));
  scored.into_iter().take(k).map(|(_, text)| text.to_owned()).collect()
}
