use std::collections::HashSet;

use tracing::debug;

use super::Prediction;
use crate::grapheme::{grapheme_count, last_grapheme};
use crate::table::{TrieIndex, WeightTable};

/// A stored key that extends a suffix by exactly one grapheme.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub key: String,
    pub entry_id: u32,
    pub weight: f32,
}

/// Single-grapheme extensions of `suffix`, heaviest first.
///
/// `suffix_len` is the grapheme length of `suffix`. Ties are broken by key
/// bytes so results are reproducible. Hits whose entry id has no weight, or
/// whose key is not UTF-8, are dropped.
pub fn rank_extensions(
    trie: &TrieIndex,
    weights: &WeightTable<'_>,
    suffix: &str,
    suffix_len: usize,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = trie
        .predictive_search(suffix.as_bytes())
        .filter_map(|hit| {
            let key = String::from_utf8(hit.key).ok()?;
            if !extends_by_one(&key, suffix, suffix_len) {
                return None;
            }
            let Some(weight) = weights.get(hit.entry_id) else {
                debug!(entry_id = hit.entry_id, key = %key, "entry id outside weight table");
                return None;
            };
            Some(Candidate {
                key,
                entry_id: hit.entry_id,
                weight,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.key.as_bytes().cmp(b.key.as_bytes()))
    });
    candidates
}

/// `key` is `suffix` followed by exactly one grapheme cluster.
///
/// A byte prefix match is not enough on its own: `"e"` is a byte prefix of
/// `"e\u{301}x"`, whose first cluster is `"é"`.
fn extends_by_one(key: &str, suffix: &str, suffix_len: usize) -> bool {
    match last_grapheme(key) {
        Some(last) => {
            key.len() - last.len() == suffix.len() && grapheme_count(key) == suffix_len + 1
        }
        None => false,
    }
}

/// Merges per-suffix candidates into one capped, deduplicated list.
///
/// The first occurrence of a predicted grapheme wins; feeding suffixes
/// longest first gives longer contexts priority.
pub struct Ranker {
    limit: usize,
    seen: HashSet<String>,
    predictions: Vec<Prediction>,
}

impl Ranker {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            seen: HashSet::new(),
            predictions: Vec::with_capacity(limit),
        }
    }

    pub fn is_full(&self) -> bool {
        self.predictions.len() >= self.limit
    }

    /// Append the predictions of one suffix, already ranked.
    pub fn extend(&mut self, candidates: Vec<Candidate>, context_len: usize) {
        for candidate in candidates {
            if self.is_full() {
                break;
            }
            let Some(text) = last_grapheme(&candidate.key) else {
                continue;
            };
            if !self.seen.insert(text.to_string()) {
                continue;
            }
            self.predictions.push(Prediction {
                text: text.to_string(),
                weight: candidate.weight,
                context_len,
            });
        }
    }

    pub fn finish(self) -> Vec<Prediction> {
        self.predictions
    }
}
