//! Next-grapheme prediction with suffix backoff.
//!
//! `predict(context)` searches the trailing suffixes of `context` from the
//! longest the table can hold down to a single grapheme, keeps keys that
//! extend a suffix by exactly one grapheme, ranks each suffix's extensions by
//! weight and merges them, longest suffix first, into a deduplicated list.

mod planner;
mod ranker;

pub use planner::plan_suffixes;
pub use ranker::{rank_extensions, Candidate, Ranker};

use std::path::Path;

use tracing::{debug, debug_span};

use crate::grapheme::grapheme_count;
use crate::settings::settings;
use crate::table::{EngineState, TableError, TableHeader};

/// Hard cap on predictions returned by one query.
pub const MAX_RESULTS: usize = 30;

/// One predicted grapheme with the evidence that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub text: String,
    pub weight: f32,
    /// Grapheme length of the context suffix the prediction came from.
    pub context_len: usize,
}

/// Summary of a loaded table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub header: TableHeader,
    pub weight_count: usize,
    pub file_len: usize,
}

/// Predicts the next grapheme after a context string.
///
/// Construction never fails: a table that cannot be opened or validated
/// leaves the engine disabled, and a disabled engine answers every query with
/// an empty list. Queries take `&self` and keep all state on the stack, so one
/// engine can serve many threads; `close` takes `&mut self` and therefore
/// cannot overlap a query.
#[derive(Debug)]
pub struct PredictionEngine {
    state: EngineState,
    max_results: usize,
}

impl PredictionEngine {
    /// Open the table at `path`, capping results at `predict.max_results`.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::open_with_limit(path, settings().predict.max_results)
    }

    /// Open with an explicit result cap, clamped to `1..=MAX_RESULTS`.
    pub fn open_with_limit(path: impl AsRef<Path>, max_results: usize) -> Self {
        Self {
            state: EngineState::open(path.as_ref()),
            max_results: max_results.clamp(1, MAX_RESULTS),
        }
    }

    /// An engine that never loaded a table.
    pub fn disabled(reason: TableError) -> Self {
        Self {
            state: EngineState::Disabled { reason },
            max_results: MAX_RESULTS,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    pub fn disabled_reason(&self) -> Option<&TableError> {
        self.state.disabled_reason()
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Most likely next graphemes after `context`, best first.
    ///
    /// Total over all inputs: an empty context or a disabled engine yields an
    /// empty list.
    pub fn predict(&self, context: &str) -> Vec<String> {
        self.predict_scored(context)
            .into_iter()
            .map(|p| p.text)
            .collect()
    }

    /// Same order as [`predict`](Self::predict), with weights and the length
    /// of the suffix each prediction came from.
    pub fn predict_scored(&self, context: &str) -> Vec<Prediction> {
        let _span = debug_span!("predict", context, max_results = self.max_results).entered();
        let Some(table) = self.state.table() else {
            return Vec::new();
        };

        let mut ranker = Ranker::new(self.max_results);
        for suffix in plan_suffixes(context, table.max_context_depth()) {
            let suffix_len = grapheme_count(suffix);
            let candidates = rank_extensions(table.trie(), table.weights(), suffix, suffix_len);
            debug!(suffix, candidates = candidates.len(), "suffix searched");
            ranker.extend(candidates, suffix_len);
            if ranker.is_full() {
                break;
            }
        }

        let predictions = ranker.finish();
        debug!(count = predictions.len(), "predictions");
        predictions
    }

    /// Weight stored for exactly `key`.
    pub fn lookup(&self, key: &str) -> Option<f32> {
        let table = self.state.table()?;
        let id = table.trie().exact_match(key.as_bytes())?;
        table.weights().get(id)
    }

    pub fn info(&self) -> Option<TableInfo> {
        let table = self.state.table()?;
        Some(TableInfo {
            header: table.header().clone(),
            weight_count: table.weights().len(),
            file_len: table.file_len(),
        })
    }

    /// Number of keys in the table. Walks the whole trie.
    pub fn key_count(&self) -> usize {
        self.state.table().map_or(0, |t| t.trie().key_count())
    }

    /// Release the table. Idempotent; later queries return empty lists.
    pub fn close(&mut self) {
        self.state.close();
    }
}
