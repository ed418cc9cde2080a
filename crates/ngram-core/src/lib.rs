//! Next-grapheme prediction over a memory-mapped n-gram table.
//!
//! A table is compiled offline by [`TableBuilder`] and opened with
//! [`PredictionEngine::open`]. Loading never fails loudly: a missing or
//! malformed table yields a disabled engine whose queries return nothing.

// The serialized double-array trie is stored in native byte order.
#[cfg(not(target_endian = "little"))]
compile_error!("ngram-core requires a little-endian platform");

pub mod grapheme;
pub mod predict;
pub mod settings;
pub mod table;
#[cfg(test)]
pub(crate) mod testutil;

pub use predict::{Prediction, PredictionEngine, MAX_RESULTS};
pub use table::{EngineState, TableBuilder, TableError};
