//! Prediction table storage.
//!
//! A table is a single file: a fixed header with a section table, an array of
//! weights indexed by entry id, and a serialized double-array trie mapping
//! grapheme-sequence keys to entry ids. `LoadedTable` maps the file and binds
//! typed views over both sections in place. `TableBuilder` compiles tables.

mod builder;
pub mod format;
mod loader;
mod trie;
mod weights;

pub use builder::TableBuilder;
pub use format::{SectionDescriptor, SectionKind, TableHeader};
pub use loader::LoadedTable;
pub use trie::{TrieHit, TrieIndex};
pub use weights::WeightTable;

use std::io;
use std::mem;
use std::path::Path;

use tracing::warn;

/// Errors raised while loading or writing a prediction table.
///
/// Load errors never reach callers of the engine directly; they are kept as
/// the reason of [`EngineState::Disabled`].
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("open failed: {0}")]
    Open(#[source] io::Error),

    #[error("map failed: {0}")]
    Map(#[source] io::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("truncated header ({0} bytes)")]
    TruncatedHeader(usize),

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u32),

    #[error("invalid context depth: {0}")]
    InvalidDepth(u32),

    #[error("{kind} section out of bounds (offset {offset}, length {length}, file {file_len} bytes)")]
    SectionOutOfBounds {
        kind: SectionKind,
        offset: u64,
        length: u64,
        file_len: usize,
    },

    #[error("{kind} section misaligned (offset {offset})")]
    MisalignedSection { kind: SectionKind, offset: u64 },

    #[error("{kind} section length {length} is not a whole number of entries")]
    InvalidSectionLength { kind: SectionKind, length: u64 },

    #[error("invalid trie data: {0}")]
    InvalidTrie(String),

    #[error("{0} exceeds format limits")]
    TooLarge(&'static str),

    #[error("table closed")]
    Closed,
}

impl From<lexime_trie::TrieError> for TableError {
    fn from(e: lexime_trie::TrieError) -> Self {
        TableError::InvalidTrie(format!("{e:?}"))
    }
}

/// Life-state of a prediction engine.
///
/// Built once when the engine is created and fixed afterwards, except that
/// [`EngineState::close`] moves a loaded table to `Disabled { Closed }`.
#[derive(Debug)]
pub enum EngineState {
    Loaded(LoadedTable),
    Disabled { reason: TableError },
}

impl EngineState {
    /// Open, validate and map the table at `path`.
    ///
    /// Any failure degrades to `Disabled` and is logged; this never panics.
    pub fn open(path: &Path) -> Self {
        match LoadedTable::open(path) {
            Ok(table) => EngineState::Loaded(table),
            Err(reason) => {
                warn!(path = %path.display(), %reason, "prediction table disabled");
                EngineState::Disabled { reason }
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, EngineState::Loaded(_))
    }

    pub fn table(&self) -> Option<&LoadedTable> {
        match self {
            EngineState::Loaded(table) => Some(table),
            EngineState::Disabled { .. } => None,
        }
    }

    pub fn disabled_reason(&self) -> Option<&TableError> {
        match self {
            EngineState::Loaded(_) => None,
            EngineState::Disabled { reason } => Some(reason),
        }
    }

    /// Unmap the table, then close its file. Idempotent; a no-op when the
    /// state is already `Disabled`.
    pub fn close(&mut self) {
        if !self.is_loaded() {
            return;
        }
        let prev = mem::replace(
            self,
            EngineState::Disabled {
                reason: TableError::Closed,
            },
        );
        if let EngineState::Loaded(table) = prev {
            table.release();
        }
    }
}
