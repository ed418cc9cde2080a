use std::fmt;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, debug_span};

use super::format::{SectionKind, TableHeader};
use super::trie::TrieIndex;
use super::weights::WeightTable;
use super::TableError;

/// A validated, memory-mapped prediction table.
///
/// Field order is drop order: both section views go first, then the mapping,
/// then the file descriptor. No view outlives the mapping.
pub struct LoadedTable {
    header: TableHeader,
    trie: TrieIndex,
    weights: WeightTable<'static>,
    mmap: Mmap,
    file: File,
}

impl LoadedTable {
    /// Open a table file and bind its sections in place.
    ///
    /// Every section range is checked against the mapped length before any
    /// view is created over it.
    pub fn open(path: &Path) -> Result<Self, TableError> {
        let _span = debug_span!("open_table", path = %path.display()).entered();

        let file = File::open(path).map_err(TableError::Open)?;
        // SAFETY: The file is opened read-only and the mapping is immutable.
        // We hold the Mmap for the lifetime of this struct, so the data remains
        // valid. The file should not be modified while the engine is running.
        // On an early return below, `mmap` is dropped before `file`.
        let mmap = unsafe { Mmap::map(&file) }.map_err(TableError::Map)?;

        let header = TableHeader::parse(&mmap)?;
        let weights_range = header.section_range(SectionKind::Weights, mmap.len())?;
        let trie_range = header.section_range(SectionKind::Trie, mmap.len())?;

        // SAFETY: The slices reference mmap data. The mmap is stored in
        // self.mmap and is dropped after trie and weights (field order), and
        // `release` drops them in the same order.
        let weights_bytes =
            unsafe { std::mem::transmute::<&[u8], &'static [u8]>(&mmap[weights_range]) };
        let trie_bytes =
            unsafe { std::mem::transmute::<&[u8], &'static [u8]>(&mmap[trie_range]) };

        let trie = TrieIndex::bind(trie_bytes)?;
        let weights = WeightTable::new(weights_bytes);

        debug!(
            depth = header.max_context_depth,
            weights = weights.len(),
            trie_bytes = trie_bytes.len(),
            file_len = mmap.len(),
            "table mapped"
        );

        Ok(Self {
            header,
            trie,
            weights,
            mmap,
            file,
        })
    }

    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    pub fn max_context_depth(&self) -> usize {
        self.header.max_context_depth as usize
    }

    pub fn trie(&self) -> &TrieIndex {
        &self.trie
    }

    pub fn weights(&self) -> &WeightTable<'_> {
        &self.weights
    }

    /// Size of the mapped file in bytes.
    pub fn file_len(&self) -> usize {
        self.mmap.len()
    }

    /// Tear down in order: section views, mapping, descriptor.
    pub(super) fn release(self) {
        let Self {
            header: _,
            trie,
            weights,
            mmap,
            file,
        } = self;
        drop(trie);
        drop(weights);
        drop(mmap);
        drop(file);
        debug!("table released");
    }
}

impl fmt::Debug for LoadedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedTable")
            .field("header", &self.header)
            .field("weights", &self.weights.len())
            .field("file_len", &self.mmap.len())
            .finish()
    }
}
