use lexime_trie::{DoubleArrayRef, TrieSearch};

use super::TableError;

/// One key found by [`TrieIndex::predictive_search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieHit {
    pub key: Vec<u8>,
    pub entry_id: u32,
}

/// Read-only double-array trie bound in place over the trie section.
///
/// The index never mutates after binding. Every search walks with its own
/// cursor, so concurrent searches from several threads are safe.
pub struct TrieIndex {
    da: DoubleArrayRef<'static, u8>,
}

impl TrieIndex {
    /// Bind over a serialized double-array image without copying it.
    ///
    /// The caller keeps `bytes` alive for as long as the index exists; for a
    /// mapped table that is the mapping held next to the index.
    pub(crate) fn bind(bytes: &'static [u8]) -> Result<Self, TableError> {
        let da = DoubleArrayRef::<u8>::from_bytes(bytes)?;
        Ok(Self { da })
    }

    /// Every stored key that starts with `prefix`, in the trie's native order.
    pub fn predictive_search<'s>(&'s self, prefix: &'s [u8]) -> impl Iterator<Item = TrieHit> + 's {
        self.da.predictive_search(prefix).map(|m| TrieHit {
            key: m.key,
            entry_id: m.value_id as u32,
        })
    }

    pub fn exact_match(&self, key: &[u8]) -> Option<u32> {
        self.da.exact_match(key).map(|id| id as u32)
    }

    /// Number of stored keys. Walks the whole trie.
    pub fn key_count(&self) -> usize {
        self.da.predictive_search(b"").count()
    }
}
