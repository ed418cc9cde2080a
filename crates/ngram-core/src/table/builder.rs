use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lexime_trie::DoubleArray;
use tracing::debug;

use super::format::{SectionDescriptor, SectionKind, TableHeader, HEADER_SIZE, SECTION_COUNT};
use super::TableError;
use crate::grapheme::{graphemes, is_separator};

/// Compiles n-gram statistics into the binary table format.
///
/// Keys are grapheme sequences of 2..=`max_depth` clusters; the weight of a
/// key is its occurrence count (or the sum of weights given to `add_key`).
pub struct TableBuilder {
    max_depth: u32,
    min_count: f64,
    // BTreeMap<String, _> iterates in byte order, the order entry ids follow.
    weights: BTreeMap<String, f64>,
}

impl TableBuilder {
    pub fn new(max_depth: u32) -> Result<Self, TableError> {
        if max_depth == 0 {
            return Err(TableError::InvalidDepth(max_depth));
        }
        Ok(Self {
            max_depth,
            min_count: 0.0,
            weights: BTreeMap::new(),
        })
    }

    /// Leave out keys whose accumulated weight is below `min_count`.
    pub fn min_count(mut self, min_count: f64) -> Self {
        self.min_count = min_count;
        self
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Count every n-gram of 2..=max_depth graphemes in `text`.
    ///
    /// Lines are counted independently, and whitespace or control clusters
    /// split a line into separate runs.
    pub fn add_text(&mut self, text: &str) {
        for line in text.lines() {
            let clusters = graphemes(line);
            for run in clusters.split(|g| is_separator(g)) {
                self.add_run(run);
            }
        }
    }

    fn add_run(&mut self, run: &[&str]) {
        let depth = self.max_depth as usize;
        for start in 0..run.len() {
            let mut key = String::from(run[start]);
            for next in run.iter().skip(start + 1).take(depth.saturating_sub(1)) {
                key.push_str(next);
                *self.weights.entry(key.clone()).or_insert(0.0) += 1.0;
            }
        }
    }

    /// Add `weight` to an explicit key. Empty keys are ignored.
    pub fn add_key(&mut self, key: &str, weight: f32) {
        if key.is_empty() {
            return;
        }
        *self.weights.entry(key.to_string()).or_insert(0.0) += f64::from(weight);
    }

    /// Number of distinct keys collected so far, before `min_count` filtering.
    pub fn key_count(&self) -> usize {
        self.weights.len()
    }

    /// Serialize: header, weights (4-aligned), then trie (8-aligned).
    pub fn to_bytes(&self) -> Result<Vec<u8>, TableError> {
        let kept: Vec<(&str, f32)> = self
            .weights
            .iter()
            .filter(|(_, &w)| w >= self.min_count)
            .map(|(k, &w)| (k.as_str(), w as f32))
            .collect();
        check_entry_count(kept.len())?;

        let keys: Vec<&[u8]> = kept.iter().map(|(k, _)| k.as_bytes()).collect();
        let trie = DoubleArray::<u8>::build(&keys);
        let trie_data = trie.as_bytes();

        let weights_offset = HEADER_SIZE;
        let weights_len = kept.len() * super::format::WEIGHT_SIZE;
        let trie_offset = align_up(
            weights_offset + weights_len,
            SectionKind::Trie.alignment() as usize,
        );

        let mut sections = [SectionDescriptor::default(); SECTION_COUNT];
        sections[SectionKind::Weights as usize] = SectionDescriptor {
            offset: weights_offset as u64,
            length: weights_len as u64,
        };
        sections[SectionKind::Trie as usize] = SectionDescriptor {
            offset: trie_offset as u64,
            length: trie_data.len() as u64,
        };
        let header = TableHeader::new(self.max_depth, sections);

        let mut buf = Vec::with_capacity(trie_offset + trie_data.len());
        header.write_to(&mut buf);
        for (_, weight) in &kept {
            buf.extend_from_slice(&weight.to_le_bytes());
        }
        buf.resize(trie_offset, 0);
        buf.extend_from_slice(&trie_data);

        debug!(
            keys = kept.len(),
            dropped = self.weights.len() - kept.len(),
            bytes = buf.len(),
            "table serialized"
        );
        Ok(buf)
    }

    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }
}

/// The double-array stores value ids in 31 bits.
const MAX_ENTRIES: usize = (1 << 31) - 1;

fn check_entry_count(count: usize) -> Result<(), TableError> {
    if count > MAX_ENTRIES {
        return Err(TableError::TooLarge("entry count"));
    }
    Ok(())
}

fn align_up(n: usize, align: usize) -> usize {
    n.div_ceil(align) * align
}
