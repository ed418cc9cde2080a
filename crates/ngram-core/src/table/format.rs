//! On-disk layout of a prediction table.
//!
//! ```text
//! offset  size  field
//!      0     4  version            (u32 LE, must be 0)
//!      4     4  max_context_depth  (u32 LE, >= 1)
//!      8    16  section[Weights]   (offset u64 LE, length u64 LE)
//!     24    16  section[Trie]      (offset u64 LE, length u64 LE)
//!     40     …  section payloads
//! ```
//!
//! The weights section is an array of little-endian `f32`, one per entry id.
//! The trie section is a serialized double-array image and must start on an
//! 8-byte boundary so it can be bound in place.

use std::fmt;
use std::ops::Range;

use super::TableError;

pub const VERSION: u32 = 0;
pub const SECTION_COUNT: usize = 2;
/// offset(8) + length(8)
pub const SECTION_DESCRIPTOR_SIZE: usize = 8 + 8;
/// version(4) + max_context_depth(4) + section table = 40
pub const HEADER_SIZE: usize = 4 + 4 + SECTION_COUNT * SECTION_DESCRIPTOR_SIZE;
/// Size of one serialized weight (`f32`).
pub const WEIGHT_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Weights = 0,
    Trie = 1,
}

impl SectionKind {
    pub const ALL: [SectionKind; SECTION_COUNT] = [SectionKind::Weights, SectionKind::Trie];

    fn index(self) -> usize {
        self as usize
    }

    /// Required alignment of the section's start offset.
    pub(crate) fn alignment(self) -> u64 {
        match self {
            SectionKind::Weights => WEIGHT_SIZE as u64,
            SectionKind::Trie => 8,
        }
    }

    /// Required granularity of the section's length.
    fn stride(self) -> u64 {
        match self {
            SectionKind::Weights => WEIGHT_SIZE as u64,
            SectionKind::Trie => 1,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Weights => f.pad("weights"),
            SectionKind::Trie => f.pad("trie"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionDescriptor {
    pub offset: u64,
    pub length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeader {
    pub version: u32,
    /// Maximum key length in grapheme clusters (context + 1 predicted).
    pub max_context_depth: u32,
    pub sections: [SectionDescriptor; SECTION_COUNT],
}

impl TableHeader {
    pub fn new(max_context_depth: u32, sections: [SectionDescriptor; SECTION_COUNT]) -> Self {
        Self {
            version: VERSION,
            max_context_depth,
            sections,
        }
    }

    /// Parse and validate the fixed-size header at the start of `data`.
    ///
    /// Section ranges are not checked here; see [`TableHeader::section_range`].
    pub fn parse(data: &[u8]) -> Result<Self, TableError> {
        let version = read_u32(data, 0)?;
        if version != VERSION {
            return Err(TableError::UnsupportedVersion(version));
        }
        if data.len() < HEADER_SIZE {
            return Err(TableError::TruncatedHeader(data.len()));
        }
        let max_context_depth = read_u32(data, 4)?;
        if max_context_depth == 0 {
            return Err(TableError::InvalidDepth(max_context_depth));
        }

        let mut sections = [SectionDescriptor::default(); SECTION_COUNT];
        for (i, slot) in sections.iter_mut().enumerate() {
            let at = 8 + i * SECTION_DESCRIPTOR_SIZE;
            *slot = SectionDescriptor {
                offset: read_u64(data, at)?,
                length: read_u64(data, at + 8)?,
            };
        }

        Ok(Self {
            version,
            max_context_depth,
            sections,
        })
    }

    pub fn section(&self, kind: SectionKind) -> SectionDescriptor {
        self.sections[kind.index()]
    }

    /// Resolve a section to a byte range of a file of `file_len` bytes.
    ///
    /// The range must lie after the header, inside the file, start on the
    /// section's alignment and hold a whole number of entries.
    pub fn section_range(
        &self,
        kind: SectionKind,
        file_len: usize,
    ) -> Result<Range<usize>, TableError> {
        let SectionDescriptor { offset, length } = self.section(kind);
        let out_of_bounds = || TableError::SectionOutOfBounds {
            kind,
            offset,
            length,
            file_len,
        };

        let end = offset.checked_add(length).ok_or_else(out_of_bounds)?;
        if offset < HEADER_SIZE as u64 || end > file_len as u64 {
            return Err(out_of_bounds());
        }
        if offset % kind.alignment() != 0 {
            return Err(TableError::MisalignedSection { kind, offset });
        }
        if length % kind.stride() != 0 {
            return Err(TableError::InvalidSectionLength { kind, length });
        }

        let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
        let end = usize::try_from(end).map_err(|_| out_of_bounds())?;
        Ok(start..end)
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.max_context_depth.to_le_bytes());
        for section in &self.sections {
            buf.extend_from_slice(&section.offset.to_le_bytes());
            buf.extend_from_slice(&section.length.to_le_bytes());
        }
    }
}

fn read_u32(data: &[u8], at: usize) -> Result<u32, TableError> {
    data.get(at..at + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or(TableError::TruncatedHeader(data.len()))
}

fn read_u64(data: &[u8], at: usize) -> Result<u64, TableError> {
    data.get(at..at + 8)
        .and_then(|b| b.try_into().ok())
        .map(u64::from_le_bytes)
        .ok_or(TableError::TruncatedHeader(data.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(weights: (u64, u64), trie: (u64, u64)) -> TableHeader {
        TableHeader::new(
            3,
            [
                SectionDescriptor {
                    offset: weights.0,
                    length: weights.1,
                },
                SectionDescriptor {
                    offset: trie.0,
                    length: trie.1,
                },
            ],
        )
    }

    fn encode(h: &TableHeader) -> Vec<u8> {
        let mut buf = Vec::new();
        h.write_to(&mut buf);
        buf
    }

    #[test]
    fn test_header_size() {
        assert_eq!(HEADER_SIZE, 40);
        assert_eq!(encode(&header((40, 8), (48, 16))).len(), HEADER_SIZE);
    }

    #[test]
    fn test_parse_written_header() {
        let h = header((40, 12), (56, 100));
        let parsed = TableHeader::parse(&encode(&h)).unwrap();
        assert_eq!(parsed, h);
        assert_eq!(parsed.section(SectionKind::Trie).offset, 56);
        assert_eq!(parsed.section(SectionKind::Weights).length, 12);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(
            TableHeader::parse(&[]),
            Err(TableError::TruncatedHeader(0))
        ));
    }

    #[test]
    fn test_parse_rejects_nonzero_version() {
        let mut buf = encode(&header((40, 0), (40, 0)));
        buf[0] = 1;
        assert!(matches!(
            TableHeader::parse(&buf),
            Err(TableError::UnsupportedVersion(1))
        ));
    }

    #[test]
    fn test_version_checked_before_length() {
        let buf = 7u32.to_le_bytes();
        assert!(matches!(
            TableHeader::parse(&buf),
            Err(TableError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn test_parse_truncated_section_table() {
        let buf = encode(&header((40, 0), (40, 0)));
        assert!(matches!(
            TableHeader::parse(&buf[..HEADER_SIZE - 1]),
            Err(TableError::TruncatedHeader(39))
        ));
    }

    #[test]
    fn test_parse_rejects_zero_depth() {
        let mut buf = encode(&header((40, 0), (40, 0)));
        buf[4..8].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            TableHeader::parse(&buf),
            Err(TableError::InvalidDepth(0))
        ));
    }

    #[test]
    fn test_section_range_in_bounds() {
        let h = header((40, 8), (48, 16));
        assert_eq!(h.section_range(SectionKind::Weights, 64).unwrap(), 40..48);
        assert_eq!(h.section_range(SectionKind::Trie, 64).unwrap(), 48..64);
    }

    #[test]
    fn test_section_range_past_end() {
        let h = header((40, 8), (48, 32));
        let err = h.section_range(SectionKind::Trie, 64).unwrap_err();
        assert!(matches!(
            err,
            TableError::SectionOutOfBounds {
                kind: SectionKind::Trie,
                offset: 48,
                length: 32,
                file_len: 64,
            }
        ));
    }

    #[test]
    fn test_section_range_overflow() {
        let h = header((40, 8), (u64::MAX - 3, 8));
        assert!(matches!(
            h.section_range(SectionKind::Trie, 64),
            Err(TableError::SectionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_section_range_overlapping_header() {
        let h = header((0, 8), (48, 8));
        assert!(matches!(
            h.section_range(SectionKind::Weights, 64),
            Err(TableError::SectionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_section_range_misaligned() {
        let h = header((42, 8), (52, 8));
        assert!(matches!(
            h.section_range(SectionKind::Weights, 64),
            Err(TableError::MisalignedSection {
                kind: SectionKind::Weights,
                offset: 42
            })
        ));
        // 52 is 4-aligned but not 8-aligned
        assert!(matches!(
            h.section_range(SectionKind::Trie, 64),
            Err(TableError::MisalignedSection {
                kind: SectionKind::Trie,
                ..
            })
        ));
    }

    #[test]
    fn test_section_range_partial_weight() {
        let h = header((40, 6), (48, 8));
        assert!(matches!(
            h.section_range(SectionKind::Weights, 64),
            Err(TableError::InvalidSectionLength {
                kind: SectionKind::Weights,
                length: 6
            })
        ));
    }
}
