use super::format::WEIGHT_SIZE;

/// Read-only view of the weights section, indexed by entry id.
///
/// Borrowed directly from the mapped file; nothing is copied.
#[derive(Clone)]
pub struct WeightTable<'a> {
    bytes: &'a [u8],
}

impl<'a> WeightTable<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Number of entries. A trailing partial weight is ignored.
    pub fn len(&self) -> usize {
        self.bytes.len() / WEIGHT_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weight of `entry_id`, or `None` when the id lies outside the table.
    pub fn get(&self, entry_id: u32) -> Option<f32> {
        let start = (entry_id as usize).checked_mul(WEIGHT_SIZE)?;
        self.bytes
            .get(start..start.checked_add(WEIGHT_SIZE)?)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + 'a {
        self.bytes
            .chunks_exact(WEIGHT_SIZE)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}
