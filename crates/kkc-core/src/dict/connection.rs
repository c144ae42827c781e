use memmap2::Mmap;

pub(super) const MAGIC: &[u8; 4] = b"KKCX";
pub(super) const VERSION: u8 = 1;
/// magic(4) + version(1) + num_ids(2)
pub(super) const HEADER_SIZE: usize = 4 + 1 + 2;

/// POS class shared by the virtual beginning- and end-of-sentence nodes.
pub const BOS_EOS_ID: u16 = 0;

/// Backing storage for cost data: either owned or memory-mapped.
pub(super) enum CostStorage {
    Owned(Vec<i16>),
    Mapped(Mmap),
}

/// Bigram costs between POS classes, `num_ids × num_ids`, row-major by the
/// right id of the earlier morpheme.
pub struct ConnectionMatrix {
    pub(super) num_ids: u16,
    pub(super) storage: CostStorage,
}

impl ConnectionMatrix {
    /// Builds an owned matrix. `costs` must hold `num_ids²` non-negative values.
    pub fn from_costs(num_ids: u16, costs: Vec<i16>) -> Result<Self, super::DictError> {
        Self::check_costs(num_ids, costs.len(), costs.iter().copied())?;
        Ok(Self {
            num_ids,
            storage: CostStorage::Owned(costs),
        })
    }

    /// Transition cost from a morpheme whose right id is `left_id` to one
    /// whose left id is `right_id`. Out-of-bounds ids cost 0.
    pub fn cost(&self, left_id: u16, right_id: u16) -> i16 {
        if left_id >= self.num_ids || right_id >= self.num_ids {
            return 0;
        }
        let idx = left_id as usize * self.num_ids as usize + right_id as usize;
        match &self.storage {
            CostStorage::Owned(costs) => costs.get(idx).copied().unwrap_or(0),
            CostStorage::Mapped(mmap) => {
                let offset = HEADER_SIZE + idx * 2;
                mmap.get(offset..offset + 2)
                    .map(|b| i16::from_le_bytes([b[0], b[1]]))
                    .unwrap_or(0)
            }
        }
    }

    pub fn num_ids(&self) -> u16 {
        self.num_ids
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.storage, CostStorage::Mapped(_))
    }
}
