use serde::{Deserialize, Serialize};

use super::SuccinctError;

/// Words per rank block (512 bits).
const BLOCK_WORDS: usize = 8;
const BLOCK_BITS: usize = BLOCK_WORDS * 64;
/// One select hint is sampled every this many matching bits.
const SELECT_SAMPLE: usize = 512;

/// Immutable bit array with constant-time rank and near-constant-time select.
///
/// `block_ranks[b]` holds the number of ones before block `b`; the table has one
/// entry past the last block so `rank1(len)` needs no special case. Select is
/// answered by jumping to a sampled block and scanning forward over at most a
/// handful of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBits", into = "RawBits")]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
    block_ranks: Vec<u32>,
    select1_hints: Vec<u32>,
    select0_hints: Vec<u32>,
    num_ones: usize,
}

/// Persisted form: only the raw words. The rank/select index is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct RawBits {
    len: u64,
    words: Vec<u64>,
}

impl BitVector {
    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut words = Vec::new();
        let mut len = 0usize;
        for bit in bits {
            if len % 64 == 0 {
                words.push(0u64);
            }
            if bit {
                words[len / 64] |= 1 << (len % 64);
            }
            len += 1;
        }
        Self::with_index(words, len)
    }

    fn with_index(words: Vec<u64>, len: usize) -> Self {
        let num_blocks = words.len().div_ceil(BLOCK_WORDS);
        let mut block_ranks = Vec::with_capacity(num_blocks + 1);
        let mut select1_hints = Vec::new();
        let mut select0_hints = Vec::new();
        let mut ones = 0usize;

        for b in 0..num_blocks {
            block_ranks.push(ones as u32);
            let zeros = b * BLOCK_BITS - ones;
            let lo = b * BLOCK_WORDS;
            let hi = (lo + BLOCK_WORDS).min(words.len());
            let block_ones: usize = words[lo..hi].iter().map(|w| w.count_ones() as usize).sum();
            let block_zeros = (BLOCK_BITS.min(len - b * BLOCK_BITS)) - block_ones;

            // Record this block for every sample boundary that falls inside it.
            while select1_hints.len() * SELECT_SAMPLE < ones + block_ones {
                select1_hints.push(b as u32);
            }
            while select0_hints.len() * SELECT_SAMPLE < zeros + block_zeros {
                select0_hints.push(b as u32);
            }
            ones += block_ones;
        }
        block_ranks.push(ones as u32);

        Self {
            words,
            len,
            block_ranks,
            select1_hints,
            select0_hints,
            num_ones: ones,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_ones(&self) -> usize {
        self.num_ones
    }

    pub fn num_zeros(&self) -> usize {
        self.len - self.num_ones
    }

    /// Bit at `pos`, or `None` past the end.
    pub fn get(&self, pos: usize) -> Option<bool> {
        if pos >= self.len {
            return None;
        }
        Some((self.words[pos / 64] >> (pos % 64)) & 1 == 1)
    }

    /// Number of ones in `[0, pos)`. Defined for `pos <= len`.
    pub fn rank1(&self, pos: usize) -> Option<usize> {
        if pos > self.len {
            return None;
        }
        let word = pos / 64;
        let block = word / BLOCK_WORDS;
        let mut count = self.block_ranks[block] as usize;
        for w in &self.words[block * BLOCK_WORDS..word] {
            count += w.count_ones() as usize;
        }
        let rem = pos % 64;
        if rem != 0 {
            count += (self.words[word] & ((1u64 << rem) - 1)).count_ones() as usize;
        }
        Some(count)
    }

    /// Number of zeros in `[0, pos)`. Defined for `pos <= len`.
    pub fn rank0(&self, pos: usize) -> Option<usize> {
        self.rank1(pos).map(|ones| pos - ones)
    }

    /// Position of the `k`-th one (0-based), or `None` if there are not enough ones.
    pub fn select1(&self, k: usize) -> Option<usize> {
        if k >= self.num_ones {
            return None;
        }
        let mut block = self.select1_hints[k / SELECT_SAMPLE] as usize;
        while self.block_ranks[block + 1] as usize <= k {
            block += 1;
        }
        let mut remaining = k - self.block_ranks[block] as usize;
        for w in block * BLOCK_WORDS..self.words.len() {
            let word = self.words[w];
            let ones = word.count_ones() as usize;
            if remaining < ones {
                return Some(w * 64 + select_in_word(word, remaining));
            }
            remaining -= ones;
        }
        unreachable!("select1 index out of sync with bit data")
    }

    /// Position of the `k`-th zero (0-based), or `None` if there are not enough zeros.
    pub fn select0(&self, k: usize) -> Option<usize> {
        if k >= self.num_zeros() {
            return None;
        }
        let zeros_before = |b: usize| b * BLOCK_BITS - self.block_ranks[b] as usize;
        let last_block = self.block_ranks.len() - 2;
        let mut block = self.select0_hints[k / SELECT_SAMPLE] as usize;
        while block < last_block && zeros_before(block + 1) <= k {
            block += 1;
        }
        let mut remaining = k - zeros_before(block);
        // Padding bits past `len` are zero, but the target always precedes them.
        for w in block * BLOCK_WORDS..self.words.len() {
            let word = !self.words[w];
            let zeros = word.count_ones() as usize;
            if remaining < zeros {
                return Some(w * 64 + select_in_word(word, remaining));
            }
            remaining -= zeros;
        }
        unreachable!("select0 index out of sync with bit data")
    }

    /// Iterate over all bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| (self.words[i / 64] >> (i % 64)) & 1 == 1)
    }

    /// Approximate heap usage in bytes (bits plus index).
    pub fn heap_bytes(&self) -> usize {
        self.words.len() * 8
            + (self.block_ranks.len() + self.select1_hints.len() + self.select0_hints.len()) * 4
    }
}

/// Offset of the `k`-th set bit inside `word`. Caller guarantees it exists.
fn select_in_word(mut word: u64, k: usize) -> usize {
    for _ in 0..k {
        word &= word - 1;
    }
    word.trailing_zeros() as usize
}

impl TryFrom<RawBits> for BitVector {
    type Error = SuccinctError;

    fn try_from(raw: RawBits) -> Result<Self, Self::Error> {
        let len = usize::try_from(raw.len).map_err(|_| SuccinctError::TooLong(raw.len))?;
        if len > u32::MAX as usize {
            return Err(SuccinctError::TooLong(raw.len));
        }
        if raw.words.len() != len.div_ceil(64) {
            return Err(SuccinctError::WordCount {
                len,
                words: raw.words.len(),
            });
        }
        let rem = len % 64;
        if rem != 0 {
            if let Some(&last) = raw.words.last() {
                if last >> rem != 0 {
                    return Err(SuccinctError::StrayBits);
                }
            }
        }
        Ok(Self::with_index(raw.words, len))
    }
}

impl From<BitVector> for RawBits {
    fn from(bv: BitVector) -> Self {
        Self {
            len: bv.len as u64,
            words: bv.words,
        }
    }
}
