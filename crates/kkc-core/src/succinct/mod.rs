//! Rank/select bit vectors, the foundation of the LOUDS tries and token tables.

mod bit_vector;

pub use bit_vector::BitVector;

/// Raised when a persisted bit vector fails validation.
#[derive(Debug, thiserror::Error)]
pub enum SuccinctError {
    #[error("bit vector of {len} bits cannot be stored in {words} words")]
    WordCount { len: usize, words: usize },

    #[error("bit vector has set bits past its length")]
    StrayBits,

    #[error("bit vector length {0} exceeds the supported maximum")]
    TooLong(u64),
}
