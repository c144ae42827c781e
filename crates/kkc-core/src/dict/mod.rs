//! Dictionary sources and connection-matrix storage.
//!
//! `TrieDictionary` stores reading → token mappings in LOUDS tries plus a
//! token table. `ConnectionMatrix` stores POS bigram transition costs.

pub mod connection;
mod connection_io;
mod source;
#[cfg(test)]
mod tests;
mod token_table;
mod trie_dict;
mod trie_dict_io;

pub use source::SourceTag;
pub use token_table::{PosTable, RawToken, SurfaceRef, TokenTable};
pub use trie_dict::TrieDictionary;

use std::io;

use serde::{Deserialize, Serialize};

/// Error type for dictionary (KKDX) and connection-matrix (KKCX) binary I/O.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected KKDX or KKCX)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch (stored {stored:#010x}, computed {computed:#010x})")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("corrupt dictionary: {0}")]
    Corrupt(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// One morpheme for a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub surface: String,
    pub cost: i16,
    pub left_id: u16,
    pub right_id: u16,
}

pub struct SearchResult {
    pub reading: String,
    pub entries: Vec<Token>,
}

/// Read contract shared by static tries and the mutable overlays, so the
/// lattice builder treats every source the same way.
pub trait Dictionary: Send + Sync {
    fn lookup(&self, reading: &str) -> Vec<Token>;
    fn predict(&self, prefix: &str, max_results: usize) -> Vec<SearchResult>;
    /// Every stored reading that is a prefix of `query`, shortest first.
    fn common_prefix_search(&self, query: &str) -> Vec<SearchResult>;
}

/// Non-empty prefixes of `query` that end on a char boundary, shortest first.
pub(crate) fn char_prefixes(query: &str) -> impl Iterator<Item = &str> {
    query
        .char_indices()
        .map(move |(i, c)| &query[..i + c.len_utf8()])
}
