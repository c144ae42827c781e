//! LOUDS-encoded tries over `char` labels.
//!
//! The structure stream starts with `10` for the virtual super-root, then for
//! every node in breadth-first order emits one `1` per child followed by a `0`.
//! Node ids are BFS positions (root = 0); the `k`-th `1` in the stream is the
//! edge into node `k`, so the stream holds `n` ones and `n + 1` zeros.
//!
//! Children of node `k` occupy the stream range `select0(k) + 1 .. select0(k + 1)`
//! and carry consecutive ids. The parent of node `c` is `rank0(select1(c)) - 1`.

mod builder;
mod term_id;

pub use builder::{BuiltTrie, LoudsBuilder};
pub use term_id::{PrefixMatch, TermIdTrie};

use serde::{Deserialize, Serialize};

use crate::succinct::BitVector;

/// Label stored for the root node, which has no incoming edge.
pub const ROOT_LABEL: char = '\0';

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoudsTrie {
    structure: BitVector,
    labels: Vec<char>,
}

impl LoudsTrie {
    pub(crate) fn from_parts(structure: BitVector, labels: Vec<char>) -> Self {
        Self { structure, labels }
    }

    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    /// Edge label leading into `node`.
    pub fn label(&self, node: usize) -> Option<char> {
        if node == 0 {
            return None;
        }
        self.labels.get(node).copied()
    }

    /// Ids of the children of `node`, in label order.
    pub fn children(&self, node: usize) -> std::ops::Range<usize> {
        let Some(start) = self.structure.select0(node).map(|p| p + 1) else {
            return 0..0;
        };
        let Some(end) = self.structure.select0(node + 1) else {
            return 0..0;
        };
        // Before `start` sit `node + 1` zeros, so the first child id is the
        // number of ones before it.
        let first = start - (node + 1);
        first..first + (end - start)
    }

    /// Child of `node` reached by `label`. Siblings are few, so a scan is enough.
    pub fn child(&self, node: usize, label: char) -> Option<usize> {
        self.children(node).find(|&c| self.labels[c] == label)
    }

    pub fn parent(&self, node: usize) -> Option<usize> {
        if node == 0 {
            return None;
        }
        let pos = self.structure.select1(node)?;
        // `pos - node` child lists (the super-root's included) are closed before this edge.
        Some(pos - node - 1)
    }

    /// Follow `key` from the root. Returns the node reached, if every label matched.
    pub fn traverse(&self, key: &str) -> Option<usize> {
        let mut node = 0;
        for c in key.chars() {
            node = self.child(node, c)?;
        }
        Some(node)
    }

    /// Reconstruct the label path from the root to `node`.
    pub fn key_of(&self, node: usize) -> Option<String> {
        if node >= self.num_nodes() {
            return None;
        }
        let mut rev = Vec::new();
        let mut cur = node;
        while let Some(parent) = self.parent(cur) {
            rev.push(self.labels[cur]);
            cur = parent;
        }
        Some(rev.into_iter().rev().collect())
    }

    /// Check the encoding invariants so that every query on a loaded trie stays
    /// in bounds and every parent walk terminates at the root.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let s = &self.structure;
        if self.labels.is_empty() {
            return Err("trie has no root node".into());
        }
        if s.num_ones() != self.labels.len() {
            return Err(format!(
                "structure has {} edges but {} labels",
                s.num_ones(),
                self.labels.len()
            ));
        }
        if s.num_zeros() != s.num_ones() + 1 {
            return Err(format!(
                "structure has {} ones and {} zeros (expected n and n+1)",
                s.num_ones(),
                s.num_zeros()
            ));
        }
        if s.get(0) != Some(true) || s.get(1) != Some(false) {
            return Err("structure does not start with the super-root prefix".into());
        }
        if s.get(s.len() - 1) != Some(false) {
            return Err("structure does not end with a terminator".into());
        }
        // Every edge must point from a lower id to a higher one, otherwise a
        // corrupt stream could make parent walks cycle.
        let (mut ones, mut zeros) = (0usize, 0usize);
        for (pos, bit) in s.iter().enumerate() {
            if bit {
                if pos > 0 && ones <= zeros - 1 {
                    return Err(format!("node {ones} is not below its parent"));
                }
                ones += 1;
            } else {
                zeros += 1;
            }
        }
        Ok(())
    }

    pub fn heap_bytes(&self) -> usize {
        self.structure.heap_bytes() + self.labels.len() * std::mem::size_of::<char>()
    }
}
