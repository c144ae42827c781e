use serde::{Deserialize, Serialize};

use crate::succinct::BitVector;

use super::LoudsTrie;

/// A key found by [`TermIdTrie::common_prefix_search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch {
    /// Length of the matched prefix in characters.
    pub depth: usize,
    /// Length of the matched prefix in bytes, for slicing the query.
    pub byte_len: usize,
    pub node: usize,
    pub term_id: usize,
}

/// LOUDS trie whose terminal nodes carry dense ids `0..num_terms`, assigned in
/// node-id order: `term_id = rank1(terminal, node)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermIdTrie {
    trie: LoudsTrie,
    terminal: BitVector,
}

impl TermIdTrie {
    pub(crate) fn from_parts(trie: LoudsTrie, terminal: BitVector) -> Self {
        Self { trie, terminal }
    }

    pub fn louds(&self) -> &LoudsTrie {
        &self.trie
    }

    pub fn into_louds(self) -> LoudsTrie {
        self.trie
    }

    pub fn num_terms(&self) -> usize {
        self.terminal.num_ones()
    }

    pub fn is_terminal(&self, node: usize) -> bool {
        self.terminal.get(node).unwrap_or(false)
    }

    pub fn term_id_of(&self, node: usize) -> Option<usize> {
        if !self.is_terminal(node) {
            return None;
        }
        self.terminal.rank1(node)
    }

    /// Node holding the given term id.
    pub fn node_of(&self, term_id: usize) -> Option<usize> {
        self.terminal.select1(term_id)
    }

    /// Term id of `key` if it was inserted as a complete key.
    pub fn exact_match(&self, key: &str) -> Option<usize> {
        self.trie
            .traverse(key)
            .and_then(|node| self.term_id_of(node))
    }

    /// Every inserted key that is a prefix of `query`, shortest first.
    pub fn common_prefix_search(&self, query: &str) -> Vec<PrefixMatch> {
        let mut out = Vec::new();
        let mut node = 0;
        for (depth, (offset, c)) in query.char_indices().enumerate() {
            let Some(next) = self.trie.child(node, c) else {
                break;
            };
            node = next;
            if let Some(term_id) = self.term_id_of(node) {
                out.push(PrefixMatch {
                    depth: depth + 1,
                    byte_len: offset + c.len_utf8(),
                    node,
                    term_id,
                });
            }
        }
        out
    }

    /// Keys beginning with `prefix` (the prefix itself included), depth-first in
    /// label order, stopping after `limit` keys.
    pub fn predictive_search(&self, prefix: &str, limit: usize) -> Vec<(String, usize)> {
        let mut out = Vec::new();
        let Some(start) = self.trie.traverse(prefix) else {
            return out;
        };
        let mut stack = vec![(start, prefix.to_string())];
        while let Some((node, key)) = stack.pop() {
            if out.len() >= limit {
                break;
            }
            if let Some(term_id) = self.term_id_of(node) {
                out.push((key.clone(), term_id));
            }
            // Push in reverse so the smallest label is visited first.
            for child in self.trie.children(node).rev() {
                let mut child_key = key.clone();
                child_key.push(self.trie.labels[child]);
                stack.push((child, child_key));
            }
        }
        out
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        self.trie.validate()?;
        if self.terminal.len() != self.trie.num_nodes() {
            return Err(format!(
                "terminal markers cover {} nodes but trie has {}",
                self.terminal.len(),
                self.trie.num_nodes()
            ));
        }
        if self.terminal.get(0) == Some(true) {
            return Err("root node cannot hold a key".into());
        }
        Ok(())
    }

    pub fn heap_bytes(&self) -> usize {
        self.trie.heap_bytes() + self.terminal.heap_bytes()
    }
}
