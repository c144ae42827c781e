use std::collections::HashMap;

use tracing::{debug, debug_span};

use crate::dict::{Dictionary, SourceTag};
use crate::ng_word::WordFilter;
use crate::settings::settings;

/// A span of the input covered by one dictionary token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatticeNode {
    /// Start position (char index, inclusive)
    pub start: usize,
    /// End position (char index, exclusive)
    pub end: usize,
    pub reading: String,
    pub surface: String,
    /// Emission cost (lower = more preferred)
    pub cost: i16,
    pub left_id: u16,
    pub right_id: u16,
    pub source: SourceTag,
    /// Emission order within this lattice; second tie-break after source priority.
    pub order: usize,
}

impl LatticeNode {
    /// Tie-break key among equal-cost nodes; lower wins.
    pub fn tie_key(&self) -> (u8, usize) {
        (self.source.priority(), self.order)
    }
}

/// One dictionary consulted while building the lattice.
#[derive(Clone, Copy)]
pub struct LatticeSource<'a> {
    pub tag: SourceTag,
    pub dict: &'a dyn Dictionary,
}

impl<'a> LatticeSource<'a> {
    pub fn new(tag: SourceTag, dict: &'a dyn Dictionary) -> Self {
        Self { tag, dict }
    }
}

/// All candidate spans of a reading.
pub struct Lattice {
    pub input: String,
    pub nodes: Vec<LatticeNode>,
    /// nodes_by_end[i] = indices of nodes that end at position i
    pub nodes_by_end: Vec<Vec<usize>>,
    /// nodes_by_start[i] = indices of nodes that start at position i
    pub nodes_by_start: Vec<Vec<usize>>,
    pub char_count: usize,
}

/// Build the lattice for `kana` from `sources`, consulted in slice order.
///
/// Tokens rejected by `filter` never become nodes. Nodes that agree on
/// `(start, end, surface, left_id, right_id)` collapse to the one with the
/// lowest `(cost, source priority, order)`. Every position without a
/// single-character node gets a verbatim fallback so a full path always
/// exists.
pub fn build_lattice(
    sources: &[LatticeSource<'_>],
    filter: &dyn WordFilter,
    kana: &str,
) -> Lattice {
    let char_count = kana.chars().count();
    let _span = debug_span!("build_lattice", char_count, sources = sources.len()).entered();
    let byte_offsets: Vec<usize> = kana.char_indices().map(|(i, _)| i).collect();
    let mut nodes: Vec<LatticeNode> = Vec::new();
    let mut nodes_by_end: Vec<Vec<usize>> = vec![Vec::new(); char_count + 1];
    let mut nodes_by_start: Vec<Vec<usize>> = vec![Vec::new(); char_count];
    let mut order = 0usize;
    let mut dropped = 0usize;

    for start in 0..char_count {
        let suffix = &kana[byte_offsets[start]..];
        // (end, surface, left_id, right_id) → node index, scoped to this start
        let mut seen: HashMap<(usize, String, u16, u16), usize> = HashMap::new();

        for source in sources {
            for result in source.dict.common_prefix_search(suffix) {
                let end = start + result.reading.chars().count();
                for token in result.entries {
                    if filter.is_forbidden(&result.reading, &token.surface) {
                        dropped += 1;
                        continue;
                    }
                    let node = LatticeNode {
                        start,
                        end,
                        reading: result.reading.clone(),
                        surface: token.surface,
                        cost: token.cost,
                        left_id: token.left_id,
                        right_id: token.right_id,
                        source: source.tag,
                        order,
                    };
                    order += 1;

                    let key = (end, node.surface.clone(), node.left_id, node.right_id);
                    match seen.get(&key) {
                        Some(&idx) => {
                            let kept = &nodes[idx];
                            if (node.cost, node.source.priority()) < (kept.cost, kept.source.priority()) {
                                nodes[idx] = node;
                            }
                        }
                        None => {
                            let idx = nodes.len();
                            seen.insert(key, idx);
                            nodes.push(node);
                            nodes_by_end[end].push(idx);
                            nodes_by_start[start].push(idx);
                        }
                    }
                }
            }
        }

        let has_single_char = nodes_by_start[start]
            .iter()
            .any(|&idx| nodes[idx].end == start + 1);
        if !has_single_char {
            let next_offset = byte_offsets.get(start + 1).copied().unwrap_or(kana.len());
            let ch = kana[byte_offsets[start]..next_offset].to_string();
            let s = &settings().cost;
            let idx = nodes.len();
            nodes.push(LatticeNode {
                start,
                end: start + 1,
                reading: ch.clone(),
                surface: ch,
                cost: s.unknown_word_cost,
                left_id: s.unknown_pos_id,
                right_id: s.unknown_pos_id,
                source: SourceTag::Unknown,
                order,
            });
            order += 1;
            nodes_by_end[start + 1].push(idx);
            nodes_by_start[start].push(idx);
        }
    }

    debug!(node_count = nodes.len(), dropped);
    Lattice {
        input: kana.to_string(),
        nodes,
        nodes_by_end,
        nodes_by_start,
        char_count,
    }
}
