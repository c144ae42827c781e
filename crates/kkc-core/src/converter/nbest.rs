use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, debug_span, warn};

use crate::settings::settings;

use super::cost::CostFunction;
use super::lattice::{Lattice, LatticeNode};

/// A complete BOS→EOS path with its total cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredPath {
    pub nodes: Vec<LatticeNode>,
    pub cost: i64,
}

impl ScoredPath {
    /// Concatenated surface; the deduplication key.
    pub fn surface(&self) -> String {
        self.nodes.iter().map(|n| n.surface.as_str()).collect()
    }

    pub fn reading(&self) -> String {
        self.nodes.iter().map(|n| n.reading.as_str()).collect()
    }

    fn tie_key(&self) -> Vec<(u8, usize)> {
        self.nodes.iter().map(LatticeNode::tie_key).collect()
    }
}

/// One step of a partial path, linked toward EOS.
struct Link {
    node: usize,
    next: Option<usize>,
}

/// Best BOS→node cost for every node, including the node's own word cost.
/// `None` for nodes no path from BOS reaches.
fn forward_costs(lattice: &Lattice, cost_fn: &dyn CostFunction) -> Vec<Option<i64>> {
    let mut best: Vec<Option<i64>> = vec![None; lattice.nodes.len()];
    for pos in 0..lattice.char_count {
        for &idx in &lattice.nodes_by_start[pos] {
            let node = &lattice.nodes[idx];
            let entry = if pos == 0 {
                Some(cost_fn.bos_cost(node))
            } else {
                lattice.nodes_by_end[pos]
                    .iter()
                    .filter_map(|&prev| {
                        best[prev].map(|c| c + cost_fn.transition_cost(&lattice.nodes[prev], node))
                    })
                    .min()
            };
            best[idx] = entry.map(|c| c + cost_fn.word_cost(node));
        }
    }
    best
}

/// K lowest-cost paths with distinct surfaces.
///
/// A forward pass fixes the exact best prefix cost of every node. The backward
/// pass grows suffixes from EOS in a priority queue keyed by
/// `prefix cost + suffix cost`; since the prefix estimate is exact, complete
/// paths leave the queue in nondecreasing total cost. Collection stops once
/// `k` distinct surfaces are held and the queue head costs strictly more than
/// the last collected path, so every path tying the K-th is seen. Results are
/// ordered by `(cost, tie key)` and deduplicated by surface, keeping the
/// cheapest.
///
/// A suffix is expanded at most once per `(node, suffix surface)`: every
/// later pop of that state has the same completions at no lower cost. Among
/// equal-cost suffixes only a strictly better tie key is expanded again.
pub fn nbest_paths(lattice: &Lattice, cost_fn: &dyn CostFunction, k: usize) -> Vec<ScoredPath> {
    let char_count = lattice.char_count;
    let _span = debug_span!("nbest_paths", k, char_count).entered();
    if char_count == 0 || k == 0 {
        return Vec::new();
    }

    let best = forward_costs(lattice, cost_fn);

    let mut links: Vec<Link> = Vec::new();
    // (f = prefix + suffix, push seq, suffix cost after the link's node, link)
    let mut heap: BinaryHeap<Reverse<(i64, usize, i64, usize)>> = BinaryHeap::new();
    let mut seq = 0usize;
    for &idx in &lattice.nodes_by_end[char_count] {
        let Some(prefix) = best[idx] else {
            continue;
        };
        let g = cost_fn.eos_cost(&lattice.nodes[idx]);
        links.push(Link {
            node: idx,
            next: None,
        });
        heap.push(Reverse((prefix + g, seq, g, links.len() - 1)));
        seq += 1;
    }

    let max_expansions = settings().nbest.max_expansions;
    let mut expansions = 0usize;
    let mut found: Vec<ScoredPath> = Vec::new();
    let mut surfaces: HashSet<String> = HashSet::new();
    // (node, suffix surface) → (suffix cost, suffix tie key) of the expanded suffix
    let mut expanded: HashMap<(usize, String), (i64, Vec<(u8, usize)>)> = HashMap::new();

    while let Some(&Reverse((f, ..))) = heap.peek() {
        if surfaces.len() >= k && found.last().is_some_and(|p| f > p.cost) {
            break;
        }
        if expansions >= max_expansions {
            warn!(
                max_expansions,
                found = found.len(),
                "n-best search hit the expansion ceiling"
            );
            break;
        }
        let Some(Reverse((f, _, g, link))) = heap.pop() else {
            break;
        };
        let idx = links[link].node;
        let (suffix_surface, suffix_tie) = suffix_of(lattice, &links, link);
        match expanded.entry((idx, suffix_surface)) {
            Entry::Occupied(mut seen) => {
                let (best_g, best_tie) = seen.get();
                if g > *best_g || (g == *best_g && suffix_tie >= *best_tie) {
                    continue;
                }
                seen.insert((g, suffix_tie));
            }
            Entry::Vacant(slot) => {
                slot.insert((g, suffix_tie));
            }
        }
        expansions += 1;

        let node = &lattice.nodes[idx];
        if node.start == 0 {
            let path = trace_path(lattice, &links, link, f);
            surfaces.insert(path.surface());
            found.push(path);
            continue;
        }

        let g_here = g + cost_fn.word_cost(node);
        for &prev in &lattice.nodes_by_end[node.start] {
            let Some(prefix) = best[prev] else {
                continue;
            };
            let g_prev = g_here + cost_fn.transition_cost(&lattice.nodes[prev], node);
            links.push(Link {
                node: prev,
                next: Some(link),
            });
            heap.push(Reverse((prefix + g_prev, seq, g_prev, links.len() - 1)));
            seq += 1;
        }
    }

    found.sort_by_cached_key(|p| (p.cost, p.tie_key()));
    let mut seen: HashSet<String> = HashSet::new();
    found.retain(|p| seen.insert(p.surface()));
    found.truncate(k);

    debug!(
        expansions,
        result_count = found.len(),
        best_cost = found.first().map(|p| p.cost)
    );
    found
}

/// Surface and tie key of the suffix starting at `head`'s node.
fn suffix_of(lattice: &Lattice, links: &[Link], head: usize) -> (String, Vec<(u8, usize)>) {
    let mut surface = String::new();
    let mut tie = Vec::new();
    let mut cur = Some(head);
    while let Some(link) = cur {
        let node = &lattice.nodes[links[link].node];
        surface.push_str(&node.surface);
        tie.push(node.tie_key());
        cur = links[link].next;
    }
    (surface, tie)
}

fn trace_path(lattice: &Lattice, links: &[Link], head: usize, cost: i64) -> ScoredPath {
    let mut nodes = Vec::new();
    let mut cur = Some(head);
    while let Some(link) = cur {
        nodes.push(lattice.nodes[links[link].node].clone());
        cur = links[link].next;
    }
    ScoredPath { nodes, cost }
}
