//! Kana-to-kanji conversion via lattice construction and k-shortest-path
//! search.
//!
//! Every dictionary source contributes nodes to one character-level lattice;
//! a forward Viterbi pass followed by a backward A* enumerates complete paths
//! in cost order.

pub mod cost;
mod lattice;
mod nbest;
#[cfg(test)]
pub(crate) mod testutil;

#[cfg(test)]
mod tests;

use crate::dict::connection::ConnectionMatrix;
use crate::ng_word::WordFilter;

use cost::DefaultCostFunction;

pub use lattice::{build_lattice, Lattice, LatticeNode, LatticeSource};
pub use nbest::{nbest_paths, ScoredPath};

/// Up to `n` lowest-cost paths for `kana` with distinct surfaces, best first.
pub fn convert_nbest(
    sources: &[LatticeSource<'_>],
    filter: &dyn WordFilter,
    conn: Option<&ConnectionMatrix>,
    kana: &str,
    n: usize,
) -> Vec<ScoredPath> {
    if kana.is_empty() || n == 0 {
        return Vec::new();
    }
    let cost_fn = DefaultCostFunction::new(conn);
    let lattice = build_lattice(sources, filter, kana);
    nbest_paths(&lattice, &cost_fn, n)
}

/// The single best path, if the input is non-empty.
pub fn convert_best(
    sources: &[LatticeSource<'_>],
    filter: &dyn WordFilter,
    conn: Option<&ConnectionMatrix>,
    kana: &str,
) -> Option<ScoredPath> {
    convert_nbest(sources, filter, conn, kana, 1).into_iter().next()
}
