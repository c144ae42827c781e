use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::succinct::BitVector;

/// Row index → `(left_id, right_id)` of the connection matrix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PosTable {
    rows: Vec<(u16, u16)>,
}

impl PosTable {
    pub(crate) fn from_rows(rows: Vec<(u16, u16)>) -> Self {
        Self { rows }
    }

    pub fn get(&self, index: u16) -> Option<(u16, u16)> {
        self.rows.get(index as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Largest POS id referenced by any row.
    pub fn max_id(&self) -> Option<u16> {
        self.rows.iter().map(|&(l, r)| l.max(r)).max()
    }
}

/// How a token spells its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRef {
    /// Surface equals the reading (kana-only words).
    Reading,
    /// Surface is the katakana spelling of the reading.
    Katakana,
    /// Surface is the key of this node in the surface trie.
    Node(usize),
}

impl SurfaceRef {
    const READING: i32 = -1;
    const KATAKANA: i32 = -2;

    fn encode(self) -> i32 {
        match self {
            SurfaceRef::Reading => Self::READING,
            SurfaceRef::Katakana => Self::KATAKANA,
            SurfaceRef::Node(n) => n as i32,
        }
    }

    fn decode(raw: i32) -> Option<Self> {
        match raw {
            Self::READING => Some(SurfaceRef::Reading),
            Self::KATAKANA => Some(SurfaceRef::Katakana),
            n if n > 0 => Some(SurfaceRef::Node(n as usize)),
            _ => None,
        }
    }
}

/// A token as stored: POS row, cost and surface reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken {
    pub pos_index: u16,
    pub cost: i16,
    pub surface: SurfaceRef,
}

/// Per-term token lists packed into parallel arrays.
///
/// `boundaries` holds a `0` for each term id followed by one `1` per token of
/// that term, so the tokens of term `t` occupy the `1`s between the `t`-th and
/// `t+1`-th zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenTable {
    boundaries: BitVector,
    pos_indices: Vec<u16>,
    costs: Vec<i16>,
    surfaces: Vec<i32>,
}

impl TokenTable {
    /// Builds from token lists in term-id order.
    pub(crate) fn from_lists(lists: &[Vec<RawToken>]) -> Self {
        let total: usize = lists.iter().map(Vec::len).sum();
        let mut bits = Vec::with_capacity(lists.len() + total);
        let mut pos_indices = Vec::with_capacity(total);
        let mut costs = Vec::with_capacity(total);
        let mut surfaces = Vec::with_capacity(total);
        for list in lists {
            bits.push(false);
            for t in list {
                bits.push(true);
                pos_indices.push(t.pos_index);
                costs.push(t.cost);
                surfaces.push(t.surface.encode());
            }
        }
        Self {
            boundaries: BitVector::from_bits(bits),
            pos_indices,
            costs,
            surfaces,
        }
    }

    pub fn num_terms(&self) -> usize {
        self.boundaries.num_zeros()
    }

    pub fn num_tokens(&self) -> usize {
        self.boundaries.num_ones()
    }

    /// Index range into the parallel arrays for `term_id`; `None` when out of
    /// range.
    pub fn range_of(&self, term_id: usize) -> Option<Range<usize>> {
        let start = self.boundaries.select0(term_id)? - term_id;
        let end = match self.boundaries.select0(term_id + 1) {
            Some(p) => p - (term_id + 1),
            None => self.num_tokens(),
        };
        Some(start..end)
    }

    pub fn tokens_of(&self, term_id: usize) -> Vec<RawToken> {
        let Some(range) = self.range_of(term_id) else {
            return Vec::new();
        };
        range.filter_map(|i| self.token_at(i)).collect()
    }

    fn token_at(&self, i: usize) -> Option<RawToken> {
        Some(RawToken {
            pos_index: *self.pos_indices.get(i)?,
            cost: *self.costs.get(i)?,
            surface: SurfaceRef::decode(*self.surfaces.get(i)?)?,
        })
    }

    /// Checks the table against the term count of its reading trie, the POS
    /// table length and the node count of its surface trie.
    pub(crate) fn validate(
        &self,
        num_terms: usize,
        pos_len: usize,
        surface_nodes: usize,
    ) -> Result<(), String> {
        let tokens = self.num_tokens();
        if self.pos_indices.len() != tokens
            || self.costs.len() != tokens
            || self.surfaces.len() != tokens
        {
            return Err(format!(
                "token arrays disagree: {tokens} boundaries, {} pos, {} costs, {} surfaces",
                self.pos_indices.len(),
                self.costs.len(),
                self.surfaces.len()
            ));
        }
        if self.num_terms() != num_terms {
            return Err(format!(
                "token table covers {} terms but reading trie has {num_terms}",
                self.num_terms()
            ));
        }
        if self.boundaries.get(0) == Some(true) {
            return Err("token table starts with a token before any term".into());
        }
        if let Some(&bad) = self.pos_indices.iter().find(|&&p| p as usize >= pos_len) {
            return Err(format!("POS index {bad} out of range ({pos_len} rows)"));
        }
        for &raw in &self.surfaces {
            match SurfaceRef::decode(raw) {
                Some(SurfaceRef::Node(n)) if n >= surface_nodes => {
                    return Err(format!(
                        "surface node {n} out of range ({surface_nodes} nodes)"
                    ));
                }
                Some(_) => {}
                None => return Err(format!("invalid surface reference {raw}")),
            }
        }
        Ok(())
    }

    pub fn heap_bytes(&self) -> usize {
        self.boundaries.heap_bytes()
            + self.pos_indices.len() * 2
            + self.costs.len() * 2
            + self.surfaces.len() * 4
    }
}
