use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::token_table::{PosTable, RawToken, SurfaceRef, TokenTable};
use super::{DictError, Dictionary, SearchResult, Token};
use crate::louds::{LoudsBuilder, LoudsTrie, TermIdTrie};
use crate::unicode::hiragana_to_katakana;

/// A static dictionary source: reading trie, surface trie, token table and
/// POS table. Immutable once built or loaded.
#[derive(Serialize, Deserialize)]
pub struct TrieDictionary {
    pub(super) readings: TermIdTrie,
    pub(super) surfaces: LoudsTrie,
    pub(super) tokens: TokenTable,
    pub(super) pos: PosTable,
}

impl TrieDictionary {
    /// Builds a dictionary from `(reading, tokens)` pairs.
    ///
    /// Pairs sharing a reading are merged. Empty readings and tokens with an
    /// empty surface are skipped; each reading's tokens are ordered by cost,
    /// keeping input order among equal costs.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, Vec<Token>)>,
    ) -> Result<Self, DictError> {
        let mut by_reading: BTreeMap<String, Vec<Token>> = BTreeMap::new();
        for (reading, tokens) in entries {
            if reading.is_empty() {
                continue;
            }
            let kept = tokens.into_iter().filter(|t| !t.surface.is_empty());
            by_reading.entry(reading).or_default().extend(kept);
        }
        by_reading.retain(|_, tokens| !tokens.is_empty());
        for tokens in by_reading.values_mut() {
            tokens.sort_by_key(|t| t.cost);
        }

        let mut reading_builder = LoudsBuilder::new();
        reading_builder.extend(by_reading.keys());
        let readings = reading_builder.build().trie;

        let mut surface_builder = LoudsBuilder::new();
        for (reading, tokens) in &by_reading {
            let katakana = hiragana_to_katakana(reading);
            for t in tokens {
                if t.surface != *reading && t.surface != katakana {
                    surface_builder.insert(&t.surface);
                }
            }
        }
        let built_surfaces = surface_builder.build();

        let mut pos_rows = Vec::new();
        let mut pos_index: HashMap<(u16, u16), u16> = HashMap::new();
        let mut lists = vec![Vec::new(); readings.num_terms()];
        for (reading, tokens) in &by_reading {
            let Some(term_id) = readings.exact_match(reading) else {
                unreachable!("reading {reading} was inserted into the trie");
            };
            let katakana = hiragana_to_katakana(reading);
            for t in tokens {
                let key = (t.left_id, t.right_id);
                let index = match pos_index.get(&key) {
                    Some(&i) => i,
                    None => {
                        let i = u16::try_from(pos_rows.len()).map_err(|_| {
                            DictError::Parse("more than 65536 distinct POS pairs".into())
                        })?;
                        pos_rows.push(key);
                        pos_index.insert(key, i);
                        i
                    }
                };
                let surface = if t.surface == *reading {
                    SurfaceRef::Reading
                } else if t.surface == katakana {
                    SurfaceRef::Katakana
                } else {
                    SurfaceRef::Node(built_surfaces.nodes[&t.surface])
                };
                lists[term_id].push(RawToken {
                    pos_index: index,
                    cost: t.cost,
                    surface,
                });
            }
        }

        Ok(Self {
            readings,
            surfaces: built_surfaces.trie.into_louds(),
            tokens: TokenTable::from_lists(&lists),
            pos: PosTable::from_rows(pos_rows),
        })
    }

    /// Cross-checks every component; a dictionary that passes never indexes
    /// out of bounds at query time.
    pub(super) fn validate(&self) -> Result<(), DictError> {
        self.readings
            .validate()
            .map_err(|e| DictError::Corrupt(format!("reading trie: {e}")))?;
        self.surfaces
            .validate()
            .map_err(|e| DictError::Corrupt(format!("surface trie: {e}")))?;
        self.tokens
            .validate(
                self.readings.num_terms(),
                self.pos.len(),
                self.surfaces.num_nodes(),
            )
            .map_err(|e| DictError::Corrupt(format!("token table: {e}")))
    }

    fn materialize(&self, reading: &str, raw: RawToken) -> Token {
        let surface = match raw.surface {
            SurfaceRef::Reading => reading.to_string(),
            SurfaceRef::Katakana => hiragana_to_katakana(reading),
            SurfaceRef::Node(node) => match self.surfaces.key_of(node) {
                Some(s) => s,
                None => unreachable!("surface node {node} passed validation"),
            },
        };
        let Some((left_id, right_id)) = self.pos.get(raw.pos_index) else {
            unreachable!("POS index {} passed validation", raw.pos_index);
        };
        Token {
            surface,
            cost: raw.cost,
            left_id,
            right_id,
        }
    }

    fn tokens_for_term(&self, reading: &str, term_id: usize) -> Vec<Token> {
        self.tokens
            .tokens_of(term_id)
            .into_iter()
            .map(|raw| self.materialize(reading, raw))
            .collect()
    }

    /// Iterate over all `(reading, tokens)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (String, Vec<Token>)> + '_ {
        self.readings
            .predictive_search("", usize::MAX)
            .into_iter()
            .map(move |(reading, term_id)| {
                let tokens = self.tokens_for_term(&reading, term_id);
                (reading, tokens)
            })
    }

    /// Returns (reading_count, token_count).
    pub fn stats(&self) -> (usize, usize) {
        (self.readings.num_terms(), self.tokens.num_tokens())
    }

    /// Largest POS id any token refers to, for checking against a
    /// connection matrix.
    pub fn max_pos_id(&self) -> Option<u16> {
        self.pos.max_id()
    }

    pub fn heap_bytes(&self) -> usize {
        self.readings.heap_bytes() + self.surfaces.heap_bytes() + self.tokens.heap_bytes()
    }
}

impl Dictionary for TrieDictionary {
    fn lookup(&self, reading: &str) -> Vec<Token> {
        match self.readings.exact_match(reading) {
            Some(term_id) => self.tokens_for_term(reading, term_id),
            None => Vec::new(),
        }
    }

    fn predict(&self, prefix: &str, max_results: usize) -> Vec<SearchResult> {
        self.readings
            .predictive_search(prefix, max_results)
            .into_iter()
            .map(|(reading, term_id)| SearchResult {
                entries: self.tokens_for_term(&reading, term_id),
                reading,
            })
            .collect()
    }

    fn common_prefix_search(&self, query: &str) -> Vec<SearchResult> {
        self.readings
            .common_prefix_search(query)
            .into_iter()
            .map(|m| {
                let reading = &query[..m.byte_len];
                SearchResult {
                    reading: reading.to_string(),
                    entries: self.tokens_for_term(reading, m.term_id),
                }
            })
            .collect()
    }
}
