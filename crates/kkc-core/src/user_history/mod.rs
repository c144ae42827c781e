//! Learned-word overlay with time-decayed scoring.
//!
//! Every confirmed selection raises the score of its (reading, surface) pair.
//! The overlay is exposed to the lattice as a dictionary whose token cost
//! falls as the score grows and rises again as the entry ages.

mod persistence;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::dict::{char_prefixes, Dictionary, SearchResult, Token};
use crate::settings::settings;
use crate::snapshot::SnapshotCell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedEntry {
    pub score: u32,
    pub last_used: u64,
    pub left_id: u16,
    pub right_id: u16,
}

impl LearnedEntry {
    /// Emission cost at time `now`:
    /// `base_cost - min(score * boost_per_use, max_boost) * decay`.
    pub fn cost(&self, now: u64) -> i16 {
        let s = &settings().learning;
        let boost = (self.score as i64 * s.boost_per_use).min(s.max_boost);
        let decayed = (boost as f64 * decay(self.last_used, now)) as i64;
        (s.base_cost - decayed).clamp(i16::MIN as i64, i16::MAX as i64) as i16
    }

    fn rank(&self, now: u64) -> f64 {
        self.score as f64 * decay(self.last_used, now)
    }
}

/// A learned entry whose reading is a prefix of a queried string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedHit {
    pub reading: String,
    pub surface: String,
    pub score: u32,
    pub cost: i16,
}

/// Flat record used by `list_all` and persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedRecord {
    pub reading: String,
    pub surface: String,
    pub score: u32,
    pub last_used: u64,
    pub left_id: u16,
    pub right_id: u16,
}

#[derive(Clone, Default)]
struct LearnedStore {
    /// reading → (surface → entry)
    by_reading: HashMap<String, HashMap<String, LearnedEntry>>,
    len: usize,
}

pub fn now_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Snapshot clocks are floored to this many seconds, so learned costs stay
/// fixed between conversions within the same hour.
const CLOCK_RESOLUTION_SECS: u64 = 3600;

fn decay(last_used: u64, now: u64) -> f64 {
    let hours = (now.saturating_sub(last_used)) as f64 / 3600.0;
    1.0 / (1.0 + hours / settings().learning.half_life_hours)
}

impl LearnedStore {
    fn upsert(
        &mut self,
        reading: &str,
        surface: &str,
        ids: (u16, u16),
        score_delta: i64,
        now: u64,
    ) -> Option<u32> {
        let inner = self.by_reading.entry(reading.to_string()).or_default();
        let current = inner.get(surface).map_or(0, |e| e.score as i64);
        let score = (current + score_delta).clamp(0, u32::MAX as i64) as u32;
        if score == 0 {
            if inner.remove(surface).is_some() {
                self.len -= 1;
            }
            if inner.is_empty() {
                self.by_reading.remove(reading);
            }
            return None;
        }
        let entry = LearnedEntry {
            score,
            last_used: now,
            left_id: ids.0,
            right_id: ids.1,
        };
        if inner.insert(surface.to_string(), entry).is_none() {
            self.len += 1;
        }
        Some(score)
    }

    fn remove(&mut self, reading: &str, surface: &str) -> bool {
        let Some(inner) = self.by_reading.get_mut(reading) else {
            return false;
        };
        let removed = inner.remove(surface).is_some();
        if removed {
            self.len -= 1;
        }
        if inner.is_empty() {
            self.by_reading.remove(reading);
        }
        removed
    }

    /// Drop the lowest-ranked entries until at most `max` remain.
    fn evict(&mut self, max: usize, now: u64) {
        if self.len <= max {
            return;
        }
        let mut all: Vec<(String, String, f64)> = Vec::with_capacity(self.len);
        for (reading, inner) in &self.by_reading {
            for (surface, entry) in inner {
                all.push((reading.clone(), surface.clone(), entry.rank(now)));
            }
        }
        let to_remove = self.len - max;
        all.select_nth_unstable_by(to_remove - 1, |a, b| {
            a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal)
        });
        for (reading, surface, _) in &all[..to_remove] {
            self.remove(reading, surface);
        }
    }
}

/// Runtime learning overlay. Cheap to share behind an `Arc`; all methods
/// take `&self`.
#[derive(Default)]
pub struct LearnedOverlay {
    store: SnapshotCell<LearnedStore>,
}

/// Consistent view of the overlay for one conversion, with the clock fixed
/// at the start of the hour it was taken in.
#[derive(Clone)]
pub struct LearnedSnapshot {
    store: Arc<LearnedStore>,
    now: u64,
}

impl LearnedOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `score_delta` to the pair's score, creating it with the default
    /// connection class. A score that drops to zero removes the entry.
    /// Returns the new score.
    pub fn insert_or_update(&self, reading: &str, surface: &str, score_delta: i64) -> Option<u32> {
        let id = settings().learning.default_pos_id;
        self.record(reading, surface, id, id, score_delta)
    }

    /// Like [`insert_or_update`](Self::insert_or_update) with explicit
    /// connection ids, which replace any stored ones.
    pub fn record(
        &self,
        reading: &str,
        surface: &str,
        left_id: u16,
        right_id: u16,
        score_delta: i64,
    ) -> Option<u32> {
        self.record_at(reading, surface, (left_id, right_id), score_delta, now_epoch())
    }

    pub(crate) fn record_at(
        &self,
        reading: &str,
        surface: &str,
        ids: (u16, u16),
        score_delta: i64,
        now: u64,
    ) -> Option<u32> {
        if reading.is_empty() || surface.is_empty() {
            return None;
        }
        let max = settings().learning.max_entries;
        self.store.update(|store| {
            let score = store.upsert(reading, surface, ids, score_delta, now);
            store.evict(max, now);
            score
        })
    }

    pub fn remove(&self, reading: &str, surface: &str) -> bool {
        self.store.update(|store| store.remove(reading, surface))
    }

    pub fn clear(&self) {
        self.store.update(|store| *store = LearnedStore::default());
    }

    pub fn len(&self) -> usize {
        self.store.load().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries whose reading is a prefix of `query`.
    pub fn lookup_prefix(&self, query: &str) -> Vec<LearnedHit> {
        self.snapshot().lookup_prefix(query)
    }

    /// All entries sorted by (reading, surface).
    pub fn list_all(&self) -> Vec<LearnedRecord> {
        let store = self.store.load();
        let mut all: Vec<LearnedRecord> = store
            .by_reading
            .iter()
            .flat_map(|(reading, inner)| {
                inner.iter().map(move |(surface, e)| LearnedRecord {
                    reading: reading.clone(),
                    surface: surface.clone(),
                    score: e.score,
                    last_used: e.last_used,
                    left_id: e.left_id,
                    right_id: e.right_id,
                })
            })
            .collect();
        all.sort_by(|a, b| (&a.reading, &a.surface).cmp(&(&b.reading, &b.surface)));
        all
    }

    pub fn snapshot(&self) -> LearnedSnapshot {
        self.snapshot_at(now_epoch())
    }

    pub(crate) fn snapshot_at(&self, now: u64) -> LearnedSnapshot {
        LearnedSnapshot {
            store: self.store.load(),
            now: now - now % CLOCK_RESOLUTION_SECS,
        }
    }
}

impl LearnedSnapshot {
    fn tokens(&self, reading: &str) -> Option<Vec<Token>> {
        let inner = self.store.by_reading.get(reading)?;
        let mut tokens: Vec<Token> = inner
            .iter()
            .map(|(surface, e)| Token {
                surface: surface.clone(),
                cost: e.cost(self.now),
                left_id: e.left_id,
                right_id: e.right_id,
            })
            .collect();
        // HashMap order is arbitrary; keep lookups deterministic.
        tokens.sort_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.surface.cmp(&b.surface)));
        Some(tokens)
    }

    pub fn lookup_prefix(&self, query: &str) -> Vec<LearnedHit> {
        let mut hits = Vec::new();
        for prefix in char_prefixes(query) {
            let Some(inner) = self.store.by_reading.get(prefix) else {
                continue;
            };
            let mut group: Vec<LearnedHit> = inner
                .iter()
                .map(|(surface, e)| LearnedHit {
                    reading: prefix.to_string(),
                    surface: surface.clone(),
                    score: e.score,
                    cost: e.cost(self.now),
                })
                .collect();
            group.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.surface.cmp(&b.surface)));
            hits.extend(group);
        }
        hits
    }
}

impl Dictionary for LearnedSnapshot {
    fn lookup(&self, reading: &str) -> Vec<Token> {
        self.tokens(reading).unwrap_or_default()
    }

    fn predict(&self, prefix: &str, max_results: usize) -> Vec<SearchResult> {
        let mut readings: Vec<&String> = self
            .store
            .by_reading
            .keys()
            .filter(|k| k.starts_with(prefix))
            .collect();
        readings.sort();
        readings
            .into_iter()
            .take(max_results)
            .map(|r| SearchResult {
                reading: r.clone(),
                entries: self.lookup(r),
            })
            .collect()
    }

    fn common_prefix_search(&self, query: &str) -> Vec<SearchResult> {
        char_prefixes(query)
            .filter_map(|prefix| {
                self.tokens(prefix).map(|entries| SearchResult {
                    reading: prefix.to_string(),
                    entries,
                })
            })
            .collect()
    }
}
