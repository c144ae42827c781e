//! Forbidden (reading, surface) pairs that must never be offered.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::snapshot::SnapshotCell;

/// Predicate consulted once per token while the lattice is built.
pub trait WordFilter: Send + Sync {
    fn is_forbidden(&self, reading: &str, surface: &str) -> bool;
}

type NgMap = HashMap<String, HashSet<String>>;

/// Runtime-editable NG-word list.
#[derive(Default)]
pub struct NgWordFilter {
    words: SnapshotCell<NgMap>,
}

/// Immutable view of the list taken at the start of a conversion.
#[derive(Clone)]
pub struct NgWordSnapshot(Arc<NgMap>);

impl NgWordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<R, S>(pairs: impl IntoIterator<Item = (R, S)>) -> Self
    where
        R: Into<String>,
        S: Into<String>,
    {
        let mut map = NgMap::new();
        for (reading, surface) in pairs {
            map.entry(reading.into()).or_default().insert(surface.into());
        }
        Self {
            words: SnapshotCell::new(map),
        }
    }

    /// Returns `true` if the pair was not already forbidden.
    pub fn add(&self, reading: &str, surface: &str) -> bool {
        self.words.update(|map| {
            map.entry(reading.to_string())
                .or_default()
                .insert(surface.to_string())
        })
    }

    /// Returns `true` if the pair was forbidden.
    pub fn remove(&self, reading: &str, surface: &str) -> bool {
        self.words.update(|map| {
            let Some(surfaces) = map.get_mut(reading) else {
                return false;
            };
            let removed = surfaces.remove(surface);
            if surfaces.is_empty() {
                map.remove(reading);
            }
            removed
        })
    }

    /// All pairs, sorted.
    pub fn list(&self) -> Vec<(String, String)> {
        let map = self.words.load();
        let sorted: BTreeSet<(String, String)> = map
            .iter()
            .flat_map(|(r, surfaces)| surfaces.iter().map(move |s| (r.clone(), s.clone())))
            .collect();
        sorted.into_iter().collect()
    }

    pub fn snapshot(&self) -> NgWordSnapshot {
        NgWordSnapshot(self.words.load())
    }
}

impl WordFilter for NgWordSnapshot {
    fn is_forbidden(&self, reading: &str, surface: &str) -> bool {
        self.0
            .get(reading)
            .is_some_and(|surfaces| surfaces.contains(surface))
    }
}

impl WordFilter for NgWordFilter {
    fn is_forbidden(&self, reading: &str, surface: &str) -> bool {
        self.snapshot().is_forbidden(reading, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_list() {
        let ng = NgWordFilter::new();
        assert!(ng.add("こ", "子"));
        assert!(!ng.add("こ", "子"));
        assert!(ng.add("こ", "粉"));
        assert!(ng.is_forbidden("こ", "子"));
        assert!(!ng.is_forbidden("ねこ", "子"), "pairs are matched by reading too");
        assert_eq!(
            ng.list(),
            vec![
                ("こ".to_string(), "子".to_string()),
                ("こ".to_string(), "粉".to_string())
            ]
        );
        assert!(ng.remove("こ", "子"));
        assert!(!ng.remove("こ", "子"));
        assert!(!ng.is_forbidden("こ", "子"));
    }

    #[test]
    fn snapshot_ignores_later_edits() {
        let ng = NgWordFilter::from_pairs([("こ", "子")]);
        let snap = ng.snapshot();
        ng.remove("こ", "子");
        assert!(snap.is_forbidden("こ", "子"));
        assert!(!ng.snapshot().is_forbidden("こ", "子"));
    }
}
