//! User dictionary with runtime word registration.
//!
//! Words live in a copy-on-write map: conversions read an immutable snapshot
//! while `register`/`unregister` build the next version.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dict::{char_prefixes, Dictionary, SearchResult, Token};
use crate::overlay_io;
use crate::settings::settings;
use crate::snapshot::SnapshotCell;

const MAGIC: &[u8; 4] = b"KKUW";
const VERSION: u8 = 1;

/// Part of speech a user can pick when registering a word, mapped onto a
/// connection class of the system dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserPos {
    Noun,
    Verb,
    Adjective,
    Adverb,
    AuxiliaryVerb,
    Particle,
    Interjection,
    Conjunction,
    Prefix,
    Symbol,
    Adnominal,
    Other,
}

impl UserPos {
    pub const ALL: [UserPos; 12] = [
        UserPos::Noun,
        UserPos::Verb,
        UserPos::Adjective,
        UserPos::Adverb,
        UserPos::AuxiliaryVerb,
        UserPos::Particle,
        UserPos::Interjection,
        UserPos::Conjunction,
        UserPos::Prefix,
        UserPos::Symbol,
        UserPos::Adnominal,
        UserPos::Other,
    ];

    /// Connection class (left and right id).
    pub fn id(self) -> u16 {
        match self {
            UserPos::Noun => 1851,
            UserPos::Verb => 578,
            UserPos::Adjective => 2194,
            UserPos::Adverb => 12,
            UserPos::AuxiliaryVerb => 29,
            UserPos::Particle => 433,
            UserPos::Interjection => 2589,
            UserPos::Conjunction => 2591,
            UserPos::Prefix => 2594,
            UserPos::Symbol => 2642,
            UserPos::Adnominal => 2657,
            UserPos::Other => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserPos::Noun => "noun",
            UserPos::Verb => "verb",
            UserPos::Adjective => "adjective",
            UserPos::Adverb => "adverb",
            UserPos::AuxiliaryVerb => "auxiliary_verb",
            UserPos::Particle => "particle",
            UserPos::Interjection => "interjection",
            UserPos::Conjunction => "conjunction",
            UserPos::Prefix => "prefix",
            UserPos::Symbol => "symbol",
            UserPos::Adnominal => "adnominal",
            UserPos::Other => "other",
        }
    }
}

impl fmt::Display for UserPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserPos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserPos::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown part of speech '{s}'"))
    }
}

/// One registered word. `cost: None` follows `user_dict.default_cost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWord {
    pub reading: String,
    pub surface: String,
    pub pos: UserPos,
    pub cost: Option<i16>,
}

impl UserWord {
    fn to_token(&self) -> Token {
        let id = self.pos.id();
        Token {
            surface: self.surface.clone(),
            cost: self
                .cost
                .unwrap_or_else(|| settings().user_dict.default_cost),
            left_id: id,
            right_id: id,
        }
    }
}

type WordMap = HashMap<String, Vec<UserWord>>;

#[derive(Default)]
pub struct UserDictionary {
    words: SnapshotCell<WordMap>,
}

/// Immutable view used for one conversion.
#[derive(Clone)]
pub struct UserDictSnapshot(Arc<WordMap>);

impl UserDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a noun at the default cost. Returns `true` if newly added.
    pub fn register(&self, reading: &str, surface: &str) -> bool {
        self.register_with(reading, surface, UserPos::Noun, None)
    }

    /// Register a word. Returns `false` for empty input or when the pair is
    /// already registered (the existing entry is kept).
    pub fn register_with(
        &self,
        reading: &str,
        surface: &str,
        pos: UserPos,
        cost: Option<i16>,
    ) -> bool {
        if reading.is_empty() || surface.is_empty() {
            return false;
        }
        self.words.update(|map| {
            let words = map.entry(reading.to_string()).or_default();
            if words.iter().any(|w| w.surface == surface) {
                return false;
            }
            words.push(UserWord {
                reading: reading.to_string(),
                surface: surface.to_string(),
                pos,
                cost,
            });
            true
        })
    }

    /// Unregister a word. Returns `true` if removed, `false` if not found.
    pub fn unregister(&self, reading: &str, surface: &str) -> bool {
        self.words.update(|map| {
            let Some(words) = map.get_mut(reading) else {
                return false;
            };
            let before = words.len();
            words.retain(|w| w.surface != surface);
            let removed = words.len() < before;
            if words.is_empty() {
                map.remove(reading);
            }
            removed
        })
    }

    /// All words sorted by (reading, surface).
    pub fn list(&self) -> Vec<UserWord> {
        let map = self.words.load();
        let mut all: Vec<UserWord> = map.values().flatten().cloned().collect();
        all.sort_by(|a, b| (&a.reading, &a.surface).cmp(&(&b.reading, &b.surface)));
        all
    }

    pub fn snapshot(&self) -> UserDictSnapshot {
        UserDictSnapshot(self.words.load())
    }

    /// `KKUW` image of every registered word.
    pub fn to_bytes(&self) -> Result<Vec<u8>, io::Error> {
        overlay_io::encode(MAGIC, VERSION, &self.list())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, io::Error> {
        let dict = Self::new();
        for w in overlay_io::decode::<UserWord>(MAGIC, VERSION, bytes)? {
            dict.register_with(&w.reading, &w.surface, w.pos, w.cost);
        }
        Ok(dict)
    }

    pub fn save(&self, path: &Path) -> Result<(), io::Error> {
        overlay_io::save_atomic(path, &self.to_bytes()?)
    }

    /// Load `path`; a missing file gives an empty dictionary.
    pub fn open(path: &Path) -> Result<Self, io::Error> {
        match overlay_io::read_optional(path)? {
            Some(bytes) => Self::from_bytes(&bytes),
            None => Ok(Self::new()),
        }
    }
}

impl UserDictSnapshot {
    fn tokens(&self, reading: &str) -> Option<Vec<Token>> {
        self.0
            .get(reading)
            .map(|words| words.iter().map(UserWord::to_token).collect())
    }
}

impl Dictionary for UserDictSnapshot {
    fn lookup(&self, reading: &str) -> Vec<Token> {
        self.tokens(reading).unwrap_or_default()
    }

    fn predict(&self, prefix: &str, max_results: usize) -> Vec<SearchResult> {
        let mut readings: Vec<&String> = self
            .0
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

impl Dictionary for UserDictionary {
    fn lookup(&self, reading: &str) -> Vec<Token> {
        self.snapshot().lookup(reading)
    }

    fn predict(&self, prefix: &str, max_results: usize) -> Vec<SearchResult> {
        self.snapshot().predict(prefix, max_results)
    }

    fn common_prefix_search(&self, query: &str) -> Vec<SearchResult> {
        self.snapshot().common_prefix_search(query)
    }
}
