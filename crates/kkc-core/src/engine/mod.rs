//! Multi-source conversion engine.
//!
//! Owns the static dictionaries, the connection matrix and the mutable
//! overlays (user dictionary, learned words, NG words). `convert` takes a
//! snapshot of every overlay, runs the lattice search and merges the
//! auxiliary candidates into one cost-ordered list.

mod auxiliary;
mod builder;
mod calendar;
mod candidate;
#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::converter::{convert_nbest, LatticeSource};
use crate::dict::connection::ConnectionMatrix;
use crate::dict::{DictError, Dictionary, SourceTag, TrieDictionary};
use crate::ng_word::NgWordFilter;
use crate::settings::settings;
use crate::user_dict::UserDictionary;
use crate::user_history::LearnedOverlay;

pub use builder::EngineBuilder;
pub use candidate::{Candidate, KanaForm, Origin, Segment};

/// Sources whose readings feed predictive completions.
const PREDICTION_SOURCES: [SourceTag; 3] = [
    SourceTag::System,
    SourceTag::ReadingCorrection,
    SourceTag::Proverb,
];

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("missing mandatory {0}")]
    Missing(&'static str),
    #[error("failed to load {what}: {error}")]
    Load {
        what: String,
        #[source]
        error: DictError,
    },
    #[error("{tag} dictionary uses connection id {max_id}, matrix has {num_ids}")]
    IdOutOfRange {
        tag: SourceTag,
        max_id: u16,
        num_ids: u16,
    },
}

struct RegisteredSource {
    tag: SourceTag,
    dict: Arc<TrieDictionary>,
    enabled: AtomicBool,
}

pub struct ConversionEngine {
    /// Loaded static sources in lookup order.
    sources: Vec<RegisteredSource>,
    conn: ConnectionMatrix,
    user: Arc<UserDictionary>,
    learned: Arc<LearnedOverlay>,
    ng_words: Arc<NgWordFilter>,
    user_enabled: AtomicBool,
    learned_enabled: AtomicBool,
}

impl ConversionEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Up to `max_results` candidates for `reading`, ascending by cost with
    /// no repeated surface. Empty input gives an empty list.
    pub fn convert(&self, reading: &str, max_results: usize) -> Vec<Candidate> {
        if reading.is_empty() || max_results == 0 {
            return Vec::new();
        }
        let _span = debug_span!("convert", reading, max_results).entered();

        let user = self.user.snapshot();
        let learned = self.learned.snapshot();
        let ng = self.ng_words.snapshot();

        let mut lattice_sources: Vec<LatticeSource<'_>> = self
            .sources
            .iter()
            .filter(|s| s.enabled.load(Ordering::Relaxed))
            .map(|s| LatticeSource::new(s.tag, s.dict.as_ref() as &dyn Dictionary))
            .collect();
        if self.user_enabled.load(Ordering::Relaxed) {
            lattice_sources.push(LatticeSource::new(SourceTag::User, &user));
        }
        if self.learned_enabled.load(Ordering::Relaxed) {
            lattice_sources.push(LatticeSource::new(SourceTag::Learned, &learned));
        }

        let paths = convert_nbest(&lattice_sources, &ng, Some(&self.conn), reading, max_results);
        let mut candidates: Vec<Candidate> = paths.into_iter().map(Candidate::from).collect();

        candidates.extend(auxiliary::kana_forms(reading, &ng));
        candidates.extend(auxiliary::numeric_forms(reading, &ng));
        candidates.extend(auxiliary::calendar_forms(reading, calendar::local_now(), &ng));
        for source in &self.sources {
            if !source.enabled.load(Ordering::Relaxed) {
                continue;
            }
            if PREDICTION_SOURCES.contains(&source.tag) {
                candidates.extend(auxiliary::predictions(
                    source.dict.as_ref(),
                    source.tag,
                    reading,
                    &ng,
                ));
            }
            if source.tag == SourceTag::System {
                candidates.extend(auxiliary::partial_readings(
                    source.dict.as_ref(),
                    source.tag,
                    reading,
                    &ng,
                ));
            }
        }

        // Stable: lattice paths keep their tie-broken order.
        candidates.sort_by_key(|c| (c.cost, c.origin.rank()));
        let mut seen = std::collections::HashSet::new();
        candidates.retain(|c| seen.insert(c.surface.clone()));
        candidates.truncate(max_results);

        debug!(
            count = candidates.len(),
            best = candidates.first().map(|c| c.surface.as_str())
        );
        candidates
    }

    /// [`convert`](Self::convert) with `nbest.n_best_preference` results.
    pub fn convert_preferred(&self, reading: &str) -> Vec<Candidate> {
        self.convert(reading, settings().nbest.n_best_preference)
    }

    /// Turn a source on. Returns `false` if it was never loaded.
    pub fn enable_source(&self, tag: SourceTag) -> bool {
        self.set_enabled(tag, true)
    }

    /// Turn a source off. Returns `false` if it was never loaded.
    pub fn disable_source(&self, tag: SourceTag) -> bool {
        self.set_enabled(tag, false)
    }

    fn set_enabled(&self, tag: SourceTag, enabled: bool) -> bool {
        let flag = match tag {
            SourceTag::User => &self.user_enabled,
            SourceTag::Learned => &self.learned_enabled,
            SourceTag::Unknown => return false,
            _ => match self.sources.iter().find(|s| s.tag == tag) {
                Some(source) => &source.enabled,
                None => return false,
            },
        };
        flag.store(enabled, Ordering::Relaxed);
        true
    }

    pub fn is_enabled(&self, tag: SourceTag) -> bool {
        match tag {
            SourceTag::User => self.user_enabled.load(Ordering::Relaxed),
            SourceTag::Learned => self.learned_enabled.load(Ordering::Relaxed),
            _ => self
                .sources
                .iter()
                .any(|s| s.tag == tag && s.enabled.load(Ordering::Relaxed)),
        }
    }

    /// Static sources that loaded, enabled or not.
    pub fn loaded_sources(&self) -> Vec<SourceTag> {
        self.sources.iter().map(|s| s.tag).collect()
    }

    /// Feed a confirmed candidate to the learned overlay: the whole
    /// reading/surface pair, plus each dictionary segment of a multi-segment
    /// candidate.
    pub fn record_selection(&self, candidate: &Candidate) {
        let learning = &settings().learning;
        if !learning.enabled || candidate.reading.is_empty() || candidate.surface.is_empty() {
            return;
        }
        let (left_id, right_id) = match (candidate.segments.first(), candidate.segments.last()) {
            (Some(first), Some(last)) => (first.left_id, last.right_id),
            _ => (learning.default_pos_id, learning.default_pos_id),
        };
        let delta = learning.score_per_selection;
        self.learned
            .record(&candidate.reading, &candidate.surface, left_id, right_id, delta);

        if candidate.segments.len() > 1 {
            for seg in &candidate.segments {
                if seg.source != SourceTag::Unknown {
                    self.learned
                        .record(&seg.reading, &seg.surface, seg.left_id, seg.right_id, delta);
                }
            }
        }
        debug!(reading = %candidate.reading, surface = %candidate.surface, "selection recorded");
    }

    pub fn user_dictionary(&self) -> &Arc<UserDictionary> {
        &self.user
    }

    pub fn learned(&self) -> &Arc<LearnedOverlay> {
        &self.learned
    }

    pub fn ng_words(&self) -> &Arc<NgWordFilter> {
        &self.ng_words
    }

    pub fn connection(&self) -> &ConnectionMatrix {
        &self.conn
    }

    /// A loaded static source.
    pub fn dictionary(&self, tag: SourceTag) -> Option<&Arc<TrieDictionary>> {
        self.sources.iter().find(|s| s.tag == tag).map(|s| &s.dict)
    }
}
