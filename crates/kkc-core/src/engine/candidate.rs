use std::fmt;

use serde::Serialize;

use crate::converter::{LatticeNode, ScoredPath};
use crate::dict::SourceTag;

/// Script of a kana-form candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KanaForm {
    Hiragana,
    Katakana,
    HalfwidthKatakana,
}

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Origin {
    /// Multi-segment path through the lattice.
    Conversion,
    /// Single-token path; the token's source.
    Source(SourceTag),
    /// Completion of a longer reading from the tagged source.
    Prediction(SourceTag),
    /// Word for a reading that is a strict prefix of the input.
    Partial(SourceTag),
    Kana(KanaForm),
    Numeric,
    /// Date, clock time or era year.
    Calendar,
}

impl Origin {
    /// Merge order among candidates of equal cost; lower first.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Origin::Conversion | Origin::Source(_) => 0,
            Origin::Prediction(_) | Origin::Partial(_) => 1,
            Origin::Numeric | Origin::Calendar => 2,
            Origin::Kana(_) => 3,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Conversion => f.write_str("conversion"),
            Origin::Source(tag) => write!(f, "{tag}"),
            Origin::Prediction(tag) => write!(f, "prediction:{tag}"),
            Origin::Partial(tag) => write!(f, "partial:{tag}"),
            Origin::Kana(KanaForm::Hiragana) => f.write_str("hiragana"),
            Origin::Kana(KanaForm::Katakana) => f.write_str("katakana"),
            Origin::Kana(KanaForm::HalfwidthKatakana) => f.write_str("halfwidth_katakana"),
            Origin::Numeric => f.write_str("numeric"),
            Origin::Calendar => f.write_str("calendar"),
        }
    }
}

/// One token of a candidate, with the connection classes `record_selection`
/// learns it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub reading: String,
    pub surface: String,
    pub left_id: u16,
    pub right_id: u16,
    pub source: SourceTag,
}

impl From<LatticeNode> for Segment {
    fn from(node: LatticeNode) -> Self {
        Self {
            reading: node.reading,
            surface: node.surface,
            left_id: node.left_id,
            right_id: node.right_id,
            source: node.source,
        }
    }
}

/// A ranked conversion result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub surface: String,
    pub cost: i64,
    pub origin: Origin,
    /// Reading this candidate covers; longer than the input for predictions,
    /// shorter for partial readings.
    pub reading: String,
    pub segments: Vec<Segment>,
}

impl Candidate {
    /// A single-segment candidate outside the lattice.
    pub(crate) fn single(
        reading: &str,
        surface: String,
        cost: i64,
        origin: Origin,
        ids: (u16, u16),
        source: SourceTag,
    ) -> Self {
        Self {
            segments: vec![Segment {
                reading: reading.to_string(),
                surface: surface.clone(),
                left_id: ids.0,
                right_id: ids.1,
                source,
            }],
            surface,
            cost,
            origin,
            reading: reading.to_string(),
        }
    }
}

impl From<ScoredPath> for Candidate {
    fn from(path: ScoredPath) -> Self {
        let surface = path.surface();
        let reading = path.reading();
        let origin = match path.nodes.as_slice() {
            [only] => Origin::Source(only.source),
            _ => Origin::Conversion,
        };
        Self {
            surface,
            cost: path.cost,
            origin,
            reading,
            segments: path.nodes.into_iter().map(Segment::from).collect(),
        }
    }
}
