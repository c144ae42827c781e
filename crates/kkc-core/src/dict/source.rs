use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Origin of a dictionary token. The declaration order is the engine's fixed
/// lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceTag {
    System,
    SingleKanji,
    Symbol,
    Emoji,
    Emoticon,
    ReadingCorrection,
    Proverb,
    PersonName,
    Place,
    Wiki,
    Neologd,
    Web,
    User,
    Learned,
    /// Verbatim fallback for input no dictionary covers.
    Unknown,
}

impl SourceTag {
    pub const ALL: [SourceTag; 15] = [
        SourceTag::System,
        SourceTag::SingleKanji,
        SourceTag::Symbol,
        SourceTag::Emoji,
        SourceTag::Emoticon,
        SourceTag::ReadingCorrection,
        SourceTag::Proverb,
        SourceTag::PersonName,
        SourceTag::Place,
        SourceTag::Wiki,
        SourceTag::Neologd,
        SourceTag::Web,
        SourceTag::User,
        SourceTag::Learned,
        SourceTag::Unknown,
    ];

    /// Tie-break rank when two paths cost the same; lower wins.
    pub fn priority(self) -> u8 {
        match self {
            SourceTag::User | SourceTag::Learned => 0,
            SourceTag::System => 1,
            SourceTag::SingleKanji
            | SourceTag::ReadingCorrection
            | SourceTag::Proverb
            | SourceTag::PersonName
            | SourceTag::Place
            | SourceTag::Wiki
            | SourceTag::Neologd
            | SourceTag::Web => 2,
            SourceTag::Symbol | SourceTag::Emoji | SourceTag::Emoticon => 3,
            SourceTag::Unknown => 4,
        }
    }

    /// Sources loaded from dictionary images (everything except the overlays
    /// and the fallback).
    pub fn is_static(self) -> bool {
        !matches!(
            self,
            SourceTag::User | SourceTag::Learned | SourceTag::Unknown
        )
    }

    /// Large supplementary corpora stay off until explicitly enabled.
    pub fn enabled_by_default(self) -> bool {
        !matches!(
            self,
            SourceTag::PersonName
                | SourceTag::Place
                | SourceTag::Wiki
                | SourceTag::Neologd
                | SourceTag::Web
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::System => "system",
            SourceTag::SingleKanji => "single_kanji",
            SourceTag::Symbol => "symbol",
            SourceTag::Emoji => "emoji",
            SourceTag::Emoticon => "emoticon",
            SourceTag::ReadingCorrection => "reading_correction",
            SourceTag::Proverb => "proverb",
            SourceTag::PersonName => "person_name",
            SourceTag::Place => "place",
            SourceTag::Wiki => "wiki",
            SourceTag::Neologd => "neologd",
            SourceTag::Web => "web",
            SourceTag::User => "user",
            SourceTag::Learned => "learned",
            SourceTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceTag::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown source '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order() {
        assert!(SourceTag::Learned.priority() < SourceTag::System.priority());
        assert!(SourceTag::System.priority() < SourceTag::Wiki.priority());
        assert!(SourceTag::Wiki.priority() < SourceTag::Emoji.priority());
        assert!(SourceTag::Emoji.priority() < SourceTag::Unknown.priority());
    }

    #[test]
    fn name_roundtrip() {
        for tag in SourceTag::ALL {
            assert_eq!(tag.as_str().parse::<SourceTag>(), Ok(tag));
        }
        assert!("nope".parse::<SourceTag>().is_err());
    }
}
