//! Global engine settings loaded from TOML.
//!
//! - `init_custom(toml_content)` installs a custom TOML before the first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        // Custom TOML was validated in `init_custom`; the default is checked by build.rs.
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub cost: CostSettings,
    pub nbest: NbestSettings,
    pub learning: LearningSettings,
    pub user_dict: UserDictSettings,
    pub candidates: CandidateSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostSettings {
    pub unknown_word_cost: i16,
    pub unknown_pos_id: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NbestSettings {
    pub n_best_preference: usize,
    pub max_expansions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearningSettings {
    pub enabled: bool,
    pub base_cost: i64,
    pub boost_per_use: i64,
    pub max_boost: i64,
    pub half_life_hours: f64,
    pub max_entries: usize,
    pub default_pos_id: u16,
    pub score_per_selection: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDictSettings {
    pub default_cost: i16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateSettings {
    pub kana_forms: bool,
    pub hiragana_cost: i64,
    pub katakana_cost: i64,
    pub halfwidth_katakana_cost: i64,

    pub numeric: bool,
    pub numeric_pos_id: u16,
    pub kanji_numeral_cost: i64,
    pub mixed_numeral_cost: i64,
    pub fullwidth_digits_cost: i64,
    pub comma_digits_cost: i64,
    pub plain_digits_cost: i64,

    pub prediction: bool,
    pub prediction_min_chars: usize,
    pub prediction_max_chars: usize,
    pub prediction_offset: i64,
    pub prediction_offset_long: i64,
    pub prediction_limit: usize,
    pub prediction_scan_limit: usize,

    pub partial_readings: bool,
    pub partial_max_chars: usize,
    pub partial_offset: i64,

    pub calendar: bool,
    pub date_cost: i64,
    pub time_cost: i64,
    pub era_cost: i64,
    pub digit_datetime_cost: i64,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_negative {
        ($section:ident . $field:ident) => {
            if s.$section.$field < 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be non-negative".to_string(),
                });
            }
        };
    }
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_non_negative!(cost.unknown_word_cost);

    check_positive_usize!(nbest.n_best_preference);
    check_positive_usize!(nbest.max_expansions);

    check_non_negative!(learning.base_cost);
    check_non_negative!(learning.boost_per_use);
    check_non_negative!(learning.max_boost);
    check_positive_usize!(learning.max_entries);
    if s.learning.score_per_selection <= 0 {
        return Err(SettingsError::InvalidValue {
            field: "learning.score_per_selection".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if s.learning.half_life_hours <= 0.0 {
        return Err(SettingsError::InvalidValue {
            field: "learning.half_life_hours".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    check_non_negative!(candidates.hiragana_cost);
    check_non_negative!(candidates.katakana_cost);
    check_non_negative!(candidates.halfwidth_katakana_cost);
    check_non_negative!(candidates.kanji_numeral_cost);
    check_non_negative!(candidates.mixed_numeral_cost);
    check_non_negative!(candidates.fullwidth_digits_cost);
    check_non_negative!(candidates.comma_digits_cost);
    check_non_negative!(candidates.plain_digits_cost);
    check_non_negative!(candidates.prediction_offset);
    check_non_negative!(candidates.prediction_offset_long);
    check_positive_usize!(candidates.prediction_min_chars);
    check_positive_usize!(candidates.prediction_scan_limit);
    check_non_negative!(candidates.partial_offset);
    check_non_negative!(candidates.date_cost);
    check_non_negative!(candidates.time_cost);
    check_non_negative!(candidates.era_cost);
    check_non_negative!(candidates.digit_datetime_cost);
    if s.candidates.prediction_max_chars < s.candidates.prediction_min_chars {
        return Err(SettingsError::InvalidValue {
            field: "candidates.prediction_max_chars".to_string(),
            reason: "must not be below prediction_min_chars".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_replaced(from: &str, to: &str) -> String {
        assert!(DEFAULT_SETTINGS_TOML.contains(from), "missing {from}");
        DEFAULT_SETTINGS_TOML.replacen(from, to, 1)
    }

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.cost.unknown_word_cost, 10000);
        assert_eq!(s.cost.unknown_pos_id, 0);
        assert_eq!(s.nbest.n_best_preference, 8);
        assert_eq!(s.nbest.max_expansions, 200000);
        assert!(s.learning.enabled);
        assert_eq!(s.learning.base_cost, 3000);
        assert_eq!(s.learning.boost_per_use, 3000);
        assert!((s.learning.half_life_hours - 168.0).abs() < f64::EPSILON);
        assert_eq!(s.learning.default_pos_id, 1851);
        assert_eq!(s.user_dict.default_cost, -1);
        assert_eq!(s.candidates.prediction_offset, 8000);
        assert_eq!(s.candidates.prediction_offset_long, 6000);
        assert_eq!(s.candidates.numeric_pos_id, 2040);
    }

    #[test]
    fn error_negative_unknown_cost() {
        let toml = with_replaced("unknown_word_cost = 10000", "unknown_word_cost = -5");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("cost.unknown_word_cost"));
    }

    #[test]
    fn error_zero_half_life() {
        let toml = with_replaced("half_life_hours = 168.0", "half_life_hours = 0.0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("half_life_hours"));
    }

    #[test]
    fn error_zero_preference() {
        let toml = with_replaced("n_best_preference = 8", "n_best_preference = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("nbest.n_best_preference"));
    }

    #[test]
    fn error_inverted_prediction_window() {
        let toml = with_replaced("prediction_max_chars = 16", "prediction_max_chars = 2");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("prediction_max_chars"));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let toml = r#"
[cost]
unknown_word_cost = 10000
unknown_pos_id = 0
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
