//! Candidates that do not come from a lattice path: kana and numeral
//! spellings of the reading, predictive completions, words for a prefix of
//! the reading, and calendar expressions.

use time::OffsetDateTime;
use tracing::debug;

use crate::dict::{Dictionary, SourceTag};
use crate::ng_word::WordFilter;
use crate::numeric::{parse_japanese_number, to_comma_grouped, to_kanji_numeral, to_mixed_numeral};
use crate::settings::settings;
use crate::unicode::{hiragana_to_katakana, is_hiragana_reading, to_fullwidth_digits, to_halfwidth_katakana};

use super::calendar;
use super::candidate::{Candidate, KanaForm, Origin};

fn push_unless_forbidden(
    out: &mut Vec<Candidate>,
    filter: &dyn WordFilter,
    candidate: Candidate,
) {
    if !filter.is_forbidden(&candidate.reading, &candidate.surface) {
        out.push(candidate);
    }
}

/// Hiragana, katakana and half-width katakana spellings of a hiragana reading.
pub(super) fn kana_forms(reading: &str, filter: &dyn WordFilter) -> Vec<Candidate> {
    let s = settings();
    if !s.candidates.kana_forms || !is_hiragana_reading(reading) {
        return Vec::new();
    }
    let id = s.learning.default_pos_id;
    let forms = [
        (KanaForm::Hiragana, reading.to_string(), s.candidates.hiragana_cost),
        (KanaForm::Katakana, hiragana_to_katakana(reading), s.candidates.katakana_cost),
        (
            KanaForm::HalfwidthKatakana,
            to_halfwidth_katakana(reading),
            s.candidates.halfwidth_katakana_cost,
        ),
    ];
    let mut out = Vec::with_capacity(forms.len());
    for (form, surface, cost) in forms {
        let candidate = Candidate::single(
            reading,
            surface,
            cost,
            Origin::Kana(form),
            (id, id),
            SourceTag::Unknown,
        );
        push_unless_forbidden(&mut out, filter, candidate);
    }
    out
}

/// Numeral spellings of digit input (12345 → 一万二千三百四十五, 1万2345,
/// １２３４５, 12,345) and digit spellings of hiragana number words
/// (にじゅうさん → 23, ２３, 二十三).
pub(super) fn numeric_forms(reading: &str, filter: &dyn WordFilter) -> Vec<Candidate> {
    let c = &settings().candidates;
    if !c.numeric || reading.is_empty() {
        return Vec::new();
    }

    let (digits, value) = if reading.bytes().all(|b| b.is_ascii_digit()) {
        (reading.to_string(), reading.parse::<u64>().ok())
    } else if is_hiragana_reading(reading) {
        match parse_japanese_number(reading) {
            Some(n) => (n.to_string(), Some(n)),
            None => return Vec::new(),
        }
    } else {
        return Vec::new();
    };

    let mut forms: Vec<(String, i64)> = Vec::new();
    if let Some(n) = value {
        if let Some(kanji) = to_kanji_numeral(n) {
            forms.push((kanji, c.kanji_numeral_cost));
        }
        if let Some(mixed) = to_mixed_numeral(n) {
            forms.push((mixed, c.mixed_numeral_cost));
        }
    }
    forms.push((to_fullwidth_digits(&digits), c.fullwidth_digits_cost));
    if let Some(grouped) = to_comma_grouped(&digits) {
        forms.push((grouped, c.comma_digits_cost));
    }
    if digits != reading {
        forms.push((digits.clone(), c.plain_digits_cost));
    }

    let id = c.numeric_pos_id;
    let mut out = Vec::with_capacity(forms.len());
    for (surface, cost) in forms {
        let candidate = Candidate::single(
            reading,
            surface,
            cost,
            Origin::Numeric,
            (id, id),
            SourceTag::Unknown,
        );
        push_unless_forbidden(&mut out, filter, candidate);
    }
    out
}

/// Extra characters a completion may add to a reading of `input_len` chars.
fn completion_window(input_len: usize) -> usize {
    match input_len {
        3..=4 => 2,
        5..=6 => 3,
        _ => usize::MAX,
    }
}

/// Completions of `reading` to strictly longer readings of `dict`.
///
/// Each extra character costs `prediction_offset` for short input; longer
/// input pays a flat `prediction_offset_long`. The cheapest
/// `prediction_limit` survive.
pub(super) fn predictions(
    dict: &dyn Dictionary,
    tag: SourceTag,
    reading: &str,
    filter: &dyn WordFilter,
) -> Vec<Candidate> {
    let c = &settings().candidates;
    let input_len = reading.chars().count();
    if !c.prediction || input_len < c.prediction_min_chars || input_len > c.prediction_max_chars {
        return Vec::new();
    }
    let window = completion_window(input_len);

    let mut out = Vec::new();
    for result in dict.predict(reading, c.prediction_scan_limit) {
        let len = result.reading.chars().count();
        if len <= input_len || len - input_len > window {
            continue;
        }
        let extra = (len - input_len) as i64;
        let offset = if input_len <= 5 {
            c.prediction_offset * extra
        } else {
            c.prediction_offset_long
        };
        for token in result.entries {
            let candidate = Candidate::single(
                &result.reading,
                token.surface,
                token.cost as i64 + offset,
                Origin::Prediction(tag),
                (token.left_id, token.right_id),
                tag,
            );
            push_unless_forbidden(&mut out, filter, candidate);
        }
    }
    out.sort_by_key(|cand| cand.cost);
    out.truncate(c.prediction_limit);
    debug!(reading, count = out.len(), "predictions");
    out
}

/// Words of `dict` whose reading is a strict prefix of `reading`, longest
/// reading first. Each costs its word cost plus `partial_offset`.
pub(super) fn partial_readings(
    dict: &dyn Dictionary,
    tag: SourceTag,
    reading: &str,
    filter: &dyn WordFilter,
) -> Vec<Candidate> {
    let c = &settings().candidates;
    let input_len = reading.chars().count();
    if !c.partial_readings || input_len < 2 || input_len > c.partial_max_chars {
        return Vec::new();
    }

    let mut out = Vec::new();
    for result in dict.common_prefix_search(reading).into_iter().rev() {
        if result.reading.len() >= reading.len() {
            continue;
        }
        for token in result.entries {
            let candidate = Candidate::single(
                &result.reading,
                token.surface,
                token.cost as i64 + c.partial_offset,
                Origin::Partial(tag),
                (token.left_id, token.right_id),
                tag,
            );
            push_unless_forbidden(&mut out, filter, candidate);
        }
    }
    debug!(reading, count = out.len(), "partial readings");
    out
}

/// Dates for きょう/きのう/あした, the clock for いま, era years for
/// `2024ねん`, and clock or month-day spellings of 3-4 digit input.
pub(super) fn calendar_forms(
    reading: &str,
    now: OffsetDateTime,
    filter: &dyn WordFilter,
) -> Vec<Candidate> {
    let s = settings();
    let c = &s.candidates;
    if !c.calendar {
        return Vec::new();
    }
    let today = now.date();
    let dated = |day: Option<time::Date>| -> Vec<(String, i64)> {
        day.map(calendar::date_forms)
            .unwrap_or_default()
            .into_iter()
            .map(|surface| (surface, c.date_cost))
            .collect()
    };

    let forms: Vec<(String, i64)> = match reading {
        "きょう" => dated(Some(today)),
        "きのう" => dated(today.previous_day()),
        "あした" => dated(today.next_day()),
        "いま" => calendar::time_forms(now.time())
            .into_iter()
            .zip(c.time_cost..)
            .collect(),
        _ => match calendar::parse_year_reading(reading) {
            Some(year) => calendar::era_forms(year)
                .into_iter()
                .map(|surface| (surface, c.era_cost))
                .collect(),
            None => calendar::digit_time_forms(reading)
                .into_iter()
                .chain(calendar::digit_date_forms(reading))
                .map(|surface| (surface, c.digit_datetime_cost))
                .collect(),
        },
    };

    let id = s.learning.default_pos_id;
    let mut out = Vec::with_capacity(forms.len());
    for (surface, cost) in forms {
        let candidate = Candidate::single(
            reading,
            surface,
            cost,
            Origin::Calendar,
            (id, id),
            SourceTag::Unknown,
        );
        push_unless_forbidden(&mut out, filter, candidate);
    }
    out
}
