//! Number readings and numeral spellings.
//!
//! [`parse_japanese_number`] reads hiragana number words (にじゅうさん,
//! さんびゃくよんじゅうご, いっせん, ...) up to 兆. The formatting helpers
//! spell a value as kanji numerals, as digits mixed with 万/億/兆, or as
//! comma-grouped digits.

/// Values at or above this are not spelled (京 and beyond).
const LIMIT: u64 = 10_000_000_000_000_000;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Word {
    Digit(u64),
    /// いっ, ろっ, はっ: a digit that must be followed by a unit.
    Geminate(u64),
    /// じゅう, ひゃく, せん and their sound-changed variants.
    Small(u64),
    /// まん, おく, ちょう.
    Large(u64),
}

const WORDS: &[(&str, Word)] = &[
    ("ぜろ", Word::Digit(0)),
    ("れい", Word::Digit(0)),
    ("いち", Word::Digit(1)),
    ("に", Word::Digit(2)),
    ("さん", Word::Digit(3)),
    ("よん", Word::Digit(4)),
    ("し", Word::Digit(4)),
    ("ご", Word::Digit(5)),
    ("ろく", Word::Digit(6)),
    ("なな", Word::Digit(7)),
    ("しち", Word::Digit(7)),
    ("はち", Word::Digit(8)),
    ("きゅう", Word::Digit(9)),
    ("く", Word::Digit(9)),
    ("いっ", Word::Geminate(1)),
    ("ろっ", Word::Geminate(6)),
    ("はっ", Word::Geminate(8)),
    ("じゅう", Word::Small(10)),
    ("じゅっ", Word::Small(10)),
    ("じっ", Word::Small(10)),
    ("ひゃく", Word::Small(100)),
    ("びゃく", Word::Small(100)),
    ("ぴゃく", Word::Small(100)),
    ("せん", Word::Small(1000)),
    ("ぜん", Word::Small(1000)),
    ("まん", Word::Large(10_000)),
    ("おく", Word::Large(100_000_000)),
    ("ちょう", Word::Large(1_000_000_000_000)),
];

/// Longest number word at the front of `s`.
fn next_word(s: &str) -> Option<(Word, usize)> {
    WORDS
        .iter()
        .filter(|(kana, _)| s.starts_with(kana))
        .max_by_key(|(kana, _)| kana.len())
        .map(|&(kana, w)| (w, kana.len()))
}

fn tokenize(kana: &str) -> Option<Vec<Word>> {
    let mut rest = kana;
    let mut words = Vec::new();
    while !rest.is_empty() {
        let (w, len) = next_word(rest)?;
        words.push(w);
        rest = &rest[len..];
    }
    Some(words)
}

/// Parse a hiragana number word into its value.
///
/// Units must appear in descending order within a 4-digit section and large
/// units in descending order overall; ぜろ/れい stand only on their own.
pub fn parse_japanese_number(kana: &str) -> Option<u64> {
    let words = tokenize(kana)?;
    if let [Word::Digit(0)] = words.as_slice() {
        return Some(0);
    }

    let mut total = 0u64;
    let mut section = 0u64;
    let mut pending: Option<u64> = None;
    let mut geminate = false;
    let mut last_small = u64::MAX;
    let mut last_large = u64::MAX;

    for w in words {
        match w {
            Word::Digit(0) => return None,
            Word::Digit(d) | Word::Geminate(d) => {
                if pending.is_some() {
                    return None;
                }
                pending = Some(d);
                geminate = matches!(w, Word::Geminate(_));
            }
            Word::Small(unit) => {
                if unit >= last_small {
                    return None;
                }
                section += pending.take().unwrap_or(1) * unit;
                last_small = unit;
                geminate = false;
            }
            Word::Large(unit) => {
                if unit >= last_large {
                    return None;
                }
                section += pending.take().unwrap_or(0);
                let multiplier = if section == 0 { 1 } else { section };
                total = total.checked_add(multiplier.checked_mul(unit)?)?;
                section = 0;
                last_small = u64::MAX;
                last_large = unit;
                geminate = false;
            }
        }
    }
    if geminate {
        return None;
    }
    total = total.checked_add(section + pending.unwrap_or(0))?;
    (total > 0 && total < LIMIT).then_some(total)
}

const KANJI_DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];
const LARGE_UNITS: [(u64, &str); 3] = [
    (1_000_000_000_000, "兆"),
    (100_000_000, "億"),
    (10_000, "万"),
];

/// Spell a section below 10000: 1234 → 千二百三十四. A leading 一 is dropped
/// before 十, 百 and 千.
fn kanji_section(n: u64, out: &mut String) {
    for (unit, mark) in [(1000, '千'), (100, '百'), (10, '十')] {
        let d = (n / unit) % 10;
        if d > 1 {
            out.push(KANJI_DIGITS[d as usize]);
        }
        if d > 0 {
            out.push(mark);
        }
    }
    let ones = n % 10;
    if ones > 0 {
        out.push(KANJI_DIGITS[ones as usize]);
    }
}

/// Kanji numeral with positional units: 123 → 百二十三, 10005 → 一万五.
pub fn to_kanji_numeral(n: u64) -> Option<String> {
    if n >= LIMIT {
        return None;
    }
    if n == 0 {
        return Some("〇".to_string());
    }
    let mut out = String::new();
    let mut rest = n;
    for (unit, mark) in LARGE_UNITS {
        let section = rest / unit;
        if section > 0 {
            if section == 1 {
                out.push('一');
            } else {
                kanji_section(section, &mut out);
            }
            out.push_str(mark);
        }
        rest %= unit;
    }
    kanji_section(rest, &mut out);
    Some(out)
}

/// Digits split at 万/億/兆: 123456 → 12万3456. `None` below 10000, where the
/// form would equal the plain digits.
pub fn to_mixed_numeral(n: u64) -> Option<String> {
    if !(10_000..LIMIT).contains(&n) {
        return None;
    }
    let mut out = String::new();
    let mut rest = n;
    for (unit, mark) in LARGE_UNITS {
        let section = rest / unit;
        if section > 0 {
            out.push_str(&section.to_string());
            out.push_str(mark);
        }
        rest %= unit;
    }
    if rest > 0 {
        out.push_str(&rest.to_string());
    }
    Some(out)
}

/// Digits grouped by thousands: 1234567 → 1,234,567. `None` below 1000.
pub fn to_comma_grouped(digits: &str) -> Option<String> {
    if digits.len() < 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let head = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - head) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_digits() {
        assert_eq!(parse_japanese_number("ぜろ"), Some(0));
        assert_eq!(parse_japanese_number("れい"), Some(0));
        assert_eq!(parse_japanese_number("いち"), Some(1));
        assert_eq!(parse_japanese_number("し"), Some(4));
        assert_eq!(parse_japanese_number("しち"), Some(7));
        assert_eq!(parse_japanese_number("く"), Some(9));
        assert_eq!(parse_japanese_number("きゅう"), Some(9));
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_japanese_number("じゅう"), Some(10));
        assert_eq!(parse_japanese_number("にじゅうさん"), Some(23));
        assert_eq!(parse_japanese_number("さんびゃく"), Some(300));
        assert_eq!(parse_japanese_number("ろっぴゃく"), Some(600));
        assert_eq!(parse_japanese_number("はっせん"), Some(8000));
        assert_eq!(parse_japanese_number("いっせんにひゃくさんじゅうよん"), Some(1234));
        assert_eq!(parse_japanese_number("さんびゃくよんじゅうご"), Some(345));
    }

    #[test]
    fn test_large_units() {
        assert_eq!(parse_japanese_number("まん"), Some(10_000));
        assert_eq!(parse_japanese_number("じゅうまん"), Some(100_000));
        assert_eq!(parse_japanese_number("いちおく"), Some(100_000_000));
        assert_eq!(parse_japanese_number("いっちょう"), Some(1_000_000_000_000));
        assert_eq!(
            parse_japanese_number("いちまんにせんさんびゃくよんじゅうご"),
            Some(12345)
        );
        assert_eq!(
            parse_japanese_number("さんおくにまん"),
            Some(300_020_000)
        );
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(parse_japanese_number(""), None);
        assert_eq!(parse_japanese_number("こんにちは"), None);
        assert_eq!(parse_japanese_number("きょう"), None);
        assert_eq!(parse_japanese_number("にさん"), None, "two digits in a row");
        assert_eq!(parse_japanese_number("じゅうひゃく"), None, "ascending units");
        assert_eq!(parse_japanese_number("まんおく"), None);
        assert_eq!(parse_japanese_number("いっ"), None, "dangling geminate");
        assert_eq!(parse_japanese_number("ぜろいち"), None);
    }

    #[test]
    fn test_kanji_numeral() {
        assert_eq!(to_kanji_numeral(0).as_deref(), Some("〇"));
        assert_eq!(to_kanji_numeral(7).as_deref(), Some("七"));
        assert_eq!(to_kanji_numeral(123).as_deref(), Some("百二十三"));
        assert_eq!(to_kanji_numeral(1111).as_deref(), Some("千百十一"));
        assert_eq!(to_kanji_numeral(2024).as_deref(), Some("二千二十四"));
        assert_eq!(to_kanji_numeral(10_005).as_deref(), Some("一万五"));
        assert_eq!(
            to_kanji_numeral(300_020_000).as_deref(),
            Some("三億二万")
        );
        assert_eq!(to_kanji_numeral(LIMIT), None);
    }

    #[test]
    fn test_mixed_numeral() {
        assert_eq!(to_mixed_numeral(9999), None);
        assert_eq!(to_mixed_numeral(123_456).as_deref(), Some("12万3456"));
        assert_eq!(to_mixed_numeral(100_000_000).as_deref(), Some("1億"));
        assert_eq!(to_mixed_numeral(100_000_005).as_deref(), Some("1億5"));
    }

    #[test]
    fn test_comma_grouped() {
        assert_eq!(to_comma_grouped("999"), None);
        assert_eq!(to_comma_grouped("1000").as_deref(), Some("1,000"));
        assert_eq!(to_comma_grouped("1234567").as_deref(), Some("1,234,567"));
        assert_eq!(to_comma_grouped("123456").as_deref(), Some("123,456"));
        assert_eq!(to_comma_grouped("12a4"), None);
    }
}
