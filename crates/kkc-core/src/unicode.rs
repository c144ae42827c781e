//! Kana classification and script conversion.

/// Full-width katakana in the order of the half-width block U+FF66..U+FF9D.
const HALFWIDTH_ORDER: &str = "ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン";
const HALFWIDTH_BASE: u32 = 0xFF66;
const HALFWIDTH_DAKUTEN: char = 'ﾞ';
const HALFWIDTH_HANDAKUTEN: char = 'ﾟ';
const VOICED: &str = "ガギグゲゴザジズゼゾダヂヅデドバビブベボ";
const SEMI_VOICED: &str = "パピプペポ";

pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{3096}').contains(&c) || ('\u{309D}'..='\u{309E}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A1}'..='\u{30FA}').contains(&c) || ('\u{30FC}'..='\u{30FE}').contains(&c)
}

/// Hiragana plus the prolonged sound mark, which readings borrow from katakana.
pub fn is_hiragana_reading(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| is_hiragana(c) || c == 'ー')
}

pub fn hiragana_to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if is_hiragana(c) {
                char::from_u32(c as u32 + 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

pub fn katakana_to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| match c as u32 {
            0x30A1..=0x30F6 | 0x30FD..=0x30FE => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

fn halfwidth_base(c: char) -> Option<char> {
    let i = HALFWIDTH_ORDER.chars().position(|k| k == c)?;
    char::from_u32(HALFWIDTH_BASE + i as u32)
}

/// Converts hiragana and katakana to half-width katakana. Voiced kana become a
/// base letter plus a separate (han)dakuten mark; anything without a
/// half-width form passes through unchanged.
pub fn to_halfwidth_katakana(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in hiragana_to_katakana(s).chars() {
        if let Some(h) = halfwidth_base(c) {
            out.push(h);
        } else if VOICED.contains(c) {
            let base = char::from_u32(c as u32 - 1).and_then(halfwidth_base);
            match base {
                Some(h) => {
                    out.push(h);
                    out.push(HALFWIDTH_DAKUTEN);
                }
                None => out.push(c),
            }
        } else if SEMI_VOICED.contains(c) {
            let base = char::from_u32(c as u32 - 2).and_then(halfwidth_base);
            match base {
                Some(h) => {
                    out.push(h);
                    out.push(HALFWIDTH_HANDAKUTEN);
                }
                None => out.push(c),
            }
        } else {
            match c {
                'ヴ' => out.push_str("ｳﾞ"),
                '。' => out.push('｡'),
                '「' => out.push('｢'),
                '」' => out.push('｣'),
                '、' => out.push('､'),
                '・' => out.push('･'),
                _ => out.push(c),
            }
        }
    }
    out
}

/// ASCII digits to their full-width forms; other characters pass through.
pub fn to_fullwidth_digits(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_digit() {
                char::from_u32(c as u32 - '0' as u32 + '０' as u32).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}
