//! Date, clock and era spellings.

use time::{Date, OffsetDateTime, Time, Weekday};

struct Era {
    name: &'static str,
    initial: char,
    start_year: i32,
    start_month: u8,
    start_day: u8,
}

/// Newest first. An era runs through the start year of the one above it.
const ERA_TABLE: &[Era] = &[
    Era {
        name: "令和",
        initial: 'R',
        start_year: 2019,
        start_month: 5,
        start_day: 1,
    },
    Era {
        name: "平成",
        initial: 'H',
        start_year: 1989,
        start_month: 1,
        start_day: 8,
    },
    Era {
        name: "昭和",
        initial: 'S',
        start_year: 1926,
        start_month: 12,
        start_day: 25,
    },
    Era {
        name: "大正",
        initial: 'T',
        start_year: 1912,
        start_month: 7,
        start_day: 30,
    },
    Era {
        name: "明治",
        initial: 'M',
        start_year: 1868,
        start_month: 1,
        start_day: 25,
    },
];

/// Local wall clock, or UTC when the local offset cannot be determined.
pub(super) fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn era_of(date: Date) -> Option<(&'static Era, i32)> {
    let key = (date.year(), date.month() as u8, date.day());
    ERA_TABLE
        .iter()
        .find(|era| key >= (era.start_year, era.start_month, era.start_day))
        .map(|era| (era, date.year() - era.start_year + 1))
}

/// 令和元年, 令和6年
fn era_year(name: &str, n: i32) -> String {
    if n == 1 {
        format!("{name}元年")
    } else {
        format!("{name}{n}年")
    }
}

fn weekday_kanji(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "月",
        Weekday::Tuesday => "火",
        Weekday::Wednesday => "水",
        Weekday::Thursday => "木",
        Weekday::Friday => "金",
        Weekday::Saturday => "土",
        Weekday::Sunday => "日",
    }
}

/// 5/3, 2024/05/03, 5月3日(金), 令和6年5月3日, R6/05/03, 金曜日
pub(crate) fn date_forms(date: Date) -> Vec<String> {
    let (y, m, d) = (date.year(), date.month() as u8, date.day());
    let wd = weekday_kanji(date.weekday());
    let mut out = vec![
        format!("{m}/{d}"),
        format!("{y:04}/{m:02}/{d:02}"),
        format!("{m}月{d}日({wd})"),
    ];
    if let Some((era, n)) = era_of(date) {
        out.push(format!("{}{m}月{d}日", era_year(era.name, n)));
        out.push(format!("{}{n}/{m:02}/{d:02}", era.initial));
    }
    out.push(format!("{wd}曜日"));
    out
}

/// 14時5分, 14:05, 02:05, 午後2時5分, 2時5分
pub(crate) fn time_forms(t: Time) -> Vec<String> {
    let (h, min) = (t.hour(), t.minute());
    let meridiem = if h < 12 { "午前" } else { "午後" };
    let h12 = match h {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    vec![
        format!("{h}時{min}分"),
        format!("{h:02}:{min:02}"),
        format!("{h12:02}:{min:02}"),
        format!("{meridiem}{h12}時{min}分"),
        format!("{h12}時{min}分"),
    ]
}

/// Every era whose span contains `year`; a changeover year gives two.
pub(crate) fn era_forms(year: i32) -> Vec<String> {
    let mut out = Vec::new();
    let mut end: Option<i32> = None;
    for era in ERA_TABLE {
        if year >= era.start_year && end.map_or(true, |last| year <= last) {
            out.push(era_year(era.name, year - era.start_year + 1));
        }
        end = Some(era.start_year);
    }
    out
}

/// `2024ねん` → 2024
pub(crate) fn parse_year_reading(reading: &str) -> Option<i32> {
    let digits = reading.strip_suffix("ねん")?;
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `1430` → 14:30, 14時30分. Hours run to 29 for late-night notation.
pub(crate) fn digit_time_forms(digits: &str) -> Vec<String> {
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Vec::new();
    }
    let (hh, mm) = digits.split_at(2);
    match (hh.parse::<u8>(), mm.parse::<u8>()) {
        (Ok(h), Ok(m)) if h <= 29 && m <= 59 => {
            vec![format!("{hh}:{mm}"), format!("{hh}時{mm}分")]
        }
        _ => Vec::new(),
    }
}

/// `512` → 5月12日, `1231` → 12月31日.
pub(crate) fn digit_date_forms(digits: &str) -> Vec<String> {
    if !(3..=4).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Vec::new();
    }
    let (mm, dd) = digits.split_at(digits.len() - 2);
    match (mm.parse::<u8>(), dd.parse::<u8>()) {
        (Ok(m), Ok(d)) if (1..=12).contains(&m) && (1..=31).contains(&d) => {
            vec![format!("{m}月{d}日")]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::*;

    fn date(y: i32, m: Month, d: u8) -> Date {
        Date::from_calendar_date(y, m, d).unwrap()
    }

    #[test]
    fn test_era_changes_on_start_day() {
        let last_heisei = date_forms(date(2019, Month::April, 30));
        assert!(last_heisei.contains(&"平成31年4月30日".to_string()));
        assert!(last_heisei.contains(&"H31/04/30".to_string()));
        let first_reiwa = date_forms(date(2019, Month::May, 1));
        assert!(first_reiwa.contains(&"令和元年5月1日".to_string()));
        assert!(first_reiwa.contains(&"R1/05/01".to_string()));
    }

    #[test]
    fn test_dates_before_meiji_have_no_era() {
        let forms = date_forms(date(1850, Month::January, 1));
        assert_eq!(forms.len(), 4);
        assert_eq!(forms[1], "1850/01/01");
    }

    #[test]
    fn test_time_forms_midnight_and_noon() {
        let midnight = time_forms(Time::from_hms(0, 7, 0).unwrap());
        assert_eq!(midnight[2], "12:07");
        assert_eq!(midnight[3], "午前12時7分");
        let noon = time_forms(Time::from_hms(12, 30, 0).unwrap());
        assert_eq!(noon[3], "午後12時30分");
    }

    #[test]
    fn test_era_forms_changeover_years() {
        assert_eq!(era_forms(1926), vec!["昭和元年", "大正15年"]);
        assert_eq!(era_forms(1912), vec!["大正元年", "明治45年"]);
        assert!(era_forms(1867).is_empty());
    }
}
