use crate::dict::connection::ConnectionMatrix;
use crate::dict::{Token, TrieDictionary};

pub(crate) fn token(surface: &str, cost: i16, id: u16) -> Token {
    Token {
        surface: surface.to_string(),
        cost,
        left_id: id,
        right_id: id,
    }
}

pub(crate) fn dict_of(entries: &[(&str, &[(&str, i16)])], id: u16) -> TrieDictionary {
    TrieDictionary::from_entries(entries.iter().map(|(reading, tokens)| {
        (
            reading.to_string(),
            tokens.iter().map(|&(s, c)| token(s, c, id)).collect(),
        )
    }))
    .unwrap()
}

/// ね→根(700), こ→子(650), ねこ→猫(500), all in class 1.
pub(crate) fn neko_dict() -> TrieDictionary {
    dict_of(
        &[
            ("ね", &[("根", 700)]),
            ("こ", &[("子", 650)]),
            ("ねこ", &[("猫", 500)]),
        ],
        1,
    )
}

/// Two classes: 0 (BOS/EOS) and 1 (noun). noun→noun costs 50, the rest 0.
pub(crate) fn neko_matrix() -> ConnectionMatrix {
    ConnectionMatrix::from_costs(2, vec![0, 0, 0, 50]).unwrap()
}

/// Small general-purpose dictionary; all tokens share class 1.
pub(crate) fn test_dict() -> TrieDictionary {
    dict_of(
        &[
            ("きょう", &[("今日", 3000), ("京", 4000)]),
            ("き", &[("木", 4500), ("気", 4600)]),
            ("は", &[("は", 2000), ("葉", 5000)]),
            ("いい", &[("良い", 3500)]),
            ("い", &[("胃", 6000)]),
            ("てんき", &[("天気", 4000)]),
            ("わたし", &[("私", 3000)]),
            ("がくせい", &[("学生", 4000)]),
            ("です", &[("です", 2500)]),
        ],
        1,
    )
}
