use crate::dict::{DictError, Dictionary, PosTable, Token, TrieDictionary};

fn tok(surface: &str, cost: i16, pos: u16) -> Token {
    Token {
        surface: surface.to_string(),
        cost,
        left_id: pos,
        right_id: pos,
    }
}

fn sample_dict() -> TrieDictionary {
    let entries = vec![
        (
            "かん".to_string(),
            vec![tok("管", 5200, 1), tok("缶", 5000, 1)],
        ),
        (
            "かんじ".to_string(),
            vec![
                tok("漢字", 5100, 1),
                tok("感じ", 5150, 2),
                tok("幹事", 5300, 1),
                tok("カンジ", 6000, 1),
            ],
        ),
        (
            "かんじょう".to_string(),
            vec![tok("感情", 5000, 1), tok("勘定", 5400, 1)],
        ),
        ("き".to_string(), vec![tok("木", 4000, 1), tok("き", 4500, 3)]),
    ];
    TrieDictionary::from_entries(entries).unwrap()
}

fn surfaces(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.surface.as_str()).collect()
}

#[test]
fn test_lookup_exact() {
    let dict = sample_dict();
    let results = dict.lookup("かんじ");
    assert_eq!(surfaces(&results), vec!["漢字", "感じ", "幹事", "カンジ"]);
    assert_eq!(results[1].left_id, 2);
    assert_eq!(results[1].right_id, 2);
}

#[test]
fn test_lookup_sorted_by_cost() {
    let dict = sample_dict();
    assert_eq!(surfaces(&dict.lookup("かん")), vec!["缶", "管"]);
}

#[test]
fn test_surface_same_as_reading() {
    let dict = sample_dict();
    let results = dict.lookup("き");
    assert_eq!(surfaces(&results), vec!["木", "き"]);
    assert_eq!(results[1].left_id, 3);
}

#[test]
fn test_lookup_not_found() {
    let dict = sample_dict();
    assert!(dict.lookup("そんざい").is_empty());
    assert!(dict.lookup("かんじょ").is_empty(), "inner node is not a reading");
    assert!(dict.lookup("").is_empty());
}

#[test]
fn test_predict() {
    let dict = sample_dict();
    let readings: Vec<String> = dict
        .predict("かん", 100)
        .into_iter()
        .map(|r| r.reading)
        .collect();
    assert_eq!(readings, vec!["かん", "かんじ", "かんじょう"]);
}

#[test]
fn test_predict_limits() {
    let dict = sample_dict();
    assert_eq!(dict.predict("かん", 2).len(), 2);
    assert!(dict.predict("かん", 0).is_empty());
    assert!(dict.predict("そ", 100).is_empty());
}

#[test]
fn test_common_prefix_search() {
    let dict = sample_dict();
    let results = dict.common_prefix_search("かんじょうき");
    let readings: Vec<&str> = results.iter().map(|r| r.reading.as_str()).collect();
    assert_eq!(readings, vec!["かん", "かんじ", "かんじょう"]);
    assert_eq!(results[2].entries[0].surface, "感情");
    assert!(dict.common_prefix_search("そ").is_empty());
}

#[test]
fn test_from_entries_merges_and_skips_empty() {
    let dict = TrieDictionary::from_entries(vec![
        ("ね".to_string(), vec![tok("根", 700, 1)]),
        ("ね".to_string(), vec![tok("音", 600, 1), tok("", 100, 1)]),
        (String::new(), vec![tok("空", 1, 1)]),
        ("こ".to_string(), vec![]),
    ])
    .unwrap();
    assert_eq!(dict.stats(), (1, 2));
    assert_eq!(surfaces(&dict.lookup("ね")), vec!["音", "根"]);
    assert!(dict.lookup("こ").is_empty());
}

#[test]
fn test_iter_and_stats() {
    let dict = sample_dict();
    assert_eq!(dict.stats(), (4, 10));
    let all: Vec<(String, Vec<Token>)> = dict.iter().collect();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].0, "かん");
    assert_eq!(all[3].0, "き");
    assert_eq!(dict.max_pos_id(), Some(3));
}

#[test]
fn test_serialize_roundtrip() {
    let dict = sample_dict();
    let bytes = dict.to_bytes().unwrap();
    let dict2 = TrieDictionary::from_bytes(&bytes).unwrap();
    for reading in ["かん", "かんじ", "かんじょう", "き"] {
        assert_eq!(dict.lookup(reading), dict2.lookup(reading));
    }
}

#[test]
fn test_invalid_magic() {
    let result = TrieDictionary::from_bytes(b"XXXX\x01data");
    assert!(matches!(result, Err(DictError::InvalidMagic)));
}

#[test]
fn test_header_too_short() {
    assert!(matches!(
        TrieDictionary::from_bytes(b"KKD"),
        Err(DictError::InvalidHeader)
    ));
    assert!(matches!(
        TrieDictionary::from_bytes(b"KKDX\x01\0\0\0"),
        Err(DictError::InvalidHeader)
    ));
}

#[test]
fn test_unsupported_version() {
    let result = TrieDictionary::from_bytes(b"KKDX\x99");
    assert!(matches!(result, Err(DictError::UnsupportedVersion(0x99))));
}

#[test]
fn test_truncated_body() {
    let bytes = sample_dict().to_bytes().unwrap();
    let result = TrieDictionary::from_bytes(&bytes[..bytes.len() - 3]);
    assert!(matches!(result, Err(DictError::Corrupt(_))));
}

#[test]
fn test_trailing_bytes() {
    let mut bytes = sample_dict().to_bytes().unwrap();
    bytes.push(0);
    assert!(matches!(
        TrieDictionary::from_bytes(&bytes),
        Err(DictError::Corrupt(_))
    ));
}

#[test]
fn test_checksum_mismatch() {
    let mut bytes = sample_dict().to_bytes().unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    assert!(matches!(
        TrieDictionary::from_bytes(&bytes),
        Err(DictError::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_structurally_corrupt_body_rejected() {
    // Valid container and checksum around a token table that points past the
    // POS table.
    let mut dict = sample_dict();
    dict.pos = PosTable::from_rows(vec![(1, 1)]);
    let bytes = dict.to_bytes().unwrap();
    match TrieDictionary::from_bytes(&bytes) {
        Err(DictError::Corrupt(msg)) => assert!(msg.contains("POS index"), "{msg}"),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("corrupt dictionary accepted"),
    }
}

#[test]
fn test_surface_trie_mismatch_rejected() {
    let mut dict = sample_dict();
    let other = TrieDictionary::from_entries(vec![("あ".to_string(), vec![tok("亜", 1, 1)])])
        .unwrap();
    dict.surfaces = other.surfaces;
    let bytes = dict.to_bytes().unwrap();
    assert!(matches!(
        TrieDictionary::from_bytes(&bytes),
        Err(DictError::Corrupt(_))
    ));
}

#[test]
fn test_open_mmap() {
    let dict = sample_dict();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.dict");
    dict.save(&path).unwrap();

    let dict2 = TrieDictionary::open(&path).unwrap();
    assert_eq!(dict.lookup("かんじ"), dict2.lookup("かんじ"));
    assert_eq!(dict.predict("かん", 100).len(), dict2.predict("かん", 100).len());
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = TrieDictionary::open(&dir.path().join("absent.dict"));
    assert!(matches!(result, Err(DictError::Io(_))));
}
