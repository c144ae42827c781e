use super::*;
use crate::dict::Dictionary;

fn pairs(dict: &UserDictionary) -> Vec<(String, String)> {
    dict.list()
        .into_iter()
        .map(|w| (w.reading, w.surface))
        .collect()
}

#[test]
fn register_and_lookup() {
    let dict = UserDictionary::new();
    assert!(dict.register("しゅうじ", "週次"));
    let entries = dict.lookup("しゅうじ");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].surface, "週次");
    assert_eq!(entries[0].cost, settings().user_dict.default_cost);
    assert_eq!(entries[0].left_id, UserPos::Noun.id());
}

#[test]
fn register_with_pos_and_cost() {
    let dict = UserDictionary::new();
    assert!(dict.register_with("はしる", "奔る", UserPos::Verb, Some(1200)));
    let entries = dict.lookup("はしる");
    assert_eq!(entries[0].cost, 1200);
    assert_eq!(entries[0].left_id, UserPos::Verb.id());
    assert_eq!(entries[0].right_id, UserPos::Verb.id());
}

#[test]
fn register_rejects_empty_and_duplicates() {
    let dict = UserDictionary::new();
    assert!(!dict.register("", "空"));
    assert!(!dict.register("から", ""));
    assert!(dict.register("しゅうじ", "週次"));
    assert!(!dict.register("しゅうじ", "週次"));
    assert_eq!(dict.lookup("しゅうじ").len(), 1);
}

#[test]
fn unregister() {
    let dict = UserDictionary::new();
    dict.register("しゅうじ", "週次");
    dict.register("しゅうじ", "修辞");
    assert!(dict.unregister("しゅうじ", "週次"));
    let entries = dict.lookup("しゅうじ");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].surface, "修辞");
    assert!(dict.unregister("しゅうじ", "修辞"));
    assert!(dict.list().is_empty());
    assert!(!dict.unregister("しゅうじ", "修辞"));
}

#[test]
fn list_sorted() {
    let dict = UserDictionary::new();
    dict.register("みかん", "蜜柑");
    dict.register("あいう", "愛雨");
    dict.register("かき", "柿");
    dict.register("かき", "牡蠣");
    assert_eq!(
        pairs(&dict),
        vec![
            ("あいう".to_string(), "愛雨".to_string()),
            ("かき".to_string(), "柿".to_string()),
            ("かき".to_string(), "牡蠣".to_string()),
            ("みかん".to_string(), "蜜柑".to_string()),
        ]
    );
}

#[test]
fn predict_by_prefix() {
    let dict = UserDictionary::new();
    dict.register("きょう", "今日");
    dict.register("きょうと", "京都");
    dict.register("かき", "柿");

    let readings: Vec<String> = dict
        .predict("きょう", 100)
        .into_iter()
        .map(|r| r.reading)
        .collect();
    assert_eq!(readings, vec!["きょう", "きょうと"]);
    assert_eq!(dict.predict("きょう", 1).len(), 1);
}

#[test]
fn common_prefix_search_finds_prefixes() {
    let dict = UserDictionary::new();
    dict.register("き", "木");
    dict.register("きょう", "今日");
    dict.register("きょうと", "京都");

    let results = dict.common_prefix_search("きょうは");
    let readings: Vec<&str> = results.iter().map(|r| r.reading.as_str()).collect();
    assert_eq!(readings, vec!["き", "きょう"]);
}

#[test]
fn snapshot_is_stable_across_edits() {
    let dict = UserDictionary::new();
    dict.register("かき", "柿");
    let snap = dict.snapshot();
    dict.unregister("かき", "柿");
    dict.register("かき", "牡蠣");
    assert_eq!(snap.lookup("かき")[0].surface, "柿");
    assert_eq!(dict.lookup("かき")[0].surface, "牡蠣");
}

#[test]
fn serialize_roundtrip() {
    let dict = UserDictionary::new();
    dict.register("しゅうじ", "週次");
    dict.register_with("はしる", "奔る", UserPos::Verb, Some(900));

    let bytes = dict.to_bytes().unwrap();
    let loaded = UserDictionary::from_bytes(&bytes).unwrap();
    assert_eq!(loaded.list(), dict.list());
    assert_eq!(loaded.lookup("はしる")[0].cost, 900);
}

#[test]
fn file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user.kkuw");

    let dict = UserDictionary::new();
    dict.register("しゅうじ", "週次");
    dict.register("かき", "柿");
    dict.save(&path).unwrap();

    let loaded = UserDictionary::open(&path).unwrap();
    assert_eq!(loaded.list().len(), 2);
    assert_eq!(loaded.lookup("しゅうじ")[0].surface, "週次");
}

#[test]
fn open_nonexistent_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let dict = UserDictionary::open(&dir.path().join("absent.kkuw")).unwrap();
    assert!(dict.list().is_empty());
}

#[test]
fn from_bytes_rejects_bad_header() {
    assert!(UserDictionary::from_bytes(b"BADXsome data here").is_err());
    assert!(UserDictionary::from_bytes(b"KK").is_err());
    assert!(UserDictionary::from_bytes(b"KKUW\x09").is_err());
}

#[test]
fn pos_names_roundtrip() {
    for pos in UserPos::ALL {
        assert_eq!(pos.as_str().parse::<UserPos>(), Ok(pos));
    }
    assert!("noun-ish".parse::<UserPos>().is_err());
}
