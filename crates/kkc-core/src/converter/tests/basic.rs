use super::super::*;
use crate::converter::testutil::{dict_of, neko_dict, neko_matrix, test_dict, token};
use crate::dict::{SourceTag, TrieDictionary};
use crate::ng_word::NgWordFilter;
use crate::user_dict::UserDictionary;

fn surfaces(paths: &[ScoredPath]) -> Vec<String> {
    paths.iter().map(ScoredPath::surface).collect()
}

fn system(dict: &TrieDictionary) -> Vec<LatticeSource<'_>> {
    vec![LatticeSource::new(SourceTag::System, dict)]
}

#[test]
fn test_neko_worked_example() {
    let dict = neko_dict();
    let conn = neko_matrix();
    let paths = convert_nbest(&system(&dict), &NgWordFilter::new(), Some(&conn), "ねこ", 2);

    assert_eq!(surfaces(&paths), vec!["猫", "根子"]);
    assert_eq!(paths[0].cost, 500);
    assert_eq!(paths[1].cost, 700 + 50 + 650);
    assert_eq!(paths[1].nodes.len(), 2);
    assert_eq!(paths[1].reading(), "ねこ");
}

#[test]
fn test_ng_word_removes_path() {
    let dict = neko_dict();
    let conn = neko_matrix();
    let ng = NgWordFilter::from_pairs([("こ", "子")]);
    let paths = convert_nbest(&system(&dict), &ng, Some(&conn), "ねこ", 2);

    assert_eq!(paths[0].surface(), "猫");
    assert!(paths.iter().all(|p| !p.surface().contains('子')));
}

#[test]
fn test_empty_input() {
    let dict = test_dict();
    assert!(convert_nbest(&system(&dict), &NgWordFilter::new(), None, "", 5).is_empty());
    assert!(convert_best(&system(&dict), &NgWordFilter::new(), None, "").is_none());
}

#[test]
fn test_zero_results_requested() {
    let dict = test_dict();
    assert!(convert_nbest(&system(&dict), &NgWordFilter::new(), None, "きょう", 0).is_empty());
}

#[test]
fn test_unknown_chars_pass_through() {
    let dict = test_dict();
    let best = convert_best(&system(&dict), &NgWordFilter::new(), None, "ぬぬ").unwrap();
    assert_eq!(best.surface(), "ぬぬ");
    assert!(best.nodes.iter().all(|n| n.source == SourceTag::Unknown));
}

#[test]
fn test_no_sources_still_covers_input() {
    let best = convert_best(&[], &NgWordFilter::new(), None, "あいう").unwrap();
    assert_eq!(best.surface(), "あいう");
}

#[test]
fn test_convert_unigram() {
    let dict = test_dict();
    let best = convert_best(&system(&dict), &NgWordFilter::new(), None, "きょうはいいてんき").unwrap();
    let segs: Vec<&str> = best.nodes.iter().map(|n| n.surface.as_str()).collect();
    // 今日(3000) + は(2000) + 良い(3500) + 天気(4000)
    assert_eq!(segs, vec!["今日", "は", "良い", "天気"]);
    assert_eq!(best.cost, 12500);
}

#[test]
fn test_convert_watashi() {
    let dict = test_dict();
    let best = convert_best(&system(&dict), &NgWordFilter::new(), None, "わたしはがくせいです").unwrap();
    let segs: Vec<&str> = best.nodes.iter().map(|n| n.surface.as_str()).collect();
    assert_eq!(segs, vec!["私", "は", "学生", "です"]);
}

#[test]
fn test_connection_cost_changes_winner() {
    // 京 is cheaper alone, but 京→は is heavily penalised.
    let dict = TrieDictionary::from_entries([
        (
            "きょう".to_string(),
            vec![token("今日", 5000, 2), token("京", 4900, 3)],
        ),
        ("は".to_string(), vec![token("は", 2000, 4)]),
    ])
    .unwrap();
    let mut costs = vec![0i16; 25];
    costs[3 * 5 + 4] = 5000;
    let conn = ConnectionMatrix::from_costs(5, costs).unwrap();

    let unigram = convert_best(&system(&dict), &NgWordFilter::new(), None, "きょうは").unwrap();
    assert_eq!(unigram.surface(), "京は");

    let bigram = convert_best(&system(&dict), &NgWordFilter::new(), Some(&conn), "きょうは").unwrap();
    assert_eq!(bigram.surface(), "今日は");
    assert_eq!(bigram.cost, 7000);
}

#[test]
fn test_user_source_joins_lattice() {
    let dict = neko_dict();
    let conn = neko_matrix();
    let user = UserDictionary::new();
    user.register_with("ねこ", "ネコ", crate::user_dict::UserPos::Other, Some(-1));
    let snapshot = user.snapshot();
    let sources = vec![
        LatticeSource::new(SourceTag::System, &dict),
        LatticeSource::new(SourceTag::User, &snapshot),
    ];
    let paths = convert_nbest(&sources, &NgWordFilter::new(), Some(&conn), "ねこ", 3);
    assert_eq!(paths[0].surface(), "ネコ");
    assert_eq!(paths[0].cost, -1);
    assert_eq!(paths[0].nodes[0].source, SourceTag::User);
    assert_eq!(surfaces(&paths), vec!["ネコ", "猫", "根子"]);
}

#[test]
fn test_deterministic_results() {
    let dict = test_dict();
    let a = convert_nbest(&system(&dict), &NgWordFilter::new(), None, "きょうはいいてんき", 10);
    let b = convert_nbest(&system(&dict), &NgWordFilter::new(), None, "きょうはいいてんき", 10);
    assert_eq!(a, b);
}

#[test]
fn test_dict_of_helper_orders_by_cost() {
    let dict = dict_of(&[("か", &[("蚊", 300), ("火", 100)])], 1);
    let best = convert_best(&system(&dict), &NgWordFilter::new(), None, "か").unwrap();
    assert_eq!(best.surface(), "火");
}
