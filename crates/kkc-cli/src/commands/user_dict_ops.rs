use std::path::{Path, PathBuf};

use crate::die;
use kkc_core::user_dict::{UserDictionary, UserPos};

pub fn default_user_dict_path() -> PathBuf {
    let base = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    base.join("kkc").join("user_dict.kkuw")
}

fn open(path: &Path) -> UserDictionary {
    die!(
        UserDictionary::open(path),
        "Error opening user dictionary: {}"
    )
}

pub fn user_dict_add(path: &Path, reading: &str, surface: &str, pos: UserPos, cost: Option<i16>) {
    let dict = open(path);
    if dict.register_with(reading, surface, pos, cost) {
        die!(dict.save(path), "Error saving user dictionary: {}");
        println!("Added: {reading} → {surface} ({pos})");
    } else {
        println!("Already exists: {reading} → {surface}");
    }
}

pub fn user_dict_remove(path: &Path, reading: &str, surface: &str) {
    let dict = open(path);
    if dict.unregister(reading, surface) {
        die!(dict.save(path), "Error saving user dictionary: {}");
        println!("Removed: {reading} → {surface}");
    } else {
        println!("Not found: {reading} → {surface}");
    }
}

pub fn user_dict_list(path: &Path) {
    let words = open(path).list();
    if words.is_empty() {
        println!("(empty)");
        return;
    }
    for w in &words {
        match w.cost {
            Some(cost) => println!("{}\t{}\t{}\t{cost}", w.reading, w.surface, w.pos),
            None => println!("{}\t{}\t{}", w.reading, w.surface, w.pos),
        }
    }
    println!("---");
    println!("{} entries", words.len());
}
