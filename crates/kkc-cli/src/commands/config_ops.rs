use std::fs;

use crate::die;

pub fn settings_export() {
    print!("{}", kkc_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        kkc_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: cost.unknown_word_cost={}, nbest.n_best_preference={}, learning.max_entries={}",
        s.cost.unknown_word_cost, s.nbest.n_best_preference, s.learning.max_entries
    );
}
