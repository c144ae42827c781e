use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::die;
use kkc_core::dict::connection::ConnectionMatrix;
use kkc_core::dict::SourceTag;
use kkc_core::user_dict::UserDictionary;
use kkc_core::user_history::LearnedOverlay;
use kkc_core::{Candidate, ConversionEngine};

/// Everything `convert` needs besides the input.
#[derive(Default)]
pub struct ConvertOptions {
    /// Extra static sources as `(tag, path)`.
    pub sources: Vec<(SourceTag, String)>,
    pub enable: Vec<SourceTag>,
    pub disable: Vec<SourceTag>,
    pub user_dict: Option<String>,
    pub history: Option<String>,
    pub json: bool,
}

/// Parse a `tag=path` argument.
pub fn parse_source_arg(arg: &str) -> Result<(SourceTag, String), String> {
    let (tag, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected TAG=PATH, got '{arg}'"))?;
    let tag: SourceTag = tag.parse()?;
    if !tag.is_static() || tag == SourceTag::System {
        return Err(format!("'{tag}' cannot be loaded from a file"));
    }
    Ok((tag, path.to_string()))
}

#[derive(Serialize)]
struct ConvertOutput<'a> {
    reading: &'a str,
    candidates: &'a [Candidate],
}

pub fn build_engine(dict_file: &str, conn_file: &str, opts: &ConvertOptions) -> ConversionEngine {
    let mut builder = ConversionEngine::builder()
        .system_path(dict_file)
        .connection_path(conn_file);
    for (tag, path) in &opts.sources {
        builder = builder.source_path(*tag, path);
    }
    if let Some(path) = &opts.user_dict {
        let user = die!(
            UserDictionary::open(Path::new(path)),
            "Error opening user dictionary: {}"
        );
        builder = builder.user_dictionary(Arc::new(user));
    }
    if let Some(path) = &opts.history {
        let learned = die!(
            LearnedOverlay::open(Path::new(path)),
            "Error opening history: {}"
        );
        builder = builder.learned(Arc::new(learned));
    }
    let engine = die!(builder.build(), "Error loading engine: {}");

    for tag in &opts.enable {
        if !engine.enable_source(*tag) {
            eprintln!("Warning: source '{tag}' is not loaded");
        }
    }
    for tag in &opts.disable {
        if !engine.disable_source(*tag) {
            eprintln!("Warning: source '{tag}' is not loaded");
        }
    }
    engine
}

pub fn convert_cmd(dict_file: &str, conn_file: &str, kana: &str, n: usize, opts: &ConvertOptions) {
    let engine = build_engine(dict_file, conn_file, opts);
    let candidates = engine.convert(kana, n);

    if opts.json {
        let out = ConvertOutput {
            reading: kana,
            candidates: &candidates,
        };
        let json = die!(serde_json::to_string_pretty(&out), "Error encoding JSON: {}");
        println!("{json}");
    } else {
        print!("{}", format_table(&candidates));
    }
}

/// One row per candidate: rank, surface (padded to display width), cost,
/// origin and the segment split.
pub fn format_table(candidates: &[Candidate]) -> String {
    let width = candidates
        .iter()
        .map(|c| c.surface.width())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (i, c) in candidates.iter().enumerate() {
        let pad = " ".repeat(width - c.surface.width());
        let segs: Vec<String> = c
            .segments
            .iter()
            .map(|s| format!("{}({})", s.surface, s.reading))
            .collect();
        out.push_str(&format!(
            "#{:>2}: {}{pad}  {:>6}  {:<24} {}\n",
            i + 1,
            c.surface,
            c.cost,
            c.origin.to_string(),
            segs.join(" | ")
        ));
    }
    out
}

pub fn conn_cost_cmd(conn_file: &str, left: u16, right: u16) {
    let conn = die!(
        ConnectionMatrix::open(Path::new(conn_file)),
        "Error opening connection matrix: {}"
    );
    if left >= conn.num_ids() || right >= conn.num_ids() {
        eprintln!("Error: ids must be below {}", conn.num_ids());
        std::process::exit(1);
    }
    println!("conn({left}, {right}) = {}", conn.cost(left, right));
}
