mod mozc;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use kkc_core::dict::Token;

pub use mozc::MozcSource;

/// Parsed source entries, reading → tokens.
pub type EntryMap = HashMap<String, Vec<Token>>;

/// A raw dictionary layout that can be parsed into entries for
/// [`TrieDictionary::from_entries`](kkc_core::dict::TrieDictionary::from_entries).
pub trait DictSource {
    /// Parse every dictionary file in `dir`.
    fn parse_dir(&self, dir: &Path) -> Result<EntryMap, DictSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DictSourceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Counts reported after parsing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: u64,
    pub skipped: u64,
}

/// Files in `dir` whose names satisfy `predicate`, sorted by name. No match
/// is an error naming `label`.
pub(crate) fn list_dict_files(
    dir: &Path,
    label: &str,
    predicate: impl Fn(&str) -> bool,
) -> Result<Vec<fs::DirEntry>, DictSourceError> {
    let mut files: Vec<fs::DirEntry> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| predicate(&entry.file_name().to_string_lossy()))
        .collect();
    files.sort_by_key(|e| e.file_name());

    if files.is_empty() {
        return Err(DictSourceError::Parse(format!(
            "no {label} files found in {}",
            dir.display()
        )));
    }
    Ok(files)
}

/// Parse `text` line by line into `entries`. Empty lines and `#` comments
/// are skipped, as is every line `parse_line` rejects.
pub(crate) fn parse_lines(
    text: &str,
    entries: &mut EntryMap,
    stats: &mut ParseStats,
    parse_line: impl Fn(&str) -> Option<(String, Token)>,
) {
    for line in text.lines() {
        stats.lines += 1;
        if line.is_empty() || line.starts_with('#') {
            stats.skipped += 1;
            continue;
        }
        match parse_line(line) {
            Some((reading, token)) => entries.entry(reading).or_default().push(token),
            None => stats.skipped += 1,
        }
    }
}

/// Source by name; `None` for unknown names.
pub fn from_name(name: &str) -> Option<Box<dyn DictSource>> {
    match name {
        "mozc" => Some(Box::new(MozcSource)),
        _ => None,
    }
}
