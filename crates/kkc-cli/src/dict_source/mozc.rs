use std::fs;
use std::path::Path;

use kkc_core::dict::Token;
use kkc_core::unicode::is_hiragana_reading;

use super::{list_dict_files, parse_lines, DictSource, DictSourceError, EntryMap, ParseStats};

/// Mozc `dictionary*.txt` files: `reading \t left_id \t right_id \t cost \t surface`.
pub struct MozcSource;

impl MozcSource {
    /// One TSV line. Lines with a non-hiragana reading, an empty surface or
    /// unparsable numbers are rejected.
    pub fn parse_line(line: &str) -> Option<(String, Token)> {
        let mut fields = line.split('\t');
        let reading = fields.next()?;
        let left_id: u16 = fields.next()?.parse().ok()?;
        let right_id: u16 = fields.next()?.parse().ok()?;
        let cost: i16 = fields.next()?.parse().ok()?;
        let surface = fields.next()?;
        if !is_hiragana_reading(reading) || surface.is_empty() {
            return None;
        }
        Some((
            reading.to_string(),
            Token {
                surface: surface.to_string(),
                cost,
                left_id,
                right_id,
            },
        ))
    }

    /// Parse one file's contents.
    pub fn parse_text(text: &str) -> (EntryMap, ParseStats) {
        let mut entries = EntryMap::new();
        let mut stats = ParseStats::default();
        parse_lines(text, &mut entries, &mut stats, Self::parse_line);
        (entries, stats)
    }
}

impl DictSource for MozcSource {
    fn parse_dir(&self, dir: &Path) -> Result<EntryMap, DictSourceError> {
        let files = list_dict_files(dir, "dictionary*.txt", |name| {
            name.starts_with("dictionary") && name.ends_with(".txt")
        })?;
        let mut entries = EntryMap::new();
        let mut stats = ParseStats::default();
        for file in &files {
            let path = file.path();
            eprintln!("Reading {}...", path.display());
            let text = fs::read_to_string(&path)?;
            parse_lines(&text, &mut entries, &mut stats, Self::parse_line);
        }
        eprintln!("  (skipped {} of {} lines)", stats.skipped, stats.lines);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let (reading, token) = MozcSource::parse_line("ねこ\t1851\t1852\t5000\t猫").unwrap();
        assert_eq!(reading, "ねこ");
        assert_eq!(token.surface, "猫");
        assert_eq!((token.left_id, token.right_id, token.cost), (1851, 1852, 5000));
    }

    #[test]
    fn test_parse_line_rejects_bad_rows() {
        assert!(MozcSource::parse_line("ねこ\t1851\t1851\t5000").is_none());
        assert!(MozcSource::parse_line("ねこ\tx\t1851\t5000\t猫").is_none());
        assert!(MozcSource::parse_line("ねこ\t1\t1\t99999\t猫").is_none());
        assert!(MozcSource::parse_line("neko\t1\t1\t10\t猫").is_none());
        assert!(MozcSource::parse_line("ねこ\t1\t1\t10\t").is_none());
    }

    #[test]
    fn test_parse_text_groups_by_reading() {
        let text = "# comment\n\
                    ねこ\t1\t1\t500\t猫\n\
                    \n\
                    ねこ\t1\t1\t900\t寝子\n\
                    いぬ\t1\t1\t600\t犬\n\
                    broken line\n";
        let (entries, stats) = MozcSource::parse_text(text);
        assert_eq!(entries.len(), 2);
        let surfaces: Vec<&str> = entries["ねこ"].iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["猫", "寝子"]);
        assert_eq!(stats, ParseStats { lines: 6, skipped: 3 });
    }

    #[test]
    fn test_parse_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("dictionary00.txt"), "ねこ\t1\t1\t500\t猫\n").unwrap();
        fs::write(dir.path().join("dictionary01.txt"), "ねこ\t1\t1\t700\t根子\n").unwrap();
        fs::write(dir.path().join("suffix.txt"), "ねこ\t1\t1\t1\t無視\n").unwrap();

        let entries = MozcSource.parse_dir(dir.path()).unwrap();
        let surfaces: Vec<&str> = entries["ねこ"].iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["猫", "根子"]);
    }

    #[test]
    fn test_parse_dir_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = MozcSource.parse_dir(dir.path()).err().unwrap();
        assert!(err.to_string().contains("dictionary*.txt"));
    }
}
