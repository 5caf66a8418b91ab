//! Sources the tracker depends on but does not own: the master character list
//! and the character to jyutping dictionary.

use crate::error::{DrillError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// One reading offered for a looked-up character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub segment: String,
    pub romanization: Option<String>,
}

impl Candidate {
    pub fn new(segment: impl Into<String>, romanization: Option<&str>) -> Self {
        Self {
            segment: segment.into(),
            romanization: romanization.map(str::to_string),
        }
    }
}

/// Anything that can propose romanizations for a character
pub trait RomanizationLookup {
    fn candidates(&self, character: &str) -> Vec<Candidate>;
}

/// Dictionary read from a tab-separated `character<TAB>jyutping` file.
///
/// A character listed on several rows has several candidates; an empty
/// jyutping column stands for a character the dictionary knows but cannot
/// romanize.
#[derive(Debug, Clone, Default)]
pub struct TableLookup {
    entries: HashMap<String, Vec<Option<String>>>,
}

impl TableLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DrillError::MissingFile(path.to_path_buf()));
        }
        let table = Self::from_reader(fs::File::open(path)?)?;
        if table.is_empty() {
            warn!(path = %path.display(), "dictionary has no entries");
        } else {
            info!(path = %path.display(), characters = table.len(), "loaded dictionary");
        }
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rows = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(reader);

        let mut table = Self::new();
        for (line, row) in rows.records().enumerate() {
            let row = row?;
            match (row.get(0), row.get(1), row.len()) {
                (Some(character), romanization, 1 | 2) if !character.is_empty() => {
                    table.insert(character, romanization.filter(|r| !r.is_empty()));
                }
                _ => {
                    return Err(DrillError::Format(format!(
                        "dictionary line {}: expected character and jyutping",
                        line + 1
                    )))
                }
            }
        }
        Ok(table)
    }

    pub fn insert(&mut self, character: &str, romanization: Option<&str>) {
        self.entries
            .entry(character.to_string())
            .or_default()
            .push(romanization.map(str::to_string));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RomanizationLookup for TableLookup {
    fn candidates(&self, character: &str) -> Vec<Candidate> {
        self.entries
            .get(character)
            .map(|readings| {
                readings
                    .iter()
                    .map(|r| Candidate::new(character, r.as_deref()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Reads the characters to track: the first line of `path`, one character each.
///
/// With `expected` set, a list of any other length is rejected.
pub fn read_character_list<P: AsRef<Path>>(path: P, expected: Option<usize>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DrillError::MissingFile(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    let characters = parse_character_line(&contents);
    if let Some(expected) = expected {
        if characters.len() != expected {
            return Err(DrillError::CharacterCount {
                expected,
                found: characters.len(),
            });
        }
    }
    Ok(characters)
}

fn parse_character_line(contents: &str) -> Vec<String> {
    contents
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn table_lookup_collects_every_reading() {
        let table = TableLookup::from_reader("字\tzi6\n行\thang4\n行\thong4\n".as_bytes()).unwrap();

        assert_eq!(table.candidates("字"), vec![Candidate::new("字", Some("zi6"))]);
        assert_eq!(table.candidates("行").len(), 2);
        assert!(table.candidates("音").is_empty());
    }

    #[test]
    fn table_lookup_keeps_unromanized_entries() {
        let table = TableLookup::from_reader("〇\t\n".as_bytes()).unwrap();
        assert_eq!(table.candidates("〇"), vec![Candidate::new("〇", None)]);
    }

    #[test]
    fn table_lookup_rejects_extra_columns() {
        assert_matches!(
            TableLookup::from_reader("字\tzi6\textra\n".as_bytes()),
            Err(DrillError::Format(_))
        );
    }

    #[test]
    fn empty_dictionary_file_loads_as_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jyutping.tsv");
        fs::write(&path, "").unwrap();

        let table = TableLookup::from_path(&path).unwrap();
        assert!(table.is_empty());
        assert!(table.candidates("字").is_empty());
    }

    #[test]
    fn character_list_uses_first_line_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("characters.txt");
        fs::write(&path, "  字音一  \nignored\n").unwrap();

        let characters = read_character_list(&path, Some(3)).unwrap();
        assert_eq!(characters, ["字", "音", "一"]);
    }

    #[test]
    fn character_list_length_is_checked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("characters.txt");
        fs::write(&path, "字音\n").unwrap();

        assert_matches!(
            read_character_list(&path, Some(3)),
            Err(DrillError::CharacterCount {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(read_character_list(&path, None).unwrap().len(), 2);
    }

    #[test]
    fn missing_character_list_is_reported() {
        let dir = tempdir().unwrap();
        assert_matches!(
            read_character_list(dir.path().join("nope.txt"), None),
            Err(DrillError::MissingFile(_))
        );
    }
}
