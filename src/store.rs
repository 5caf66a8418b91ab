use crate::book::ProgressBook;
use crate::error::{DrillError, Result};
use crate::lookup::RomanizationLookup;
use crate::record::StatRecord;
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Column titles of the progress file, in order.
pub const TITLE: [&str; 6] = ["Character", "Jyutping", "Learned", "Tested", "Correct", "Incorrect"];

/// Tab-separated progress file holding one row per character.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<ProgressBook> {
        if !self.path.exists() {
            return Err(DrillError::MissingFile(self.path.clone()));
        }
        let contents = fs::read(&self.path)?;
        match blank_line(&contents) {
            Some(1) => return Err(self.schema_error(String::new())),
            Some(line) => return Err(DrillError::Format(format!("line {line}: empty row"))),
            None => {}
        }

        let mut rows = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(contents.as_slice());

        let mut records = rows.byte_records();
        let header = records.next().transpose()?.unwrap_or_default();
        let found = header.iter().map(String::from_utf8_lossy).join("\t");
        if csv::StringRecord::from_byte_record(header).map_or(true, |h| h.iter().ne(TITLE)) {
            return Err(self.schema_error(found));
        }

        let mut book = ProgressBook::new();
        for row in records {
            let row = row?;
            let line = row.position().map_or(0, |p| p.line());
            let at_line = |e: DrillError| match e {
                DrillError::Format(msg) => DrillError::Format(format!("line {line}: {msg}")),
                DrillError::DuplicateCharacter(c) => {
                    DrillError::Format(format!("line {line}: character {c:?} repeated"))
                }
                other => other,
            };
            let row = csv::StringRecord::from_byte_record(row)
                .map_err(|_| at_line(DrillError::Format("not valid UTF-8".to_string())))?;
            if row.len() != TITLE.len() {
                return Err(at_line(DrillError::Format(format!(
                    "expected {} fields, found {}",
                    TITLE.len(),
                    row.len()
                ))));
            }
            let character = &row[0];
            if character.chars().count() != 1 {
                return Err(at_line(DrillError::Format(format!(
                    "{character:?} is not a single character"
                ))));
            }
            let record = StatRecord::from_fields(row.iter().skip(1)).map_err(at_line)?;
            book.insert(character, record).map_err(at_line)?;
        }

        info!(path = %self.path.display(), records = book.len(), "loaded progress");
        Ok(book)
    }

    fn schema_error(&self, found: String) -> DrillError {
        DrillError::Schema {
            path: self.path.clone(),
            found,
        }
    }

    /// Writes the header and every record of `book`, replacing the whole file.
    ///
    /// The rows go to a temporary file next to the target which is then renamed
    /// over it, so the target either keeps its old content or gets all of the
    /// new one. With `overwrite` unset an existing target is left untouched.
    pub fn save(&self, book: &ProgressBook, overwrite: bool) -> Result<()> {
        if !overwrite && self.path.exists() {
            return Err(DrillError::AlreadyExists(self.path.clone()));
        }
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut out = csv::WriterBuilder::new()
                .delimiter(b'\t')
                .quote_style(csv::QuoteStyle::Never)
                .from_writer(tmp.as_file_mut());
            out.write_record(TITLE)?;
            for (character, record) in book.iter() {
                out.write_record(std::iter::once(character.to_string()).chain(record.fields()))?;
            }
            out.flush()?;
        }
        tmp.as_file().sync_all()?;

        if overwrite {
            tmp.persist(&self.path).map_err(|e| e.error)?;
        } else {
            tmp.persist_noclobber(&self.path).map_err(|e| {
                if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                    DrillError::AlreadyExists(self.path.clone())
                } else {
                    DrillError::Io(e.error)
                }
            })?;
        }

        info!(path = %self.path.display(), records = book.len(), "saved progress");
        Ok(())
    }
}

/// Builds a fresh book from the master character list.
///
/// Every character must have exactly one romanization that ends in a tone
/// number 1 to 6. Nothing is returned unless every character passes.
pub fn bootstrap<I, S, L>(characters: I, lookup: &L) -> Result<ProgressBook>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    L: RomanizationLookup + ?Sized,
{
    let mut book = ProgressBook::new();
    for character in characters {
        let character: String = character.into();
        if character.chars().count() != 1 || character.contains(['\t', '\n', '\r']) {
            return Err(DrillError::Format(format!(
                "{character:?} is not a single usable character"
            )));
        }
        if book.contains(&character) {
            return Err(DrillError::DuplicateCharacter(character));
        }
        let romanization = unique_romanization(&character, lookup)?;
        book.insert(character, StatRecord::new(romanization))?;
    }
    info!(characters = book.len(), "bootstrapped progress");
    Ok(book)
}

/// Number of the first line holding nothing, not counting the end of the
/// final line.
fn blank_line(contents: &[u8]) -> Option<usize> {
    let mut lines: Vec<&[u8]> = contents.split(|&b| b == b'\n').collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
        .iter()
        .position(|l| l.is_empty() || *l == b"\r")
        .map(|i| i + 1)
}

fn unique_romanization<L>(character: &str, lookup: &L) -> Result<String>
where
    L: RomanizationLookup + ?Sized,
{
    let ambiguous = |reason: String| DrillError::AmbiguousLookup {
        character: character.to_string(),
        reason,
    };

    let candidates = lookup.candidates(character);
    let romanization = match candidates.as_slice() {
        [only] => only
            .romanization
            .clone()
            .ok_or_else(|| ambiguous("lookup has no romanization".to_string()))?,
        other => return Err(ambiguous(format!("{} candidates", other.len()))),
    };

    if romanization.contains(['\t', '\n', '\r']) {
        return Err(DrillError::Format(format!(
            "romanization {romanization:?} of {character:?} contains a line or field break"
        )));
    }
    if romanization.chars().count() < 2 {
        return Err(ambiguous(format!("romanization {romanization:?} is too short")));
    }
    if !matches!(romanization.chars().last(), Some('1'..='6')) {
        return Err(ambiguous(format!(
            "romanization {romanization:?} does not end in a tone 1-6"
        )));
    }
    Ok(romanization)
}
