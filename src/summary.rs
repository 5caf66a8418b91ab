use crate::book::ProgressBook;
use crate::record::StatRecord;
use itertools::Itertools;
use std::fmt;
use unicode_width::UnicodeWidthStr;

/// Totals across a book plus the characters most likely to come up in a test.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub characters: usize,
    pub learned: usize,
    pub lessons: u64,
    pub tests: u64,
    pub correct: u64,
    pub weakest: Vec<(String, StatRecord)>,
}

impl Summary {
    pub fn of(book: &ProgressBook, weakest: usize) -> Self {
        let mut summary = Self {
            characters: book.len(),
            learned: 0,
            lessons: 0,
            tests: 0,
            correct: 0,
            weakest: Vec::new(),
        };
        for (_, record) in book.iter() {
            if record.has_learned() {
                summary.learned += 1;
            }
            summary.lessons += u64::from(record.learned());
            summary.tests += u64::from(record.tested());
            summary.correct += u64::from(record.correct());
        }
        summary.weakest = book
            .iter()
            .filter(|(_, r)| r.has_learned())
            .sorted_by_key(|(_, r)| std::cmp::Reverse(r.weight_for_test()))
            .take(weakest)
            .map(|(c, r)| (c.to_string(), r.clone()))
            .collect();
        summary
    }

    /// Overall share of correct answers, `None` before any test.
    pub fn accuracy(&self) -> Option<f64> {
        (self.tests > 0).then(|| self.correct as f64 / self.tests as f64)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} of {} characters learned ({} lessons)",
            self.learned, self.characters, self.lessons
        )?;
        match self.accuracy() {
            Some(accuracy) => writeln!(f, "{} tests, {:.1}% correct", self.tests, accuracy * 100.0)?,
            None => writeln!(f, "no tests yet")?,
        }
        if self.weakest.is_empty() {
            return Ok(());
        }

        writeln!(f, "most in need of practice:")?;
        let column = self
            .weakest
            .iter()
            .map(|(_, r)| r.romanization().width())
            .max()
            .unwrap_or(0);
        for (character, record) in &self.weakest {
            // CJK characters take two columns; pad by display width, not chars.
            let pad = 4usize.saturating_sub(character.width());
            writeln!(
                f,
                "  {character}{:pad$}{:<column$}  {}/{} correct",
                "",
                record.romanization(),
                record.correct(),
                record.tested(),
            )?;
        }
        Ok(())
    }
}
