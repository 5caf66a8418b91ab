use crate::error::{DrillError, Result};
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

/// Scale of both selection weights. An unlearned character weighs exactly this.
pub const WEIGHT_SCALE: u64 = 1_000_000;

/// Keeps a perfect accuracy from dividing by zero in the test weight.
pub const ACCURACY_EPSILON: f64 = 1e-7;

/// Number of tab-separated fields a record serializes to.
pub const RECORD_FIELDS: usize = 5;

/// How a single test answer was scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Grade {
    #[strum(serialize = "correct")]
    Exact,
    #[strum(serialize = "correct (tone omitted)")]
    ToneOmitted,
    #[strum(serialize = "incorrect")]
    Wrong,
}

impl Grade {
    /// Scores `guess` against the stored romanization. Dropping only the
    /// trailing tone number still counts as correct.
    pub fn score(romanization: &str, guess: &str) -> Self {
        if guess == romanization {
            return Grade::Exact;
        }
        let toneless = romanization
            .char_indices()
            .last()
            .map(|(idx, _)| &romanization[..idx]);
        match toneless {
            Some(toneless) if guess == toneless => Grade::ToneOmitted,
            _ => Grade::Wrong,
        }
    }

    pub fn is_correct(self) -> bool {
        !matches!(self, Grade::Wrong)
    }
}

/// Learning and testing counters for one character.
///
/// `tested == correct + incorrect` holds for every record this type hands out:
/// the counters are private and only move through [`StatRecord::record_test`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    romanization: String,
    learned: u32,
    tested: u32,
    correct: u32,
    incorrect: u32,
}

impl StatRecord {
    pub fn new(romanization: impl Into<String>) -> Self {
        Self {
            romanization: romanization.into(),
            learned: 0,
            tested: 0,
            correct: 0,
            incorrect: 0,
        }
    }

    pub fn romanization(&self) -> &str {
        &self.romanization
    }

    pub fn learned(&self) -> u32 {
        self.learned
    }

    pub fn tested(&self) -> u32 {
        self.tested
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    pub fn has_learned(&self) -> bool {
        self.learned > 0
    }

    /// Share of correct answers, or 1.0 before the first test.
    pub fn accuracy(&self) -> f64 {
        if self.tested == 0 {
            1.0
        } else {
            self.correct as f64 / self.tested as f64
        }
    }

    /// Decreases with every lesson but never reaches zero.
    pub fn weight_for_learn(&self) -> u64 {
        (WEIGHT_SCALE / (1 + u64::from(self.learned))).max(1)
    }

    /// Zero until the character has been learned at least once. Afterwards it
    /// grows as accuracy drops and shrinks slowly with the number of tests.
    pub fn weight_for_test(&self) -> u64 {
        if !self.has_learned() {
            return 0;
        }
        let freshness = WEIGHT_SCALE as f64 / (1.0 + f64::from(self.tested).sqrt());
        let weight = (freshness / (self.accuracy() + ACCURACY_EPSILON)).floor();
        (weight as u64).max(1)
    }

    pub fn record_learn(&mut self) {
        self.learned += 1;
    }

    pub fn record_test(&mut self, correct: bool) {
        self.tested += 1;
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }

    /// Serialized fields in file order: romanization then the four counters.
    pub fn fields(&self) -> [String; RECORD_FIELDS] {
        [
            self.romanization.clone(),
            self.learned.to_string(),
            self.tested.to_string(),
            self.correct.to_string(),
            self.incorrect.to_string(),
        ]
    }

    pub fn from_fields<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        let [romanization, learned, tested, correct, incorrect] = fields.as_slice() else {
            return Err(DrillError::Format(format!(
                "expected {RECORD_FIELDS} fields, found {}",
                fields.len()
            )));
        };
        if romanization.is_empty() {
            return Err(DrillError::Format("empty romanization".to_string()));
        }
        let record = Self {
            romanization: romanization.to_string(),
            learned: parse_counter("learned", learned)?,
            tested: parse_counter("tested", tested)?,
            correct: parse_counter("correct", correct)?,
            incorrect: parse_counter("incorrect", incorrect)?,
        };
        if u64::from(record.tested) != u64::from(record.correct) + u64::from(record.incorrect) {
            return Err(DrillError::Format(format!(
                "tested count {} is not correct {} + incorrect {}",
                record.tested, record.correct, record.incorrect
            )));
        }
        Ok(record)
    }
}

fn parse_counter(name: &str, raw: &str) -> Result<u32> {
    raw.parse::<u32>()
        .map_err(|e| DrillError::Format(format!("{name} count {raw:?}: {e}")))
}

impl fmt::Display for StatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields().iter().join("\t"))
    }
}

impl FromStr for StatRecord {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_fields(s.split('\t'))
    }
}
