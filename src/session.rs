use crate::book::ProgressBook;
use crate::error::{DrillError, Result};
use crate::prompt::{Prompter, Reply};
use crate::record::{Grade, StatRecord};
use crate::sampler::WeightedSampler;
use crate::store::ProgressStore;
use rand::Rng;
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionKind {
    Learning,
    Testing,
}

/// What happened during one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub kind: SessionKind,
    pub requested: usize,
    pub presented: usize,
    pub correct: usize,
    pub tone_omitted: usize,
    pub incorrect: usize,
    pub aborted: bool,
}

impl SessionReport {
    fn new(kind: SessionKind, requested: usize) -> Self {
        Self {
            kind,
            requested,
            presented: 0,
            correct: 0,
            tone_omitted: 0,
            incorrect: 0,
            aborted: false,
        }
    }

    fn tally(&mut self, grade: Grade) {
        match grade {
            Grade::Exact => self.correct += 1,
            Grade::ToneOmitted => self.tone_omitted += 1,
            Grade::Wrong => self.incorrect += 1,
        }
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} session: {} of {}", self.kind, self.presented, self.requested)?;
        if self.kind == SessionKind::Testing {
            write!(
                f,
                ", {} correct, {} without tone, {} incorrect",
                self.correct, self.tone_omitted, self.incorrect
            )?;
        }
        if self.aborted {
            write!(f, " (stopped early)")?;
        }
        Ok(())
    }
}

/// Runs learning and testing sessions over a loaded book.
///
/// The book lives in memory for the whole run and the store is rewritten in
/// full after every session, including sessions the user stops early.
pub struct SessionRunner<P: Prompter, R: Rng> {
    store: ProgressStore,
    book: ProgressBook,
    prompter: P,
    sampler: WeightedSampler<R>,
}

impl<P: Prompter, R: Rng> SessionRunner<P, R> {
    pub fn new(store: ProgressStore, book: ProgressBook, prompter: P, sampler: WeightedSampler<R>) -> Self {
        Self {
            store,
            book,
            prompter,
            sampler,
        }
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn into_parts(self) -> (ProgressBook, P) {
        (self.book, self.prompter)
    }

    /// Studies `count` characters drawn from the whole book, unlearned first.
    pub fn run_learning(&mut self, count: usize) -> Result<SessionReport> {
        let population = self
            .book
            .weighted(|_| true, StatRecord::weight_for_learn);
        let picked = self.sampler.sample(&population, count)?;

        let mut report = SessionReport::new(SessionKind::Learning, count);
        let outcome = self.learn_each(&picked, &mut report);
        self.finish(report, outcome)
    }

    /// Quizzes `count` characters drawn from those learned at least once.
    pub fn run_testing(&mut self, count: usize) -> Result<SessionReport> {
        let population = self
            .book
            .weighted(StatRecord::has_learned, StatRecord::weight_for_test);
        if population.len() < count {
            return Err(DrillError::InsufficientPopulation {
                requested: count,
                available: population.len(),
            });
        }
        let picked = self.sampler.sample(&population, count)?;

        let mut report = SessionReport::new(SessionKind::Testing, count);
        let outcome = self.test_each(&picked, &mut report);
        self.finish(report, outcome)
    }

    fn learn_each(&mut self, picked: &[String], report: &mut SessionReport) -> Result<()> {
        for character in picked {
            let Some(record) = self.book.get_mut(character) else {
                continue;
            };
            self.prompter.show_lesson(character, record)?;
            record.record_learn();
            report.presented += 1;

            if self.prompter.next_reply()? == Reply::Abort {
                report.aborted = true;
                break;
            }
        }
        Ok(())
    }

    fn test_each(&mut self, picked: &[String], report: &mut SessionReport) -> Result<()> {
        for character in picked {
            let Some(record) = self.book.get_mut(character) else {
                continue;
            };
            let guess = match self.prompter.ask_guess(character, record)? {
                Reply::Abort => {
                    report.aborted = true;
                    break;
                }
                Reply::Text(guess) => guess,
            };

            let grade = Grade::score(record.romanization(), &guess);
            record.record_test(grade.is_correct());
            report.presented += 1;
            report.tally(grade);
            self.prompter.show_grade(character, record, grade)?;
        }
        Ok(())
    }

    /// Saves whatever the session managed before handing back its result.
    fn finish(&mut self, report: SessionReport, outcome: Result<()>) -> Result<SessionReport> {
        self.store.save(&self.book, true)?;
        outcome?;
        info!(
            kind = %report.kind,
            presented = report.presented,
            aborted = report.aborted,
            "session finished"
        );
        self.prompter.show_report(&report)?;
        Ok(report)
    }
}
