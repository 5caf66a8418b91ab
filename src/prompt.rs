use crate::record::{Grade, StatRecord};
use crate::session::SessionReport;
use crossterm::style::{style, Color, Stylize};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// What the user answered at a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Stop the session here and save what was done so far.
    Abort,
}

/// Terminal side of a session: shows characters and collects replies.
pub trait Prompter {
    /// Shows a character with its romanization for study.
    fn show_lesson(&mut self, character: &str, record: &StatRecord) -> io::Result<()>;

    /// Waits for the user to move on.
    fn next_reply(&mut self) -> io::Result<Reply>;

    /// Shows a character without its romanization and reads a guess.
    fn ask_guess(&mut self, character: &str, record: &StatRecord) -> io::Result<Reply>;

    fn show_grade(&mut self, character: &str, record: &StatRecord, grade: Grade) -> io::Result<()>;

    fn show_report(&mut self, report: &SessionReport) -> io::Result<()>;
}

/// Line-based prompter over any reader and writer, normally stdin and stdout.
pub struct TerminalPrompter<R: BufRead, W: Write> {
    input: R,
    output: W,
    abort_command: String,
    color: bool,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W, abort_command: impl Into<String>, color: bool) -> Self {
        Self {
            input,
            output,
            abort_command: abort_command.into(),
            color,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn counters(record: &StatRecord) -> String {
        format!(
            "learned {} · tested {} · correct {} · incorrect {}",
            record.learned(),
            record.tested(),
            record.correct(),
            record.incorrect()
        )
    }

    fn read_line(&mut self) -> io::Result<Reply> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Reply::Abort);
        }
        let line = line.trim();
        if line == self.abort_command {
            Ok(Reply::Abort)
        } else {
            Ok(Reply::Text(line.to_string()))
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn show_lesson(&mut self, character: &str, record: &StatRecord) -> io::Result<()> {
        let character = self.paint(character, Color::Yellow);
        let romanization = self.paint(record.romanization(), Color::Cyan);
        writeln!(self.output)?;
        writeln!(self.output, "  {character}  {romanization}")?;
        writeln!(self.output, "  {}", Self::counters(record))?;
        Ok(())
    }

    fn next_reply(&mut self) -> io::Result<Reply> {
        write!(
            self.output,
            "[enter] next, {} save and quit > ",
            self.abort_command
        )?;
        self.output.flush()?;
        self.read_line()
    }

    fn ask_guess(&mut self, character: &str, record: &StatRecord) -> io::Result<Reply> {
        let character = self.paint(character, Color::Yellow);
        writeln!(self.output)?;
        writeln!(self.output, "  {character}")?;
        writeln!(self.output, "  {}", Self::counters(record))?;
        write!(self.output, "jyutping ({} to save and quit) > ", self.abort_command)?;
        self.output.flush()?;
        self.read_line()
    }

    fn show_grade(&mut self, character: &str, record: &StatRecord, grade: Grade) -> io::Result<()> {
        let color = match grade {
            Grade::Exact => Color::Green,
            Grade::ToneOmitted => Color::DarkYellow,
            Grade::Wrong => Color::Red,
        };
        let verdict = self.paint(&grade.to_string(), color);
        writeln!(
            self.output,
            "  {verdict}: {character} is {}",
            record.romanization()
        )
    }

    fn show_report(&mut self, report: &SessionReport) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{report}")?;
        self.output.flush()
    }
}

/// Prompter that replays canned replies and remembers what it was shown.
///
/// Once the script runs out every further prompt answers [`Reply::Abort`].
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    replies: VecDeque<Reply>,
    pub lessons: Vec<String>,
    pub questions: Vec<String>,
    pub grades: Vec<(String, Grade)>,
    pub reports: Vec<SessionReport>,
}

impl ScriptedPrompter {
    pub fn new<I: IntoIterator<Item = Reply>>(replies: I) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Script of plain text replies.
    pub fn answering<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(answers.into_iter().map(|a| Reply::Text(a.into())))
    }

    fn pop(&mut self) -> Reply {
        self.replies.pop_front().unwrap_or(Reply::Abort)
    }
}

impl Prompter for ScriptedPrompter {
    fn show_lesson(&mut self, character: &str, _record: &StatRecord) -> io::Result<()> {
        self.lessons.push(character.to_string());
        Ok(())
    }

    fn next_reply(&mut self) -> io::Result<Reply> {
        Ok(self.pop())
    }

    fn ask_guess(&mut self, character: &str, _record: &StatRecord) -> io::Result<Reply> {
        self.questions.push(character.to_string());
        Ok(self.pop())
    }

    fn show_grade(&mut self, character: &str, _record: &StatRecord, grade: Grade) -> io::Result<()> {
        self.grades.push((character.to_string(), grade));
        Ok(())
    }

    fn show_report(&mut self, report: &SessionReport) -> io::Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}
