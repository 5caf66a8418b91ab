use clap::{Parser, Subcommand};
use crossterm::tty::IsTty;
use jyutdrill::{
    config::{Config, ConfigStore, FileConfigStore},
    lookup::{read_character_list, TableLookup},
    prompt::TerminalPrompter,
    summary::Summary,
    bootstrap, DrillError, ProgressStore, SessionRunner, WeightedSampler,
};
use std::{
    error::Error,
    io::{self, stdout},
    num::NonZeroUsize,
    path::PathBuf,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// drill the jyutping of common chinese characters
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Learn and test the jyutping of a fixed set of Chinese characters. Characters you have seen least, or answer wrongly most, come up more often."
)]
pub struct Cli {
    /// config file to read instead of the default location
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// progress file to use instead of the configured one
    #[clap(long, global = true)]
    progress: Option<PathBuf>,

    /// disable coloured output
    #[clap(long, global = true)]
    no_color: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// recreate a store from scratch, e.g. `reset progress`
    Reset {
        target: String,

        /// replace an existing progress file
        #[clap(long)]
        force: bool,
    },
    /// study characters with their jyutping shown
    Learn { count: NonZeroUsize },
    /// quiz characters learned before
    Test { count: NonZeroUsize },
    /// print totals and the characters most in need of practice
    Summary {
        /// how many characters to list
        #[clap(short, long, default_value_t = 10)]
        top: usize,
    },
    #[clap(external_subcommand)]
    Other(Vec<String>),
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Loads the config file and applies command line overrides.
    fn settings(&self) -> Config {
        let mut config = self.config_store().load();
        if let Some(progress) = &self.progress {
            config.progress_path = progress.clone();
        }
        if self.no_color || !stdout().is_tty() {
            config.color = false;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.config_store().ensure_exists() {
        warn!(error = %e, "could not write default config");
    }
    let config = cli.settings();

    match cli.command {
        Some(Command::Reset { ref target, force }) if target == "progress" => {
            reset_progress(&config, force)?
        }
        Some(Command::Learn { count }) => run(&config, |runner| runner.run_learning(count.get()))?,
        Some(Command::Test { count }) => run(&config, |runner| runner.run_testing(count.get()))?,
        Some(Command::Summary { top }) => {
            let book = ProgressStore::new(&config.progress_path).load()?;
            print!("{}", Summary::of(&book, top));
        }
        Some(Command::Reset { target, .. }) => {
            println!("nothing to reset for {target:?}, try `reset progress`");
        }
        Some(Command::Other(args)) => {
            println!("unknown command {:?}, nothing to do", args.join(" "));
        }
        None => println!("nothing to do, try `learn <count>` or `test <count>`"),
    }
    Ok(())
}

fn reset_progress(config: &Config, force: bool) -> jyutdrill::Result<()> {
    let store = ProgressStore::new(&config.progress_path);
    if store.exists() && !force {
        return Err(DrillError::AlreadyExists(config.progress_path.clone()));
    }
    let characters = read_character_list(&config.characters_path, config.expected_character_count)?;
    let lookup = TableLookup::from_path(&config.dictionary_path)?;
    let book = bootstrap(characters, &lookup)?;
    store.save(&book, force)?;
    println!(
        "created progress file {} for {} characters",
        config.progress_path.display(),
        book.len()
    );
    Ok(())
}

type TerminalRunner = SessionRunner<TerminalPrompter<io::StdinLock<'static>, io::Stdout>, rand::rngs::StdRng>;

fn run<F>(config: &Config, session: F) -> jyutdrill::Result<()>
where
    F: FnOnce(&mut TerminalRunner) -> jyutdrill::Result<jyutdrill::SessionReport>,
{
    let store = ProgressStore::new(&config.progress_path);
    let book = store.load()?;
    let prompter = TerminalPrompter::new(
        io::stdin().lock(),
        stdout(),
        config.abort_command.clone(),
        config.color,
    );
    let mut runner = SessionRunner::new(store, book, prompter, WeightedSampler::from_entropy());
    session(&mut runner)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_learn_count() {
        let cli = Cli::parse_from(["jyutdrill", "learn", "12"]);
        assert_eq!(
            cli.command,
            Some(Command::Learn {
                count: NonZeroUsize::new(12).unwrap()
            })
        );
    }

    #[test]
    fn test_cli_rejects_zero_count() {
        assert!(Cli::try_parse_from(["jyutdrill", "test", "0"]).is_err());
        assert!(Cli::try_parse_from(["jyutdrill", "test", "-3"]).is_err());
        assert!(Cli::try_parse_from(["jyutdrill", "test", "many"]).is_err());
    }

    #[test]
    fn test_cli_reset_progress() {
        let cli = Cli::parse_from(["jyutdrill", "reset", "progress", "--force"]);
        assert_eq!(
            cli.command,
            Some(Command::Reset {
                target: "progress".to_string(),
                force: true
            })
        );
    }

    #[test]
    fn test_cli_unknown_subcommand_is_captured() {
        let cli = Cli::parse_from(["jyutdrill", "dance", "now"]);
        assert_eq!(
            cli.command,
            Some(Command::Other(vec!["dance".to_string(), "now".to_string()]))
        );
    }

    #[test]
    fn test_cli_global_overrides() {
        let cli = Cli::parse_from([
            "jyutdrill",
            "summary",
            "--progress",
            "/tmp/p.tsv",
            "--no-color",
        ]);
        assert_eq!(cli.progress, Some(PathBuf::from("/tmp/p.tsv")));
        assert!(cli.no_color);
        assert!(!cli.settings().color);
        assert_eq!(cli.settings().progress_path, PathBuf::from("/tmp/p.tsv"));
    }

    #[test]
    fn test_cli_without_command() {
        let cli = Cli::parse_from(["jyutdrill"]);
        assert_eq!(cli.command, None);
    }
}
