use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = DrillError> = std::result::Result<T, E>;

/// Everything that can abort a drill operation.
///
/// None of these are retried: the progress file is only ever written by this
/// tool, so a malformed one is a broken precondition rather than bad luck.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DrillError {
    #[error("file {} does not exist", .0.display())]
    MissingFile(PathBuf),
    #[error("file {} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("unexpected header in {}: {found:?}", path.display())]
    Schema { path: PathBuf, found: String },
    #[error("malformed record: {0}")]
    Format(String),
    #[error("character {0:?} appears more than once")]
    DuplicateCharacter(String),
    #[error("no unique romanization for {character:?}: {reason}")]
    AmbiguousLookup { character: String, reason: String },
    #[error("cannot draw {requested} distinct characters from {available} eligible")]
    InsufficientPopulation { requested: usize, available: usize },
    #[error("character list holds {found} characters, expected {expected}")]
    CharacterCount { expected: usize, found: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
