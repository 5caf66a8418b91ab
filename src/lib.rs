// Library surface shared by the binary and the integration tests.
pub mod app_dirs;
pub mod book;
pub mod config;
pub mod error;
pub mod lookup;
pub mod prompt;
pub mod record;
pub mod sampler;
pub mod session;
pub mod store;
pub mod summary;

pub use book::ProgressBook;
pub use error::{DrillError, Result};
pub use record::{Grade, StatRecord};
pub use sampler::WeightedSampler;
pub use session::{SessionKind, SessionReport, SessionRunner};
pub use store::{bootstrap, ProgressStore};
