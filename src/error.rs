//! Error types shared by the training and classification pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias defaulting to [`NbcError`].
pub type Result<T, E = NbcError> = std::result::Result<T, E>;

/// Every fatal condition a run can hit. Nothing is retried; the first error
/// aborts the run before any verdict is printed.
#[derive(Error, Debug)]
pub enum NbcError {
    /// A document could not be opened or read.
    #[error("could not open file '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A corpus directory could not be opened or listed.
    #[error("could not open directory '{}': {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Training data cannot support a probability estimate (zero documents,
    /// or a zero word count used as a divisor).
    #[error("degenerate corpus: {0}")]
    DegenerateCorpus(String),

    /// An explicitly requested config file could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] confy::ConfyError),

    /// A document-loading worker panicked.
    #[error("worker thread panicked: {0}")]
    WorkerPanic(String),
}

impl NbcError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Directory {
            path: path.into(),
            source,
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateCorpus(reason.into())
    }
}
