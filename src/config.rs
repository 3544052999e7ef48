use crate::classifier::{Classifier, DEFAULT_THRESHOLD};
use crate::corpus::Accumulator;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const APP_NAME: &str = "nbc";
const CONFIG_NAME: &str = "config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of ham (legitimate) training documents.
    pub ham_dir: PathBuf,
    /// Directory of spam training documents.
    pub spam_dir: PathBuf,
    /// Words seen this many times or more in a class are not scored.
    pub threshold: u32,
    /// Document-loading threads per class; 1 keeps accumulation sequential.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ham_dir: PathBuf::from("data/train/enron1/ham"),
            spam_dir: PathBuf::from("data/train/enron1/spam"),
            threshold: DEFAULT_THRESHOLD,
            workers: 1,
        }
    }
}

impl Config {
    /// Load the per-user config, falling back to defaults if it is unreadable.
    pub fn load() -> Self {
        match confy::load(APP_NAME, Some(CONFIG_NAME)) {
            Ok(config) => config,
            Err(err) => {
                warn!("Failed to load config, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Load an explicitly named config file. Errors propagate; a missing file
    /// is created with defaults.
    pub fn load_from(path: &Path) -> Result<Self, confy::ConfyError> {
        confy::load_path(path)
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.threshold)
    }

    pub fn accumulator(&self) -> Accumulator {
        Accumulator::new(self.workers)
    }
}
