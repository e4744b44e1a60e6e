//! Engine tunables and shell settings

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_FACTS_FILE: &str = "animals.pl";
pub const DEFAULT_MAX_CHARACTERISTIC_QUESTIONS: usize = 15;

/// Configuration for the elimination engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How many characteristic questions a game may ask at most
    pub max_characteristic_questions: usize,
    /// Seed for the characteristic shuffle (None = fresh entropy per session)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_characteristic_questions: DEFAULT_MAX_CHARACTERISTIC_QUESTIONS,
            seed: None,
        }
    }
}

/// Settings for the interactive shell
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub facts_path: PathBuf,
    pub images_dir: PathBuf,
    /// Pause before showing the next question
    pub question_delay: Duration,
    pub engine: EngineConfig,
}

impl ShellConfig {
    /// Build from command line arguments (program name first). The only
    /// argument is an optional path to the fact file.
    pub fn from_args(args: &[String]) -> Self {
        let facts_path = args
            .get(1)
            .map(PathBuf::from)
            .unwrap_or_else(default_facts_path);
        Self::for_facts(facts_path)
    }

    pub fn for_facts(facts_path: PathBuf) -> Self {
        let images_dir = images_dir_for(&facts_path);
        Self {
            facts_path,
            images_dir,
            question_delay: Duration::from_millis(200),
            engine: EngineConfig::default(),
        }
    }
}

/// `animals.pl` in the working directory if present, else under the user's
/// data directory.
pub fn default_facts_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_FACTS_FILE);
    if local.exists() {
        return local;
    }
    // XDG data dir on Linux, ~/Library/Application Support on macOS
    dirs::data_dir()
        .map(|base| base.join("animal-guess").join(DEFAULT_FACTS_FILE))
        .unwrap_or(local)
}

/// Images live in an `images/` directory next to the fact file.
pub fn images_dir_for(facts_path: &Path) -> PathBuf {
    facts_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("images")
}
