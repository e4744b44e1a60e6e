//! Image lookup for a guessed animal
//!
//! The engine never touches images. The shell asks an [`ImageResolver`] after
//! a successful guess; not finding one is normal and just means nothing is
//! shown.

use std::path::PathBuf;
use tracing::debug;

/// Extensions tried in order of preference
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "gif", "jpg", "jpeg"];

pub trait ImageResolver {
    fn resolve(&self, animal: &str) -> Option<PathBuf>;
}

/// Looks for `<animal>.<ext>` inside one directory
#[derive(Debug, Clone)]
pub struct DirectoryImageResolver {
    dir: PathBuf,
}

impl DirectoryImageResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ImageResolver for DirectoryImageResolver {
    fn resolve(&self, animal: &str) -> Option<PathBuf> {
        let stem = animal.trim().to_lowercase();
        let found = IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", stem, ext)))
            .find(|path| path.is_file());
        debug!(animal = %stem, found = ?found, "image lookup");
        found
    }
}
