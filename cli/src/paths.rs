//! Path utilities for lexigraph.

use std::io;
use std::path::PathBuf;

/// Default base directory name under the user's home.
pub const DEFAULT_BASE_DIR: &str = ".lexigraph";

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default vector database filename inside the data directory.
pub const DEFAULT_STORE_FILE: &str = "lexigraph.redb";

/// Provides access to the lexigraph directory structure.
#[derive(Debug, Clone)]
pub struct Paths {
    /// User's home directory.
    pub home_dir: PathBuf,
}

impl Paths {
    pub fn new() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not find home directory")
        })?;
        Ok(Self { home_dir })
    }

    /// Rooted at `home_dir` instead of the user's home.
    pub fn with_home(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
        }
    }

    /// `~/.lexigraph`
    pub fn base_dir(&self) -> PathBuf {
        self.home_dir.join(DEFAULT_BASE_DIR)
    }

    /// `~/.lexigraph/config.yaml`
    pub fn config_file(&self) -> PathBuf {
        self.base_dir().join(DEFAULT_CONFIG_FILE)
    }

    /// `~/.lexigraph/data`
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir().join("data")
    }

    /// `~/.lexigraph/data/lexigraph.redb`
    pub fn store_file(&self) -> PathBuf {
        self.data_dir().join(DEFAULT_STORE_FILE)
    }

    /// Creates the data directory if it doesn't exist.
    pub fn ensure_data_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.data_dir())
    }
}
