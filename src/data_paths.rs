use std::path::{Path, PathBuf};

/// Default data directory (relative to current working directory)
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Subdirectory paths relative to the data directory
pub const BOOK_DIR: &str = "book";
pub const LOGS_DIR: &str = "logs";
pub const EXPORTS_DIR: &str = "exports";

/// Helper struct to manage data paths
#[derive(Clone, Debug)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Create a new DataPaths instance with the given root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root data directory
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Get the book directory (holds the persisted book document)
    pub fn book(&self) -> PathBuf {
        self.root.join(BOOK_DIR)
    }

    /// Get the logs directory
    pub fn logs(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    /// Get the exports directory (CSV statements land here)
    pub fn exports(&self) -> PathBuf {
        self.root.join(EXPORTS_DIR)
    }

    /// Ensure all directories exist
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.book())?;
        std::fs::create_dir_all(self.logs())?;
        std::fs::create_dir_all(self.exports())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdirectories_hang_off_the_root() {
        let paths = DataPaths::new("/tmp/folio-test");
        assert_eq!(paths.book(), PathBuf::from("/tmp/folio-test/book"));
        assert_eq!(paths.logs(), PathBuf::from("/tmp/folio-test/logs"));
        assert_eq!(paths.exports(), PathBuf::from("/tmp/folio-test/exports"));
    }
}
