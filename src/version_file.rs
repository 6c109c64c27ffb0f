use crate::domain::Version;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_VERSION_FILE: &str = "VERSION.txt";

/// The persisted version of record.
///
/// Read once at the start of a cut and written once at the end; everything
/// in between works on the parsed [`Version`] value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFile {
    path: PathBuf,
}

impl VersionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        VersionFile { path: path.into() }
    }

    /// Resolve a possibly relative path against a base directory
    pub fn resolve(base: &Path, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.is_absolute() {
            Self::new(path)
        } else {
            Self::new(base.join(path))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the current version
    pub fn read(&self) -> Result<Version> {
        let contents = fs::read_to_string(&self.path)?;
        let version = Version::parse(&contents)?;
        tracing::debug!(path = %self.path.display(), %version, "read version of record");
        Ok(version)
    }

    /// Replace the file contents with `version` and a trailing newline
    pub fn write(&self, version: &Version) -> Result<()> {
        fs::write(&self.path, format!("{}\n", version))?;
        tracing::debug!(path = %self.path.display(), %version, "wrote version of record");
        Ok(())
    }
}
