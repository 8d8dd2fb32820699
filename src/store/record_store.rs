//! Record Store
//!
//! Line-oriented string persistence keyed by line position.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SquirrelError};

/// File-backed list of strings, one per line
///
/// The store holds no data in memory: every load reads the file and every
/// save rewrites it. Callers that need load-modify-save atomicity across
/// threads must serialize access themselves.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Backing file
    path: PathBuf,
}

impl RecordStore {
    /// Open or create a store at the given path
    ///
    /// Creates an empty file if none exists. Existing content is left as is.
    /// Fails if the parent directory is missing or inaccessible.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        Self::create_if_missing(&path)?;

        tracing::debug!("Record store opened at {}", path.display());

        Ok(Self { path })
    }

    /// Load all stored lines in file order
    ///
    /// Returns an empty list for an empty file, or if the file has been
    /// removed since the store was opened.
    pub fn load_strings(&self) -> Result<Vec<String>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        // `lines()` strips both LF and CRLF terminators
        let lines = BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()?;

        tracing::trace!("Loaded {} lines from {}", lines.len(), self.path.display());

        Ok(lines)
    }

    /// Replace the file content with the given lines
    ///
    /// Steps:
    /// 1. Reject lines that could not round-trip (embedded line breaks)
    /// 2. Write everything to a sibling temporary file and fsync it
    /// 3. Rename the temporary file over the target
    pub fn save_strings<S: AsRef<str>>(&self, lines: &[S]) -> Result<()> {
        // Step 1: Validate
        for (index, line) in lines.iter().enumerate() {
            if line.as_ref().contains(['\n', '\r']) {
                return Err(SquirrelError::Storage(format!(
                    "Line {} contains a line break and cannot be stored",
                    index
                )));
            }
        }

        // Step 2: Write temporary file
        let tmp_path = self.tmp_path()?;
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            for line in lines {
                writer.write_all(line.as_ref().as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }

        // Step 3: Swap into place
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::trace!("Saved {} lines to {}", lines.len(), self.path.display());

        Ok(())
    }

    /// Append a single line
    ///
    /// Equivalent to `save_strings(load_strings() + [value])`, so it also
    /// recreates the file if it has gone missing.
    pub fn save_string(&self, value: impl Into<String>) -> Result<()> {
        let mut lines = self.load_strings()?;
        lines.push(value.into());
        self.save_strings(&lines)
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Create an empty file unless one already exists
    fn create_if_missing(path: &Path) -> Result<()> {
        OpenOptions::new().create(true).append(true).open(path)?;
        Ok(())
    }

    /// "data/squirrels.db" → "data/squirrels.db.tmp"
    fn tmp_path(&self) -> Result<PathBuf> {
        let file_name = self.path.file_name().ok_or_else(|| {
            SquirrelError::Storage(format!(
                "Store path {} has no file name",
                self.path.display()
            ))
        })?;

        let mut tmp_name = OsString::from(file_name);
        tmp_name.push(".tmp");

        Ok(self.path.with_file_name(tmp_name))
    }
}
