//! Log Writer
//!
//! Handles appending records to the log file and replacing it wholesale.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, SyncStrategy};
use crate::error::{FigmentError, Result};

/// Separator written between records
pub const LINE_SEPARATOR: u8 = b'\n';

/// Exclusive writer for one log file
///
/// Every append is a single `write_all` on an unbuffered append-mode handle,
/// so an acknowledged append has at least reached the OS. With
/// `SyncStrategy::EveryWrite` it has also been fsync'd.
pub struct LogWriter {
    /// Append handle. `None` after a replace whose reopen failed; the next
    /// append or sync reopens it, or fails with `WriteFailure`.
    file: Option<File>,
    path: PathBuf,
    tmp_path: PathBuf,
    sync_strategy: SyncStrategy,

    /// Current file length in bytes
    len: u64,

    /// Records currently in the file (set by the loader, then maintained here)
    records: u64,
}

impl LogWriter {
    /// Ensure the log file exists and open it for appending
    ///
    /// A file that already exists is not an error. Any other failure to
    /// create or open it is `StorageUnavailable`.
    pub fn initialize(config: &Config) -> Result<Self> {
        config.validate()?;
        let path = config.path.clone();

        if config.create_parent_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| FigmentError::unavailable(parent, e))?;
            }
        }

        let created = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => true,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => false,
            Err(e) => return Err(FigmentError::unavailable(&path, e)),
        };

        let file = Self::open_append(&path).map_err(|e| FigmentError::unavailable(&path, e))?;
        let len = file
            .metadata()
            .map_err(|e| FigmentError::unavailable(&path, e))?
            .len();

        tracing::debug!(path = %path.display(), created, len, "log file initialized");

        Ok(Self {
            file: Some(file),
            tmp_path: config.compaction_tmp_path(),
            path,
            sync_strategy: config.sync_strategy,
            len,
            records: 0,
        })
    }

    /// Append one encoded record
    ///
    /// The separator and the record go out in one write so appends never
    /// interleave. Returns the number of bytes written.
    pub fn append(&mut self, line: &str) -> Result<u64> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        if self.len > 0 {
            buf.push(LINE_SEPARATOR);
        }
        buf.extend_from_slice(line.as_bytes());

        let sync_strategy = self.sync_strategy;
        let file = self.handle()?;
        file.write_all(&buf).map_err(FigmentError::WriteFailure)?;
        if sync_strategy == SyncStrategy::EveryWrite {
            file.sync_data().map_err(FigmentError::WriteFailure)?;
        }

        self.len += buf.len() as u64;
        self.records += 1;
        Ok(buf.len() as u64)
    }

    /// Atomically replace the whole file with `lines`, in order
    ///
    /// Steps:
    /// 1. Write every line to the temp path and fsync it
    /// 2. Rename the temp file over the log file
    /// 3. fsync the parent directory (best effort)
    /// 4. Reopen the append handle on the new file
    ///
    /// On failure before the rename the original file is untouched and the
    /// temp file is removed. If only the reopen fails, the new file is in
    /// place and the handle is reopened lazily by the next append.
    pub fn replace_all<I, S>(&mut self, lines: I) -> Result<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buf = Vec::new();
        let mut count = 0u64;
        for line in lines {
            if count > 0 {
                buf.push(LINE_SEPARATOR);
            }
            buf.extend_from_slice(line.as_ref().as_bytes());
            count += 1;
        }

        if let Err(e) = self.write_tmp(&buf) {
            let _ = fs::remove_file(&self.tmp_path);
            return Err(FigmentError::WriteFailure(e));
        }

        if let Err(e) = fs::rename(&self.tmp_path, &self.path) {
            let _ = fs::remove_file(&self.tmp_path);
            return Err(FigmentError::WriteFailure(e));
        }

        // The old handle points at the unlinked inode and must never be written again
        self.file = None;
        self.len = buf.len() as u64;
        self.records = count;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        self.handle()?;
        Ok(self.len)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.handle()?.sync_all().map_err(FigmentError::WriteFailure)
    }

    /// Record the number of records the loader found in the file
    pub(crate) fn set_record_count(&mut self, records: u64) {
        self.records = records;
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Records in the file as far as this writer knows
    pub fn record_count(&self) -> u64 {
        self.records
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// The append handle, reopening it on the current file if it was dropped
    fn handle(&mut self) -> Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => Self::open_append(&self.path).map_err(FigmentError::WriteFailure)?,
        };
        Ok(self.file.insert(file))
    }

    fn open_append(path: &Path) -> io::Result<File> {
        OpenOptions::new().append(true).open(path)
    }

    fn write_tmp(&self, buf: &[u8]) -> io::Result<()> {
        let mut tmp = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.tmp_path)?;
        tmp.write_all(buf)?;
        tmp.sync_all()
    }
}
