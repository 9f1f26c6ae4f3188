//! Log Reader
//!
//! Forward-only, single-pass iteration over the records in a log file.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::marker::PhantomData;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::Record;
use crate::error::{FigmentError, Result};

/// Reads records from the log file, always starting at byte zero
pub struct LogReader {
    lines: Lines<BufReader<File>>,
}

impl LogReader {
    /// Open a log file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(FigmentError::ReadFailure)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }

    /// Iterate over every record in file order
    pub fn records<T: DeserializeOwned>(self) -> LogIterator<T> {
        LogIterator {
            lines: self.lines,
            line_no: 0,
            bytes_read: 0,
            blank_lines: 0,
            _marker: PhantomData,
        }
    }
}

/// Iterator over log records
///
/// Blank lines are skipped. The first undecodable line yields a `Parse`
/// error; callers are expected to stop there.
pub struct LogIterator<T> {
    lines: Lines<BufReader<File>>,
    line_no: usize,
    bytes_read: u64,
    blank_lines: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> LogIterator<T> {
    /// Physical lines consumed so far (1-based number of the last line)
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Approximate bytes consumed so far: each line plus one separator byte.
    /// Undercounts CRLF files by one byte per line and overcounts a final
    /// line without a trailing `\n` by one.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Blank or whitespace-only lines skipped so far
    pub fn blank_lines(&self) -> u64 {
        self.blank_lines
    }
}

impl<T: DeserializeOwned> Iterator for LogIterator<T> {
    type Item = Result<Record<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                // Not UTF-8: the line is corrupt, not unreadable
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    self.line_no += 1;
                    return Some(Err(FigmentError::Parse {
                        line: self.line_no,
                        source: serde_json::Error::io(e),
                    }));
                }
                Err(e) => return Some(Err(FigmentError::ReadFailure(e))),
            };
            self.line_no += 1;
            self.bytes_read += line.len() as u64 + 1;

            if line.trim().is_empty() {
                self.blank_lines += 1;
                continue;
            }

            return Some(Record::decode(&line, self.line_no));
        }
    }
}
