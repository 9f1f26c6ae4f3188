//! Log File Module
//!
//! The durable on-disk representation: an append-only sequence of records.
//!
//! ## Responsibilities
//! - Create the file on first use (an existing file is fine)
//! - Append one record per write, synchronously
//! - Replay every record at startup, last value wins
//! - Atomically replace the whole file during compaction
//!
//! ## File Format
//! ```text
//! {"key":"a","value":1}        <- live record
//! {"key":"b","value":{"x":2}}
//! {"key":"a"}                  <- tombstone: no "value" field
//! ```
//! Records are separated by `\n` with no trailing newline. Blank lines are
//! ignored on load. There is no header, version tag, or checksum, so a
//! partial final line left by a crash mid-append fails the next load.

mod loader;
mod reader;
mod record;
mod writer;

pub use loader::{LoadStats, Loader};
pub use reader::{LogIterator, LogReader};
pub use record::{encode_line, Record};
pub use writer::{LogWriter, LINE_SEPARATOR};
